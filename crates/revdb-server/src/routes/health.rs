//! Health check endpoint.

use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;
use crate::yaml::Yaml;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub keys: usize,
    pub revisions: usize,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Yaml<HealthResponse> {
    Yaml(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        keys: state.store.key_count(),
        revisions: state.store.revision_count(),
    })
}
