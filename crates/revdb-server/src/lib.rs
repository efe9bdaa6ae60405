//! revdb-server - REST API server for revdb.
//!
//! Exposes the versioned application store over YAML-over-HTTP. Bulk create
//! and update endpoints accept a stream of YAML documents and report per-record
//! outcomes; all `/api` routes sit behind a token-bucket rate limiter.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use revdb_core::VersionedStore;
//! use revdb_server::{create_server, AppState, RateLimiter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(VersionedStore::new());
//!     let app = create_server(AppState::new(store, RateLimiter::new(1.0, 3)));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8082").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod yaml;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use rate_limit::RateLimiter;
pub use state::AppState;

use std::time::Duration;

use axum::{middleware as axum_middleware, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Upper bound on time spent serving one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
