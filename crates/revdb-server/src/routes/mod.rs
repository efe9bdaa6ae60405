//! Route definitions for the REST API.

mod applications;
mod health;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};

use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

/// Create the main application router.
///
/// Only the `/api` routes sit behind the rate limiter.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/applications",
            get(applications::list_applications)
                .post(applications::create_applications)
                .put(applications::update_applications),
        )
        .route(
            "/api/applications/:title",
            get(applications::get_application).delete(applications::delete_application),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .merge(api)
        // Attach state
        .with_state(state)
}

pub use applications::*;
pub use health::*;
