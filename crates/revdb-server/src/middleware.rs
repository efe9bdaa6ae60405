//! Middleware for the REST API server.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Request logging middleware.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

/// Admission control in front of every store-facing route.
///
/// Rejected requests never reach a handler.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(rejection) = state.limiter.try_acquire() {
        warn!(
            method = %request.method(),
            uri = %request.uri(),
            "Request rejected by rate limiter"
        );
        return Err(rejection.into());
    }

    Ok(next.run(request).await)
}
