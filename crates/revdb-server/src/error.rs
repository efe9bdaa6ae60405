//! Error handling for the REST API server.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use revdb_core::RevError;
use serde::Serialize;
use std::fmt;

use crate::yaml::YAML_CONTENT_TYPE;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    /// Seconds a rejected client should wait, sent as `Retry-After`.
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            retry_after: None,
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        // the body is two plain strings; fall back to the bare message regardless
        let text = serde_yaml::to_string(&body).unwrap_or(body.error.message);
        let mut response =
            (self.status, [(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], text).into_response();
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

// Convert from revdb-core errors
impl From<RevError> for ApiError {
    fn from(err: RevError) -> Self {
        let code = err.code().as_str();
        let (status, retry_after) = match &err {
            RevError::Validation { .. } | RevError::Decode(_) => (StatusCode::BAD_REQUEST, None),
            RevError::NotFound { .. } => (StatusCode::NOT_FOUND, None),
            RevError::Conflict { .. } => (StatusCode::CONFLICT, None),
            RevError::RateLimit { retry_after, .. } => (StatusCode::TOO_MANY_REQUESTS, *retry_after),
            RevError::Configuration(_) | RevError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };
        ApiError {
            retry_after,
            ..ApiError::new(status, code, err.to_string())
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(RevError::not_found("x")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RevError::deleted("x")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RevError::conflict_deleted("x")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RevError::unchanged("x")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(RevError::invalid_filter("owner")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(RevError::rate_limit("slow down", None)).status,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_rate_limit_sets_retry_after_header() {
        let response = ApiError::from(RevError::rate_limit("slow down", Some(3))).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");

        let response = ApiError::from(RevError::rate_limit("slow down", None)).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_code_carried_over() {
        let err = ApiError::from(RevError::already_exists("nginx"));
        assert_eq!(err.code, "APP_003");
        assert!(err.message.contains("nginx"));
    }
}
