//! YAML response body.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

pub const YAML_CONTENT_TYPE: &str = "text/x-yaml";

/// Serializes `T` as a YAML document with a `text/x-yaml` content type.
#[derive(Debug, Clone)]
pub struct Yaml<T>(pub T);

impl<T: Serialize> IntoResponse for Yaml<T> {
    fn into_response(self) -> Response {
        match revdb_core::codec::to_yaml(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], body).into_response(),
            Err(e) => ApiError::internal(e.to_string()).into_response(),
        }
    }
}

/// Whether a request `Content-Type` is acceptable for a YAML body.
///
/// A missing header is accepted. Parameters such as `charset` are ignored.
pub fn is_yaml_content_type(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let media_type = v.split(';').next().unwrap_or_default().trim();
            media_type.is_empty() || media_type.eq_ignore_ascii_case(YAML_CONTENT_TYPE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_check() {
        assert!(is_yaml_content_type(None));
        assert!(is_yaml_content_type(Some("")));
        assert!(is_yaml_content_type(Some("text/x-yaml")));
        assert!(is_yaml_content_type(Some("text/x-yaml; charset=utf-8")));
        assert!(!is_yaml_content_type(Some("application/json")));
    }
}
