//! Application CRUD endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap},
};
use revdb_core::{for_each_application, Application, BulkReport, ListFilter};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::yaml::{is_yaml_content_type, Yaml};

fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn require_yaml_body(headers: &HeaderMap) -> ApiResult<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if is_yaml_content_type(content_type) {
        Ok(())
    } else {
        Err(ApiError::unsupported_media_type(
            "Content-Type header is not text/x-yaml",
        ))
    }
}

/// List active applications.
/// GET /api/applications?source=..&company=..&license=..
pub async fn list_applications(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Yaml<Vec<Application>>> {
    // reject unsupported keys before touching the store
    let filter = ListFilter::from_pairs(query_pairs(query.as_deref()))?;
    Ok(Yaml(state.store.list(&filter)))
}

/// Get the current revision, or the full history with `?dump`.
/// GET /api/applications/:title
pub async fn get_application(
    State(state): State<AppState>,
    Path(title): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Yaml<serde_yaml::Value>> {
    let mut dump = false;
    for (key, _) in query_pairs(query.as_deref()) {
        if key != "dump" {
            return Err(ApiError::bad_request(format!(
                "query key {} is not supported, only \"dump\" is supported",
                key
            )));
        }
        dump = true;
    }

    let body = if dump {
        serde_yaml::to_value(state.store.dump_key(&title)?)
    } else {
        serde_yaml::to_value(state.store.get(&title)?)
    };
    body.map(Yaml)
        .map_err(|e| ApiError::internal(e.to_string()))
}

/// Create every application in a YAML document stream.
/// POST /api/applications
pub async fn create_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Yaml<BulkReport>> {
    require_yaml_body(&headers)?;
    let report = for_each_application(&body, |app| state.store.create(app).map(|_| ()));
    Ok(Yaml(report))
}

/// Update every application in a YAML document stream.
/// PUT /api/applications
pub async fn update_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Yaml<BulkReport>> {
    require_yaml_body(&headers)?;
    let report = for_each_application(&body, |app| state.store.update(app).map(|_| ()));
    Ok(Yaml(report))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Soft-delete an application.
/// DELETE /api/applications/:title
pub async fn delete_application(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> ApiResult<Yaml<DeleteResponse>> {
    state.store.delete(&title)?;
    Ok(Yaml(DeleteResponse {
        message: format!("{} is deleted successfully", title),
    }))
}
