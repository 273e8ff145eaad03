//! HTTP request handlers.

use axum::{
    extract::{Query, State},
    http::{Method, Uri},
    Json,
};

use crate::api::types::*;
use crate::error::{SmallFileError, SmallFileResult};
use crate::AppState;

/// Fetch the content of a registered small file.
///
/// GET /api/get_small_file?token=<token>&file_id=<id>
///
/// Every method is routed here so that parameter and token checks run
/// before the method check.
#[utoipa::path(
    get,
    path = "/api/get_small_file",
    params(
        ("token" = String, Query, description = "Cluster token"),
        ("file_id" = i64, Query, description = "Small file id")
    ),
    responses(
        (status = 200, description = "File content as an attachment", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 400, description = "Missing parameter, invalid token, invalid id, or file not found or not content", body = String),
        (status = 405, description = "Method other than GET", body = RestResult)
    ),
    tag = "small_files"
)]
pub async fn get_small_file(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> SmallFileResult<SmallFileAttachment> {
    // Pairs always decode; a malformed query just yields no parameters.
    let params = Query::<SmallFileParams>::try_from_uri(&uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    let (Some(token), Some(raw_file_id)) = (
        single_param(&params, "token"),
        single_param(&params, "file_id"),
    ) else {
        return Err(SmallFileError::MissingParameter);
    };

    if !state.tokens.matches(token) {
        tracing::warn!(file_id = %raw_file_id, "Invalid cluster token presented");
        return Err(SmallFileError::InvalidToken);
    }

    let file_id: i64 = raw_file_id
        .parse()
        .map_err(|_| SmallFileError::InvalidFileId(raw_file_id.to_string()))?;

    let file = state
        .files
        .get_small_file(file_id)
        .filter(|file| file.is_content)
        .ok_or(SmallFileError::FileNotFound)?;

    if method != Method::GET {
        return Err(SmallFileError::MethodNotAllowed);
    }

    tracing::debug!(
        file_id,
        name = %file.name,
        size = file.content.len(),
        "Serving small file"
    );

    Ok(SmallFileAttachment {
        name: file.name.clone(),
        content: file.content.clone(),
    })
}

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
