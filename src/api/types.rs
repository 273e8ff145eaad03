//! API request and response types.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

// ==================== Small Files ====================

/// Raw query parameters of a small file request, in arrival order.
pub type SmallFileParams = Vec<(String, String)>;

/// Return the first value of a query parameter, treating an empty value as absent.
pub fn single_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// A small file body sent as a downloadable attachment.
#[derive(Debug, Clone)]
pub struct SmallFileAttachment {
    pub name: String,
    pub content: Bytes,
}

impl IntoResponse for SmallFileAttachment {
    fn into_response(self) -> Response {
        let disposition = HeaderValue::from_str(&content_disposition(&self.name))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/octet-stream"),
                ),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.content,
        )
            .into_response()
    }
}

/// Build a `Content-Disposition` value naming the attachment.
///
/// Quotes, backslashes and control characters in the plain `filename` are
/// replaced with `_`. Non-ASCII names also get an RFC 5987 `filename*`.
fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if name.is_ascii() {
        return format!("attachment; filename=\"{fallback}\"");
    }

    let mut encoded = String::with_capacity(name.len() * 3);
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Result envelope used by the cluster REST actions.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestResult {
    /// `OK` or `FAILED`.
    pub status: String,
    /// `0` on success, `1` on failure.
    pub code: String,
    pub msg: String,
    pub message: String,
}

impl RestResult {
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: "FAILED".to_string(),
            code: "1".to_string(),
            msg: message.clone(),
            message,
        }
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Timestamp.
    pub timestamp: String,
}
