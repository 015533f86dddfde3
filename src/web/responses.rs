use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Canonical JSON payload for Read API failures.
#[derive(Debug, Serialize, Clone)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

/// Helper for handlers that return `(StatusCode, Json<ApiError>)`.
pub fn json_error(
    status: StatusCode,
    error: impl Into<String>,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError::new(error, message)))
}
