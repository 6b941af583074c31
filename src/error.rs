use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortalError {
    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("invalid request body: {0}")]
    RequestBody(#[from] JsonRejection),

    #[error("session encode error: {0}")]
    SessionEncode(#[from] serde_json::Error),

    #[error("template render error: {0}")]
    Template(#[from] askama::Error),
}

/// Every error that escapes a handler becomes the JSON failure envelope
/// with a 500 status. Rejected credentials are not an error (see
/// `AuthOutcome`) and never pass through here.
impl IntoResponse for PortalError {
    fn into_response(self) -> axum::response::Response {
        let body = ApiFailure::new(format!("服务器错误: {self}"));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Failure envelope shared by every non-2xx API response.
#[derive(Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
