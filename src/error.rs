// src/error.rs
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Route-level error. Client mistakes and internal failures map onto
/// `{"error": <message>}` JSON bodies; 403 carries a plain-text body (the
/// webhook verification contract). Multipart stream errors keep the status
/// the extractor assigned them, so over-limit bodies still answer 413.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
            AppError::Multipart(err) => error_body(err.status(), err.body_text()),
            AppError::Internal(msg) => error_body(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
