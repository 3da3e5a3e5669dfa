// src/routes/upload.rs
use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::info;

use crate::{
    error::AppError,
    message::UploadResponse,
    services::storage::{allowed_file, truncate_with_ellipsis},
    state::SharedState,
};

/// Longest `content` string returned to the client.
const MAX_CONTENT_CHARS: usize = 500;

pub async fn upload_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err(AppError::BadRequest("No file selected".to_string()));
        }
        // Validate before touching the disk. The check runs on the name the
        // client sent; sanitization happens on write.
        if !allowed_file(&original_name) {
            return Err(AppError::BadRequest("File type not allowed".to_string()));
        }

        let data = field.bytes().await?;
        let stored = state.uploads.save(&original_name, &data).await?;
        info!(
            filename = %stored.filename,
            bytes = data.len(),
            "stored uploaded file"
        );

        let content = truncate_with_ellipsis(&stored.description(), MAX_CONTENT_CHARS);
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            filename: stored.filename,
            content,
        }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
