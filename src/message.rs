// src/message.rs
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ChatRequest {
    // Absent, null, and empty all collapse to the same 400.
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub user_message: String,
    pub bot_response: String,
}

#[derive(Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct SendWhatsAppRequest {
    pub phone_number: Option<String>,
    pub message: Option<String>,
}
