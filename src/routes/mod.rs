// src/routes/mod.rs
pub mod chat;
pub mod upload;
pub mod whatsapp;

use crate::state::SharedState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use upload::upload_handler;
use whatsapp::{receive_webhook, send_whatsapp_handler, verify_webhook};

/// Upload bodies above this are rejected at the transport layer.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(chat_handler))
        .route(
            "/upload",
            post(upload_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/whatsapp", get(verify_webhook).post(receive_webhook))
        .route("/send-whatsapp", post(send_whatsapp_handler))
        .route("/health", get(|| async { "OK" }))
        // The chat and admin pages are static assets deployed alongside the
        // binary; the server only has to hand them out.
        .route_service("/", ServeFile::new("public/index.html"))
        .route_service("/admin", ServeFile::new("public/admin.html"))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}
