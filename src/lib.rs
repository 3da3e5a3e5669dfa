//! Backend for a WhatsApp-connected chatbot: HTTP routes for chat, file
//! uploads, webhook delivery, and outbound messaging.

pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;
