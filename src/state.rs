// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::completion::CompletionClient;
use crate::services::storage::UploadStore;
use crate::services::whatsapp::WhatsAppClient;

pub type SharedState = Arc<AppState>;

/// Immutable per-process state: the two upstream clients, the upload store,
/// and the webhook verification secret. Built once at startup and shared by
/// every handler; nothing here mutates after construction.
pub struct AppState {
    pub completion: CompletionClient,
    pub whatsapp: WhatsAppClient,
    pub uploads: UploadStore,
    pub verify_token: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            completion: CompletionClient::new(
                config.openai_api_key.clone(),
                config.openai_api_base.clone(),
            ),
            whatsapp: WhatsAppClient::new(
                config.whatsapp_token.clone(),
                config.whatsapp_phone_number_id.clone(),
                config.whatsapp_api_base.clone(),
            ),
            uploads: UploadStore::new(config.upload_dir.clone()),
            verify_token: config.whatsapp_verify_token.clone(),
        }
    }
}
