// src/config.rs
use std::env;
use std::path::PathBuf;

const DEFAULT_COMPLETION_API_BASE: &str = "https://api.openai.com";
const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PORT: u16 = 5000;

/// Process-lifetime configuration, read once at startup.
///
/// Missing credentials do not abort startup: the clients carry whatever was
/// configured and surface failures at call time as error payloads, so the
/// server stays up with a partial environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub whatsapp_token: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_verify_token: String,
    pub whatsapp_api_base: String,
    pub upload_dir: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_API_BASE.to_string()),
            whatsapp_token: env::var("WHATSAPP_TOKEN").unwrap_or_default(),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default(),
            whatsapp_verify_token: env::var("WHATSAPP_VERIFY_TOKEN").unwrap_or_default(),
            whatsapp_api_base: env::var("WHATSAPP_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GRAPH_API_BASE.to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
