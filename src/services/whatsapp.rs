// src/services/whatsapp.rs
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Serialize)]
struct SendTextRequest<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'a str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// Client for the WhatsApp Cloud API per-recipient send endpoint.
///
/// `send_text` returns whatever JSON the platform answered with, including
/// its own error documents on rejected sends, and folds transport or decode
/// failures into an `{"error": <description>}` object. It never returns a
/// `Result`; callers inspect the value to detect failure.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    access_token: String,
    phone_number_id: String,
    api_base: String,
}

impl WhatsAppClient {
    pub fn new(access_token: String, phone_number_id: String, api_base: String) -> Self {
        Self {
            http: Client::new(),
            access_token,
            phone_number_id,
            api_base,
        }
    }

    pub async fn send_text(&self, to: &str, body: &str) -> Value {
        match self.post_message(to, body).await {
            Ok(value) => value,
            Err(err) => {
                warn!(to = %to, error = %err, "whatsapp send failed");
                serde_json::json!({ "error": err.to_string() })
            }
        }
    }

    async fn post_message(&self, to: &str, body: &str) -> Result<Value, reqwest::Error> {
        let url = format!(
            "{}/v17.0/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.phone_number_id
        );
        let payload = SendTextRequest {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: TextBody { body },
        };

        // The platform reports send rejections in the response document, so
        // the body is returned as-is without gating on the HTTP status.
        self.http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?
            .json::<Value>()
            .await
    }
}
