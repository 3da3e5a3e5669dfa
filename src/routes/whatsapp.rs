// src/routes/whatsapp.rs
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{error::AppError, message::SendWhatsAppRequest, state::SharedState};

/// Payload `object` value for events coming from a business account.
const BUSINESS_ACCOUNT_OBJECT: &str = "whatsapp_business_account";

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Inbound webhook event. Every level defaults so a partial or unrelated
/// payload deserializes to something we can walk without erroring.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    object: String,
    #[serde(default)]
    entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
struct WebhookEntry {
    #[serde(default)]
    changes: Vec<WebhookChange>,
}

#[derive(Debug, Deserialize)]
struct WebhookChange {
    #[serde(default)]
    field: String,
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<InboundMessage>,
}

#[derive(Debug, Deserialize)]
struct InboundMessage {
    #[serde(default)]
    from: String,
    text: Option<InboundText>,
}

#[derive(Debug, Deserialize)]
struct InboundText {
    #[serde(default)]
    body: String,
}

/// Subscription handshake: echo the challenge back when the token matches.
/// An unset token fails every attempt rather than matching an empty one.
pub async fn verify_webhook(
    State(state): State<SharedState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    let presented = params.verify_token.unwrap_or_default();
    if !state.verify_token.is_empty() && presented == state.verify_token {
        info!("webhook verified");
        return Ok(params.challenge.unwrap_or_default());
    }

    warn!("webhook verification failed");
    Err(AppError::Forbidden("Verification failed".to_string()))
}

/// Inbound message delivery. Each text message gets a generated reply sent
/// back to its sender. Delivery problems are logged, never surfaced: the
/// platform retries the whole batch on any non-success status, so this
/// handler always acknowledges.
pub async fn receive_webhook(
    State(state): State<SharedState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<Value> {
    if payload.object == BUSINESS_ACCOUNT_OBJECT {
        for entry in &payload.entry {
            for change in &entry.changes {
                if change.field != "messages" {
                    continue;
                }
                for message in &change.value.messages {
                    let body = message
                        .text
                        .as_ref()
                        .map(|text| text.body.as_str())
                        .unwrap_or_default();
                    if body.is_empty() {
                        info!(from = %message.from, "skipping message without text");
                        continue;
                    }

                    let reply = state.completion.complete(body).await;
                    let result = state.whatsapp.send_text(&message.from, &reply).await;
                    if result.get("error").is_some() {
                        warn!(to = %message.from, %result, "reply was not delivered");
                    }
                }
            }
        }
    }

    Json(json!({ "status": "success" }))
}

/// Sends an arbitrary text message on behalf of the caller and relays the
/// messaging API's response document verbatim.
pub async fn send_whatsapp_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SendWhatsAppRequest>,
) -> Result<Json<Value>, AppError> {
    let phone_number = payload.phone_number.unwrap_or_default();
    let message = payload.message.unwrap_or_default();
    if phone_number.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "Phone number and message required".to_string(),
        ));
    }

    let result = state.whatsapp.send_text(&phone_number, &message).await;
    Ok(Json(result))
}
