// src/services/completion.rs
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Model used for every completion call.
const MODEL: &str = "gpt-4o-mini";

/// System instruction sent ahead of every user prompt.
const SYSTEM_PROMPT: &str =
    "You are a helpful chatbot. Respond in a friendly and helpful manner.";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Error)]
enum CompletionError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion API returned no choices")]
    NoChoices,
}

/// Client for an OpenAI-style chat-completion API.
///
/// The public surface never fails: [`CompletionClient::complete`] returns the
/// generated text on success and an `"Error: <description>"` string on any
/// failure, so callers always have something to display or relay.
#[derive(Clone)]
pub struct CompletionClient {
    http: Client,
    api_key: String,
    api_base: String,
}

impl CompletionClient {
    pub fn new(api_key: String, api_base: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            api_base,
        }
    }

    /// Answer a single user question with the fixed system instruction.
    /// Single-turn: no history is carried between calls.
    pub async fn complete(&self, question: &str) -> String {
        match self.request_completion(question).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "completion request failed");
                format!("Error: {err}")
            }
        }
    }

    async fn request_completion(&self, question: &str) -> Result<String, CompletionError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.api_base.trim_end_matches('/')
        );
        let body = CompletionRequest {
            model: MODEL,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                RequestMessage {
                    role: "user",
                    content: question,
                },
            ],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::NoChoices)
    }
}
