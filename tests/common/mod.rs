use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

use wabot_backend::config::Config;
use wabot_backend::routes::create_router;
use wabot_backend::state::AppState;

pub const PHONE_NUMBER_ID: &str = "555000111";
pub const VERIFY_TOKEN: &str = "test-verify-token";
pub const CANNED_REPLY: &str = "canned reply";

/// Requests the stub upstream has seen, in arrival order.
#[derive(Clone, Default)]
pub struct UpstreamLog {
    pub completions: Arc<Mutex<Vec<Value>>>,
    pub sends: Arc<Mutex<Vec<Value>>>,
    send_failure: Arc<AtomicBool>,
}

impl UpstreamLog {
    /// Make the message endpoint answer subsequent sends with an error
    /// document and a server-error status.
    pub fn fail_sends(&self) {
        self.send_failure.store(true, Ordering::SeqCst);
    }
}

/// Response document the stub returns for an accepted send.
pub fn accepted_send_response() -> Value {
    json!({
        "messaging_product": "whatsapp",
        "messages": [{ "id": "wamid.stub" }]
    })
}

async fn chat_completions(State(log): State<UpstreamLog>, Json(body): Json<Value>) -> Json<Value> {
    log.completions.lock().unwrap().push(body);
    Json(json!({
        "id": "chatcmpl-stub",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": CANNED_REPLY },
            "finish_reason": "stop"
        }]
    }))
}

async fn send_message(State(log): State<UpstreamLog>, Json(body): Json<Value>) -> Response {
    log.sends.lock().unwrap().push(body);
    if log.send_failure.load(Ordering::SeqCst) {
        let error = json!({ "error": { "message": "access token expired", "code": 190 } });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
    } else {
        Json(accepted_send_response()).into_response()
    }
}

/// Serves stand-ins for both upstream APIs on an ephemeral port and returns
/// the base URL shared by the two clients.
async fn spawn_upstream(log: UpstreamLog) -> String {
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v17.0/{phone_number_id}/messages", post(send_message))
        .with_state(log);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

pub struct TestApp {
    pub router: Router,
    pub log: UpstreamLog,
    pub upload_dir: TempDir,
}

/// Full application router wired against the stub upstream, with uploads
/// going to a throwaway directory.
pub async fn spawn_app() -> TestApp {
    let log = UpstreamLog::default();
    let api_base = spawn_upstream(log.clone()).await;
    let upload_dir = tempfile::tempdir().unwrap();

    let config = Config {
        openai_api_key: "test-key".to_string(),
        openai_api_base: api_base.clone(),
        whatsapp_token: "test-token".to_string(),
        whatsapp_phone_number_id: PHONE_NUMBER_ID.to_string(),
        whatsapp_verify_token: VERIFY_TOKEN.to_string(),
        whatsapp_api_base: api_base,
        upload_dir: upload_dir.path().to_path_buf(),
        port: 0,
    };

    let state = Arc::new(AppState::new(&config));
    TestApp {
        router: create_router().with_state(state),
        log,
        upload_dir,
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
