//! Mock Gemini `generateContent` backend
//!
//! Answers every request with a fixed reply text, or with a fixed error
//! status, and records the prompts it receives.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

enum Behavior {
    Reply(String),
    Fail(StatusCode),
}

struct MockGeminiState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// Text of the single user part
    pub fn prompt(&self) -> &str {
        self.body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default()
    }
}

pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

impl MockGemini {
    /// Reply to every request with `text` as the candidate's content
    pub async fn replying(text: &str) -> anyhow::Result<Self> {
        Self::start(Behavior::Reply(text.to_owned())).await
    }

    /// Fail every request with `status`
    pub async fn failing(status: u16) -> anyhow::Result<Self> {
        Self::start(Behavior::Fail(StatusCode::from_u16(status)?)).await
    }

    async fn start(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1beta/models/{model}", routing::post(generate_content))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL, including the `/v1beta` version prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn generate_content(
    State(state): State<Arc<MockGeminiState>>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        model,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });

    match &state.behavior {
        Behavior::Reply(text) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP",
            }],
        }))
        .into_response(),
        Behavior::Fail(status) => (
            *status,
            Json(json!({"error": {"code": status.as_u16(), "message": "mock failure", "status": "INTERNAL"}})),
        )
            .into_response(),
    }
}
