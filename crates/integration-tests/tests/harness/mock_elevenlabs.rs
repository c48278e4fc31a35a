//! Mock `ElevenLabs` text-to-speech backend

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing,
};
use tokio_util::sync::CancellationToken;

/// Audio bytes returned on success
pub const MOCK_AUDIO: &[u8] = b"ID3-mock";

struct MockElevenLabsState {
    status: StatusCode,
    request_count: AtomicU32,
}

pub struct MockElevenLabs {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockElevenLabsState>,
}

impl MockElevenLabs {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_status(StatusCode::OK).await
    }

    /// Reject every request with 401, like an invalid API key
    pub async fn unauthorized() -> anyhow::Result<Self> {
        Self::start_with_status(StatusCode::UNAUTHORIZED).await
    }

    async fn start_with_status(status: StatusCode) -> anyhow::Result<Self> {
        let state = Arc::new(MockElevenLabsState {
            status,
            request_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/v1/text-to-speech/{voice_id}", routing::post(text_to_speech))
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

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockElevenLabs {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn text_to_speech(State(state): State<Arc<MockElevenLabsState>>, Path(_voice_id): Path<String>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    if state.status.is_success() {
        ([(header::CONTENT_TYPE, "audio/mpeg")], MOCK_AUDIO).into_response()
    } else {
        (state.status, r#"{"detail":{"status":"invalid_api_key"}}"#).into_response()
    }
}
