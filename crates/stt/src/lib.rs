#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod engine;
mod error;
mod transcriber;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use voxdiff_core::ExtractPayload;

pub use engine::{EngineLoader, SpeechEngine, WhisperEngine, WhisperLoader};
pub use error::{Result, SttError};
pub use transcriber::Transcriber;
pub use types::{TranscriptionRequest, TranscriptionResponse};

/// Build the transcriber from configuration
///
/// Nothing is loaded here; the Whisper engine is loaded by the first
/// transcription request.
pub fn build_transcriber(config: &voxdiff_config::SttConfig) -> Arc<Transcriber> {
    tracing::debug!(
        program = %config.program.display(),
        model = %config.model_path.display(),
        "STT configured, engine loads on first use"
    );

    Arc::new(Transcriber::new(Box::new(WhisperLoader::new(config)), config.language.clone()))
}

/// Create the endpoint router for STT
pub fn endpoint_router() -> Router<Arc<Transcriber>> {
    Router::new().route("/stt", post(transcribe))
}

/// Handle transcription requests
async fn transcribe(
    State(transcriber): State<Arc<Transcriber>>,
    ExtractPayload(request): ExtractPayload<TranscriptionRequest>,
) -> Result<Json<TranscriptionResponse>> {
    tracing::debug!(
        encoded_len = request.audio_base64.len(),
        engine_loaded = transcriber.is_loaded(),
        "STT transcription handler called"
    );

    let text = transcriber.transcribe(&request.audio_base64).await?;

    tracing::debug!(text_len = text.len(), "Transcription complete");

    Ok(Json(TranscriptionResponse { text }))
}
