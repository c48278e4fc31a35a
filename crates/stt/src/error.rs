use std::time::Duration;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;
use voxdiff_core::HttpError;

pub type Result<T> = std::result::Result<T, SttError>;

/// Transcription errors, all surfaced to the caller
#[derive(Debug, Error)]
pub enum SttError {
    /// Request audio could not be decoded
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    /// Whisper binary or model could not be loaded
    #[error("Speech recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Engine ran but did not produce a transcription
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Engine exceeded its time budget
    #[error("Transcription timed out after {0:?}")]
    Timeout(Duration),

    /// Temporary file handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError for SttError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAudio(_) => StatusCode::BAD_REQUEST,
            Self::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::TranscriptionFailed(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidAudio(_) => "invalid_request_error",
            Self::EngineUnavailable(_) => "engine_unavailable",
            Self::TranscriptionFailed(_) | Self::Timeout(_) => "transcription_error",
            Self::Io(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Io(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for SttError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "transcription request failed");
        voxdiff_core::error_response(&self)
    }
}
