use serde::{Deserialize, Serialize};

/// Recorded audio sent by the editor
#[derive(Debug, Deserialize)]
pub struct TranscriptionRequest {
    /// Base64-encoded audio file
    #[serde(rename = "audioBase64")]
    pub audio_base64: String,
}

/// Transcribed text
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}
