use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Speech recognition configuration
///
/// Transcription runs against a whisper.cpp server process started on first
/// use. The process loads the GGML model once and serves every later request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Expose `POST /stt`
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// whisper.cpp server binary, looked up on `PATH` when relative
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// GGML model file
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Spoken language passed to the engine
    #[serde(default = "default_language")]
    pub language: String,
    /// Let the server convert any input format with ffmpeg (webm, ogg, mp3)
    #[serde(default = "default_convert")]
    pub convert: bool,
    /// Time allowed for the server to load the model and start listening
    #[serde(default = "default_startup_timeout", deserialize_with = "crate::duration::deserialize")]
    pub startup_timeout: Duration,
    /// Time allowed for one transcription
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            program: default_program(),
            model_path: default_model_path(),
            language: default_language(),
            convert: default_convert(),
            startup_timeout: default_startup_timeout(),
            timeout: default_timeout(),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

fn default_program() -> PathBuf {
    PathBuf::from("whisper-server")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/ggml-base.en.bin")
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_convert() -> bool {
    true
}

const fn default_startup_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_timeout() -> Duration {
    Duration::from_secs(120)
}
