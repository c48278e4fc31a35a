#![allow(clippy::must_use_candidate)]

pub mod chat;
pub mod cors;
mod duration;
mod env;
pub mod health;
pub mod llm;
mod loader;
pub mod server;
pub mod stt;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use chat::*;
pub use cors::*;
pub use health::*;
pub use llm::*;
pub use server::*;
pub use stt::*;
pub use telemetry::TelemetryConfig;
pub use tts::*;

/// Top-level VoxDiff configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Speech synthesis configuration
    #[serde(default)]
    pub tts: TtsConfig,
    /// Speech recognition configuration
    #[serde(default)]
    pub stt: SttConfig,
    /// Chat endpoint configuration
    #[serde(default)]
    pub chat: ChatConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
