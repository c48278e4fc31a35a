//! Best-effort speech synthesis
//!
//! Providers are tried in order until one produces audio. A chain whose
//! providers all fail yields empty audio instead of an error, so speech can
//! never hold back a text reply.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod chain;
mod error;
mod http_client;
mod provider;
mod types;

use std::sync::Arc;

pub use chain::SpeechChain;
pub use error::{Result, TtsError};
pub use provider::{SpeechProvider, command::CommandProvider, elevenlabs::ElevenLabsProvider};
pub use types::{SpeechAudio, SynthesizedSpeech};

/// Build the speech chain from configuration
///
/// `ElevenLabs` comes first when it has an API key, the command engine
/// second when enabled.
pub fn build_chain(config: &voxdiff_config::TtsConfig) -> anyhow::Result<Arc<SpeechChain>> {
    let mut providers: Vec<Box<dyn SpeechProvider>> = Vec::new();

    if config.elevenlabs.api_key.is_some() {
        let provider = ElevenLabsProvider::new(&config.elevenlabs)
            .map_err(|e| anyhow::anyhow!("Failed to initialize ElevenLabs provider: {e}"))?;
        providers.push(Box::new(provider));
    }

    if config.fallback.enabled {
        providers.push(Box::new(CommandProvider::new(&config.fallback)));
    }

    let chain = SpeechChain::new(providers);

    if chain.provider_names().is_empty() {
        tracing::warn!("No TTS providers configured, replies will carry empty audio");
    } else {
        tracing::info!(providers = ?chain.provider_names(), "TTS chain initialized");
    }

    Ok(Arc::new(chain))
}
