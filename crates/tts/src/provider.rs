pub mod command;
pub mod elevenlabs;

use async_trait::async_trait;

use crate::types::SpeechAudio;

/// One way of turning text into audio
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize text to speech
    async fn synthesize(&self, text: &str) -> crate::error::Result<SpeechAudio>;

    /// Get the provider name
    fn name(&self) -> &str;
}
