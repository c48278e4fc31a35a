pub mod google;

use async_trait::async_trait;

use crate::error::LlmError;

/// A text generation backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Send one prompt and return the model's raw text reply
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
