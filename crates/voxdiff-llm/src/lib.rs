//! Language model client used by the chat endpoint
//!
//! A single non-streaming `generateContent` call against Gemini, behind the
//! [`LanguageModel`] trait so the orchestrator can be exercised without a
//! network.

mod error;
mod protocol;
mod provider;

use std::sync::Arc;

pub use error::LlmError;
pub use provider::{LanguageModel, google::GeminiProvider};

/// Build the configured language model
///
/// # Errors
///
/// Returns an error if the API key is missing or the HTTP client cannot be
/// constructed
pub fn build_model(config: &voxdiff_config::LlmConfig) -> anyhow::Result<Arc<dyn LanguageModel>> {
    let provider = GeminiProvider::new(config).map_err(|e| anyhow::anyhow!("Failed to initialize Gemini client: {e}"))?;

    tracing::debug!(model = provider.model(), "language model initialized");

    Ok(Arc::new(provider))
}
