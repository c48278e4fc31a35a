//! Google Generative Language API (Gemini) provider

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;
use voxdiff_config::{GEMINI_MODEL, LlmConfig};

use super::LanguageModel;
use crate::error::LlmError;
use crate::protocol::google::{GoogleErrorResponse, GoogleRequest, GoogleResponse};

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini text generation client
pub struct GeminiProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    json_mode: bool,
}

impl GeminiProvider {
    /// Create from the `[llm]` configuration section
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if no API key is configured or the HTTP
    /// client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LlmError::Config("Gemini API key is not configured".to_string()))?;

        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| LlmError::Config(e.to_string()))?,
        };

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name: "gemini".to_string(),
            client,
            base_url,
            api_key,
            json_mode: config.json_mode,
        })
    }

    /// Model identifier requests are sent to
    #[must_use]
    pub const fn model(&self) -> &'static str {
        GEMINI_MODEL
    }

    /// Build the `generateContent` endpoint URL
    fn generate_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.model())
    }
}

#[async_trait]
impl LanguageModel for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let wire_request = GoogleRequest::user_prompt(prompt, self.json_mode);

        tracing::debug!(
            provider = %self.name,
            model = self.model(),
            prompt_len = prompt.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.name, error = %e, "upstream request failed");
                LlmError::from_transport(&self.name, &e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map_or(body, |parsed| parsed.error.message);

            tracing::warn!(provider = %self.name, %status, "upstream returned error");

            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed(message),
                code => LlmError::Upstream { status: code, message },
            });
        }

        let wire_response: GoogleResponse = response.json().await.map_err(|e| LlmError::Upstream {
            status: status.as_u16(),
            message: format!("failed to parse response: {e}"),
        })?;

        let text = wire_response
            .text()
            .ok_or_else(|| LlmError::EmptyResponse(wire_response.missing_text_reason()))?;

        tracing::debug!(provider = %self.name, reply_len = text.len(), "generateContent complete");

        Ok(text)
    }
}
