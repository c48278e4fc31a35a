use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use voxdiff_config::{ELEVENLABS_MODEL, ElevenLabsConfig};

use crate::{error::TtsError, http_client::http_client, types::SpeechAudio};

use super::SpeechProvider;

const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";

/// `ElevenLabs` TTS provider
pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    voice_id: String,
    timeout: Duration,
    name: String,
}

impl ElevenLabsProvider {
    pub fn new(config: &ElevenLabsConfig) -> crate::error::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TtsError::ConfigError("API key required for ElevenLabs".to_string()))?;

        let client = http_client(config.timeout)
            .map_err(|e| TtsError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.as_ref().map_or_else(
            || DEFAULT_ELEVENLABS_API_URL.to_string(),
            |url| url.as_str().trim_end_matches('/').to_string(),
        );

        Ok(Self {
            client,
            base_url,
            api_key,
            voice_id: config.voice_id.clone(),
            timeout: config.timeout,
            name: "elevenlabs".to_string(),
        })
    }
}

#[derive(serde::Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, text: &str) -> crate::error::Result<SpeechAudio> {
        let url = format!("{}/text-to-speech/{}", self.base_url, self.voice_id);

        tracing::debug!(
            "ElevenLabs TTS request: model={ELEVENLABS_MODEL}, voice={}, input_len={}",
            self.voice_id,
            text.len(),
        );

        let body = ElevenLabsRequest {
            text,
            model_id: ELEVENLABS_MODEL,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout {
                        provider: self.name.clone(),
                        timeout: self.timeout,
                    }
                } else {
                    TtsError::ConnectionError(format!("Failed to send request to ElevenLabs: {e}"))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status.as_u16() {
                401 => TtsError::AuthenticationFailed(error_text),
                400 | 422 => TtsError::InvalidRequest(error_text),
                _ => TtsError::ProviderApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::ConnectionError(format!("Failed to read ElevenLabs response body: {e}")))?;

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio(self.name.clone()));
        }

        tracing::debug!("ElevenLabs TTS synthesis complete, {} bytes", audio.len());

        Ok(SpeechAudio {
            audio: audio.to_vec(),
            content_type: "audio/mpeg".to_string(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
