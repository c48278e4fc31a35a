use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Gemini model every chat request is sent to
pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Language model (Gemini) configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Gemini API key, required at startup
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override for the Generative Language API
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Request timeout (e.g. "60s")
    #[serde(default = "default_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
    /// Ask Gemini for `application/json` output instead of free text
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: default_timeout(),
            json_mode: default_json_mode(),
        }
    }
}

const fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_json_mode() -> bool {
    true
}
