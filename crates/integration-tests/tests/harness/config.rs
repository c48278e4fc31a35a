//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use secrecy::SecretString;
use voxdiff_config::{ChatProtocol, Config, CorsConfig};

/// Builder for constructing test configurations
///
/// Starts with speech synthesis off and a transcriber whose engine can never
/// load, so no test depends on local programs unless it opts in.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration talking to a mock Gemini server
    pub fn new(gemini_base_url: &str) -> Self {
        let mut config = Config::default();

        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.llm.api_key = Some(SecretString::from("test-gemini-key"));
        config.llm.base_url = Some(gemini_base_url.parse().expect("valid URL"));
        config.tts.enabled = false;
        config.stt.program = "voxdiff-missing-whisper".into();

        Self { config }
    }

    pub fn with_protocol(mut self, protocol: ChatProtocol) -> Self {
        self.config.chat.protocol = protocol;
        self
    }

    /// Enable speech with `ElevenLabs` pointed at a mock backend
    pub fn with_elevenlabs(mut self, base_url: &str) -> Self {
        self.config.tts.enabled = true;
        self.config.tts.elevenlabs.api_key = Some(SecretString::from("test-elevenlabs-key"));
        self.config.tts.elevenlabs.base_url = Some(base_url.parse().expect("valid URL"));
        self.config.tts.fallback.enabled = false;
        self
    }

    /// Use a shell one-liner as the fallback engine
    ///
    /// The script receives the output path as `$1`.
    pub fn with_fallback_script(mut self, script: &str) -> Self {
        self.config.tts.fallback.enabled = true;
        self.config.tts.fallback.program = "sh".to_owned();
        self.config.tts.fallback.args = vec!["-c".to_owned(), script.to_owned(), "sh".to_owned(), "{output}".to_owned()];
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn without_stt(mut self) -> Self {
        self.config.stt.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
