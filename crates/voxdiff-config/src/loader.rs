use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a referenced environment
    /// variable is missing, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// `{{ env.VAR }}` placeholders are expanded before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a required API key is missing or the CORS and
    /// tracing settings are contradictory
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_llm_config()?;
        self.validate_tts_config()?;
        self.validate_cors_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    /// Whether chat replies will go through the speech chain
    pub const fn speech_enabled(&self) -> bool {
        self.tts.enabled && self.chat.protocol.speaks()
    }

    fn validate_llm_config(&self) -> anyhow::Result<()> {
        if !is_present(self.llm.api_key.as_ref()) {
            anyhow::bail!("llm.api_key is required (set GEMINI_API_KEY)");
        }

        Ok(())
    }

    fn validate_tts_config(&self) -> anyhow::Result<()> {
        if self.speech_enabled() && !is_present(self.tts.elevenlabs.api_key.as_ref()) {
            anyhow::bail!("tts.elevenlabs.api_key is required while speech synthesis is enabled (set ELEVENLABS_API_KEY)");
        }

        if self.tts.fallback.enabled && self.tts.fallback.program.trim().is_empty() {
            anyhow::bail!("tts.fallback.program must not be empty when the fallback is enabled");
        }

        Ok(())
    }

    fn validate_cors_config(&self) -> anyhow::Result<()> {
        if let Some(ref cors) = self.server.cors
            && cors.credentials
            && cors.origins.is_any()
        {
            anyhow::bail!("server.cors.credentials cannot be combined with wildcard origins");
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        if let Some(tracing) = self.telemetry.as_ref().and_then(|t| t.tracing.as_ref())
            && !(0.0..=1.0).contains(&tracing.sampling_rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

fn is_present(key: Option<&SecretString>) -> bool {
    key.is_some_and(|key| !key.expose_secret().trim().is_empty())
}
