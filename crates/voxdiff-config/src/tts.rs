use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// `ElevenLabs` model used for every synthesis
pub const ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";

/// Voice used when none is configured ("Rachel")
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Speech synthesis configuration
///
/// Providers are tried in a fixed order: `ElevenLabs` first, then the local
/// command engine.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Attach synthesized audio to chat replies
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Primary provider
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
    /// Offline fallback engine
    #[serde(default)]
    pub fallback: CommandTtsConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            elevenlabs: ElevenLabsConfig::default(),
            fallback: CommandTtsConfig::default(),
        }
    }
}

/// `ElevenLabs` provider configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElevenLabsConfig {
    /// API key, required while synthesis is enabled
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Voice identifier
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Request timeout (e.g. "10s")
    #[serde(default = "default_elevenlabs_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: default_voice_id(),
            base_url: None,
            timeout: default_elevenlabs_timeout(),
        }
    }
}

/// Fallback engine run as a local program
///
/// `{text}` and `{output}` in `args` are replaced with the text to speak and
/// the path of the temporary audio file the program must write.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandTtsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Mime type of the audio the program produces
    #[serde(default = "default_mime")]
    pub mime: String,
    #[serde(default = "default_command_timeout", deserialize_with = "crate::duration::deserialize")]
    pub timeout: Duration,
}

impl Default for CommandTtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: default_program(),
            args: default_args(),
            mime: default_mime(),
            timeout: default_command_timeout(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

const fn default_elevenlabs_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_program() -> String {
    "gtts-cli".to_string()
}

fn default_args() -> Vec<String> {
    ["--lang", "en", "--output", "{output}", "--", "{text}"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_mime() -> String {
    "audio/mpeg".to_string()
}

const fn default_command_timeout() -> Duration {
    Duration::from_secs(30)
}
