use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Failures of a single speech provider
#[derive(Debug, Error)]
pub enum TtsError {
    /// Provider rejected the API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider rejected the request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider API returned an error
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Provider did not answer in time
    #[error("{provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    /// Local engine could not be run or exited unsuccessfully
    #[error("Engine failed: {0}")]
    EngineFailed(String),

    /// Provider reported success without producing audio
    #[error("{0} returned no audio")]
    EmptyAudio(String),

    /// Temporary file handling failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
