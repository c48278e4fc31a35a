use thiserror::Error;

/// Errors that can occur while asking the language model for a reply
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request did not complete within the configured timeout
    #[error("request to {provider} timed out")]
    Timeout { provider: String },

    /// Network failure before a response arrived
    #[error("connection error: {0}")]
    Connection(String),

    /// Provider rejected the API key
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Provider answered 200 without any usable text
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Configuration problem detected while building the client
    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Classify a transport error from `reqwest`
    pub(crate) fn from_transport(provider: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Connection(error.to_string())
        }
    }
}
