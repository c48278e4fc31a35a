//! Google Generative Language API wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// Google `generateContent` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRequest {
    /// Conversation contents
    pub contents: Vec<GoogleContent>,
    /// Generation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GoogleGenerationConfig>,
}

impl GoogleRequest {
    /// Single-turn user prompt
    pub fn user_prompt(prompt: &str, json_mode: bool) -> Self {
        Self {
            contents: vec![GoogleContent {
                role: Some("user".to_string()),
                parts: vec![GooglePart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: json_mode.then(|| GoogleGenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        }
    }
}

/// Google content object containing role and parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleContent {
    /// Role ("user" or "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<GooglePart>,
}

/// Individual part within a Google content object
///
/// Only text parts are produced or consumed here; other part kinds
/// deserialize with `text: None` and are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GooglePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Generation configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    /// Structured output mime type (`application/json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

// -- Response types --

/// Google `generateContent` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    /// Set when the prompt itself was blocked
    #[serde(default)]
    pub prompt_feedback: Option<GooglePromptFeedback>,
}

impl GoogleResponse {
    /// Concatenated text of the first candidate, if it has any
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        Some(text)
    }

    /// Why no text came back, for error reporting
    pub fn missing_text_reason(&self) -> String {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            return format!("prompt blocked ({reason})");
        }

        match self.candidates.first() {
            None => "no candidates returned".to_string(),
            Some(candidate) => format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

/// Generated candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCandidate {
    /// Generated content, absent when the candidate was filtered
    #[serde(default)]
    pub content: Option<GoogleContent>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

// -- Error response --

/// Google error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleErrorResponse {
    /// Error details
    pub error: GoogleErrorDetail,
}

/// Google error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleErrorDetail {
    /// HTTP status code
    pub code: u32,
    /// Error message
    pub message: String,
    /// Error status string
    #[serde(default)]
    pub status: String,
}
