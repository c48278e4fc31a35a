use serde::{Deserialize, Serialize};
use voxdiff_config::ChatProtocol;

use crate::reply::ChatReply;

/// Body of `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub selected_code: Option<String>,
    /// Earlier turns, accepted for compatibility and not interpreted
    #[serde(default)]
    pub history: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl ChatRequest {
    /// The selection, unless it is absent or whitespace-only
    pub fn selected_code(&self) -> Option<&str> {
        self.selected_code.as_deref().filter(|code| !code.trim().is_empty())
    }
}

/// Voice protocol reply
#[derive(Debug, Clone, Serialize)]
pub struct VoiceChatResponse {
    pub assistant_text: String,
    pub speak_text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub needs_clarification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_mime: Option<String>,
}

/// Patch protocol reply
#[derive(Debug, Clone, Serialize)]
pub struct PatchChatResponse {
    pub assistant_text: String,
    pub speak_text: String,
    pub needs_clarification: bool,
    pub clarifying_question: Option<String>,
    pub proposed_patch: Option<ProposedPatch>,
    pub apply_label: Option<String>,
}

/// Whole-selection replacement offered to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProposedPatch {
    ReplaceSelection { new_code: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Voice(VoiceChatResponse),
    Patch(PatchChatResponse),
}

impl ChatResponse {
    /// Render a reply in the given wire protocol
    pub fn render(reply: ChatReply, protocol: ChatProtocol) -> Self {
        let needs_clarification = reply.needs_clarification();

        match protocol {
            ChatProtocol::Voice => {
                let (audio_base64, audio_mime) = reply
                    .speech
                    .map(|speech| (speech.audio_base64, speech.mime))
                    .unzip();

                Self::Voice(VoiceChatResponse {
                    assistant_text: reply.assistant_text,
                    speak_text: reply.speak_text,
                    needs_clarification,
                    modified_code: reply.modified_code,
                    audio_base64,
                    audio_mime,
                })
            }
            ChatProtocol::Patch => Self::Patch(PatchChatResponse {
                assistant_text: reply.assistant_text,
                speak_text: reply.speak_text,
                needs_clarification,
                clarifying_question: reply.clarifying_question,
                proposed_patch: reply
                    .modified_code
                    .map(|new_code| ProposedPatch::ReplaceSelection { new_code }),
                apply_label: reply.apply_label,
            }),
        }
    }
}
