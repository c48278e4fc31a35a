use tts::SynthesizedSpeech;

use crate::parser::ModelReply;

pub(crate) const SELECT_CODE_MESSAGE: &str = "Please select some code in the editor so I can help you.";
pub(crate) const SELECT_CODE_QUESTION: &str = "Can you select the code you want to work on?";
pub(crate) const BACKEND_ERROR_SPEECH: &str = "There was a backend error.";
pub(crate) const UNPARSED_REPLY: &str = "I could not parse the model response.";
pub(crate) const ALREADY_CLEAN: &str = "The code is already clean.";
pub(crate) const IMPROVED_CODE: &str = "Here is the improved code.";
pub(crate) const APPLY_LABEL: &str = "Apply patch";

/// Outcome of one chat turn, before it is rendered in a wire protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub assistant_text: String,
    pub speak_text: String,
    pub clarifying_question: Option<String>,
    pub modified_code: Option<String>,
    pub apply_label: Option<String>,
    pub speech: Option<SynthesizedSpeech>,
}

impl ChatReply {
    fn text(text: impl Into<String>) -> Self {
        let text = text.into();

        Self {
            speak_text: text.clone(),
            assistant_text: text,
            clarifying_question: None,
            modified_code: None,
            apply_label: None,
            speech: None,
        }
    }

    /// Ask the user to select code first
    pub fn clarification() -> Self {
        Self {
            clarifying_question: Some(SELECT_CODE_QUESTION.to_string()),
            ..Self::text(SELECT_CODE_MESSAGE)
        }
    }

    /// Show the model error, speak a generic sentence
    pub fn model_failure(detail: impl std::fmt::Display) -> Self {
        Self {
            assistant_text: format!("Error from AI model: {detail}"),
            speak_text: BACKEND_ERROR_SPEECH.to_string(),
            ..Self::text(String::new())
        }
    }

    /// Relay a reply that could not be parsed as-is
    pub fn unparsed(raw: &str) -> Self {
        let raw = raw.trim();

        if raw.is_empty() {
            Self::text(UNPARSED_REPLY)
        } else {
            Self::text(raw)
        }
    }

    /// Interpret a parsed model reply
    ///
    /// A null or blank `improved_code` means no change. Otherwise the code is
    /// normalized to end with exactly one newline.
    pub fn from_model_reply(reply: ModelReply) -> Self {
        let explanation = reply.explanation.as_str();
        let blank = explanation.trim().is_empty();

        match reply.improved_code.filter(|code| !code.trim().is_empty()) {
            None => Self::text(if blank { ALREADY_CLEAN } else { explanation }),
            Some(code) => Self {
                modified_code: Some(format!("{}\n", code.trim_end())),
                apply_label: Some(APPLY_LABEL.to_string()),
                ..Self::text(if blank { IMPROVED_CODE } else { explanation })
            },
        }
    }

    pub const fn needs_clarification(&self) -> bool {
        self.clarifying_question.is_some()
    }

    /// Text handed to the speech chain
    pub fn speech_input(&self) -> &str {
        if self.speak_text.trim().is_empty() { "Done." } else { &self.speak_text }
    }
}
