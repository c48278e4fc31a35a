use std::sync::Arc;

use tts::SpeechChain;
use voxdiff_config::ChatProtocol;
use voxdiff_llm::LanguageModel;

use crate::{
    parser::parse_model_reply,
    prompt::build_prompt,
    reply::ChatReply,
    types::{ChatRequest, ChatResponse},
};

/// Handles one chat turn end to end
///
/// Every path produces a reply: model, parse and speech failures are folded
/// into the reply text instead of surfacing as errors.
pub struct ChatService {
    model: Arc<dyn LanguageModel>,
    speech: Option<Arc<SpeechChain>>,
    protocol: ChatProtocol,
}

impl ChatService {
    /// Speech is only attached when the protocol carries it and a chain is given
    pub fn new(model: Arc<dyn LanguageModel>, speech: Option<Arc<SpeechChain>>, protocol: ChatProtocol) -> Self {
        Self {
            model,
            speech: speech.filter(|_| protocol.speaks()),
            protocol,
        }
    }

    pub const fn protocol(&self) -> ChatProtocol {
        self.protocol
    }

    /// Produce the reply for a request, rendered in the configured protocol
    pub async fn respond(&self, request: &ChatRequest) -> ChatResponse {
        let mut reply = self.reply(request).await;

        if let Some(speech) = &self.speech {
            reply.speech = Some(speech.speak(reply.speech_input()).await);
        }

        ChatResponse::render(reply, self.protocol)
    }

    async fn reply(&self, request: &ChatRequest) -> ChatReply {
        let Some(selected_code) = request.selected_code() else {
            tracing::debug!("no code selected, asking for a selection");
            return ChatReply::clarification();
        };

        let prompt = build_prompt(&request.message, selected_code);

        let raw = match self.model.generate(&prompt).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(provider = self.model.name(), %error, "language model call failed");
                return ChatReply::model_failure(error);
            }
        };

        match parse_model_reply(&raw) {
            Some(parsed) => ChatReply::from_model_reply(parsed),
            None => {
                tracing::warn!(reply_len = raw.len(), "model reply could not be parsed, relaying raw text");
                ChatReply::unparsed(&raw)
            }
        }
    }
}
