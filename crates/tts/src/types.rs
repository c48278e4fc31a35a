use base64::{Engine, engine::general_purpose::STANDARD};

/// Raw audio produced by one provider
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// Raw audio bytes
    pub audio: Vec<u8>,
    /// Content type of the audio (e.g. "audio/mpeg")
    pub content_type: String,
}

/// Audio ready to embed in a JSON reply
///
/// The empty value (`""`, `""`) stands for "no audio": every provider failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub audio_base64: String,
    pub mime: String,
}

impl SynthesizedSpeech {
    pub fn empty() -> Self {
        Self::default()
    }

    pub const fn is_empty(&self) -> bool {
        self.audio_base64.is_empty()
    }
}

impl From<SpeechAudio> for SynthesizedSpeech {
    fn from(audio: SpeechAudio) -> Self {
        Self {
            audio_base64: STANDARD.encode(&audio.audio),
            mime: audio.content_type,
        }
    }
}
