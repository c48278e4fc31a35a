use crate::{provider::SpeechProvider, types::SynthesizedSpeech};

/// Ordered list of speech providers, tried until one succeeds
pub struct SpeechChain {
    providers: Vec<Box<dyn SpeechProvider>>,
}

impl SpeechChain {
    pub fn new(providers: Vec<Box<dyn SpeechProvider>>) -> Self {
        Self { providers }
    }

    /// Names of the providers in the order they are tried
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Speak `text` with the first provider that succeeds
    ///
    /// Never fails: when every provider errors the result is
    /// [`SynthesizedSpeech::empty`].
    pub async fn speak(&self, text: &str) -> SynthesizedSpeech {
        for provider in &self.providers {
            match provider.synthesize(text).await {
                Ok(audio) => {
                    tracing::debug!(provider = provider.name(), bytes = audio.audio.len(), "speech synthesized");
                    return audio.into();
                }
                Err(error) => {
                    tracing::warn!(provider = provider.name(), %error, "speech provider failed");
                }
            }
        }

        tracing::warn!("all speech providers failed, returning empty audio");

        SynthesizedSpeech::empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{SpeechAudio, TtsError};

    enum Outcome {
        Audio(&'static [u8]),
        Unauthorized,
        Unreachable,
    }

    struct Scripted {
        name: &'static str,
        outcome: Outcome,
        calls: Arc<AtomicU32>,
    }

    impl Scripted {
        fn boxed(name: &'static str, outcome: Outcome) -> (Box<dyn SpeechProvider>, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            let provider = Self {
                name,
                outcome,
                calls: Arc::clone(&calls),
            };
            (Box::new(provider), calls)
        }
    }

    #[async_trait]
    impl SpeechProvider for Scripted {
        async fn synthesize(&self, _text: &str) -> crate::Result<SpeechAudio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Audio(bytes) => Ok(SpeechAudio {
                    audio: bytes.to_vec(),
                    content_type: "audio/mpeg".to_string(),
                }),
                Outcome::Unauthorized => Err(TtsError::AuthenticationFailed("bad key".to_string())),
                Outcome::Unreachable => Err(TtsError::ConnectionError("refused".to_string())),
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let (primary, _) = Scripted::boxed("primary", Outcome::Audio(b"abc"));
        let (fallback, fallback_calls) = Scripted::boxed("fallback", Outcome::Audio(b"zzz"));
        let chain = SpeechChain::new(vec![primary, fallback]);

        let speech = chain.speak("hi").await;

        assert_eq!(speech.audio_base64, "YWJj");
        assert_eq!(speech.mime, "audio/mpeg");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unauthorized_primary_falls_back() {
        let (primary, primary_calls) = Scripted::boxed("primary", Outcome::Unauthorized);
        let (fallback, fallback_calls) = Scripted::boxed("fallback", Outcome::Audio(b"zzz"));
        let chain = SpeechChain::new(vec![primary, fallback]);

        let speech = chain.speak("hi").await;

        assert!(!speech.is_empty());
        assert_eq!(speech.audio_base64, "enp6");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_failing_yields_empty_audio() {
        let (primary, _) = Scripted::boxed("primary", Outcome::Unreachable);
        let (fallback, _) = Scripted::boxed("fallback", Outcome::Unauthorized);
        let chain = SpeechChain::new(vec![primary, fallback]);

        let speech = chain.speak("hi").await;

        assert_eq!(speech, SynthesizedSpeech::empty());
    }

    #[tokio::test]
    async fn empty_chain_yields_empty_audio() {
        let chain = SpeechChain::new(Vec::new());
        assert!(chain.speak("hi").await.is_empty());
    }

    #[test]
    fn provider_order_is_preserved() {
        let (a, _) = Scripted::boxed("elevenlabs", Outcome::Unreachable);
        let (b, _) = Scripted::boxed("gtts-cli", Outcome::Unreachable);
        let chain = SpeechChain::new(vec![a, b]);

        assert_eq!(chain.provider_names(), vec!["elevenlabs", "gtts-cli"]);
    }
}
