use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use tokio::{io::AsyncWriteExt, sync::OnceCell};

use crate::{
    engine::{EngineLoader, SpeechEngine},
    error::{Result, SttError},
};

/// Turns base64 audio into text with a lazily loaded engine
///
/// The engine is loaded by the first request that needs it and shared by
/// every later one. Concurrent first requests wait on the same load. A
/// failed load is not remembered, so the next request tries again.
pub struct Transcriber {
    loader: Box<dyn EngineLoader>,
    engine: OnceCell<Arc<dyn SpeechEngine>>,
    language: String,
}

impl Transcriber {
    pub fn new(loader: Box<dyn EngineLoader>, language: String) -> Self {
        Self {
            loader,
            engine: OnceCell::new(),
            language,
        }
    }

    /// Whether the engine has been loaded yet
    pub fn is_loaded(&self) -> bool {
        self.engine.initialized()
    }

    async fn engine(&self) -> Result<&Arc<dyn SpeechEngine>> {
        self.engine
            .get_or_try_init(|| async {
                tracing::info!("loading speech recognition engine");
                self.loader.load().await
            })
            .await
    }

    /// Decode and transcribe base64 audio
    ///
    /// The audio is written to a temporary file for the engine and the file
    /// is removed afterwards on every path.
    pub async fn transcribe(&self, audio_base64: &str) -> Result<String> {
        let audio = STANDARD
            .decode(audio_base64.trim())
            .map_err(|e| SttError::InvalidAudio(format!("audioBase64 is not valid base64: {e}")))?;

        if audio.is_empty() {
            return Err(SttError::InvalidAudio("audio is empty".to_string()));
        }

        let engine = self.engine().await?;

        let audio_file = tempfile::Builder::new()
            .prefix("voxdiff-stt-")
            .suffix(audio_extension(&audio))
            .tempfile()?;

        let mut writer = tokio::fs::File::create(audio_file.path()).await?;
        writer.write_all(&audio).await?;
        writer.flush().await?;
        drop(writer);

        let text = engine.transcribe_file(audio_file.path(), &self.language).await?;

        Ok(text.trim().to_string())
    }
}

/// File extension matching the container, so the engine picks the right decoder
fn audio_extension(audio: &[u8]) -> &'static str {
    match audio {
        [b'R', b'I', b'F', b'F', ..] => ".wav",
        [b'O', b'g', b'g', b'S', ..] => ".ogg",
        [b'f', b'L', b'a', b'C', ..] => ".flac",
        [0x1A, 0x45, 0xDF, 0xA3, ..] => ".webm",
        [b'I', b'D', b'3', ..] | [0xFF, 0xE0..=0xFF, ..] => ".mp3",
        _ => ".wav",
    }
}
