use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{io::AsyncReadExt, process::Child};
use voxdiff_config::SttConfig;

use crate::error::{Result, SttError};

/// Magic numbers accepted at the start of a model file (GGML, GGUF)
const MODEL_MAGICS: [&[u8; 4]; 2] = [b"lmgg", b"GGUF"];

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A loaded speech recognizer that works on audio files
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Transcribe the audio file at `audio`
    async fn transcribe_file(&self, audio: &Path, language: &str) -> Result<String>;
}

/// Produces the process-wide speech engine
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>>;
}

/// Starts a [`WhisperEngine`] from the `[stt]` configuration
pub struct WhisperLoader {
    program: PathBuf,
    model_path: PathBuf,
    language: String,
    convert: bool,
    startup_timeout: Duration,
    timeout: Duration,
}

impl WhisperLoader {
    pub fn new(config: &SttConfig) -> Self {
        Self {
            program: config.program.clone(),
            model_path: config.model_path.clone(),
            language: config.language.clone(),
            convert: config.convert,
            startup_timeout: config.startup_timeout,
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl EngineLoader for WhisperLoader {
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>> {
        let program = resolve_program(&self.program)
            .ok_or_else(|| SttError::EngineUnavailable(format!("'{}' not found", self.program.display())))?;

        verify_model(&self.model_path).await?;

        let port = free_port()?;

        let mut command = tokio::process::Command::new(&program);
        command
            .arg("-m")
            .arg(&self.model_path)
            .arg("-l")
            .arg(&self.language)
            .args(["--host", "127.0.0.1", "--port"])
            .arg(port.to_string());

        if self.convert {
            command.arg("--convert");
        }

        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SttError::EngineUnavailable(format!("failed to start {}: {e}", program.display())))?;

        tracing::info!(
            program = %program.display(),
            model = %self.model_path.display(),
            port,
            "starting whisper server"
        );

        let engine = WhisperEngine::start(child, port, self.startup_timeout, self.timeout).await?;

        Ok(Arc::new(engine))
    }
}

/// A running whisper.cpp server holding the loaded model
///
/// The child process is killed when the engine is dropped.
pub struct WhisperEngine {
    child: Option<Mutex<Child>>,
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl WhisperEngine {
    /// Wait until the server accepts connections, which happens once the
    /// model is in memory
    async fn start(mut child: Child, port: u16, startup_timeout: Duration, timeout: Duration) -> Result<Self> {
        let deadline = tokio::time::Instant::now() + startup_timeout;

        loop {
            if let Some(status) = child.try_wait()? {
                return Err(SttError::EngineUnavailable(format!(
                    "whisper server exited during startup with {status}"
                )));
            }

            if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                break;
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(SttError::EngineUnavailable(format!(
                    "whisper server not ready after {startup_timeout:?}"
                )));
            }

            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        tracing::info!(port, "whisper engine loaded");

        let mut engine = Self::connect(&format!("http://127.0.0.1:{port}"), timeout)?;
        engine.child = Some(Mutex::new(child));

        Ok(engine)
    }

    /// Engine backed by a server that is already listening at `base_url`
    fn connect(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SttError::EngineUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            child: None,
            endpoint: format!("{}/inference", base_url.trim_end_matches('/')),
            client,
            timeout,
        })
    }
}

#[async_trait]
impl SpeechEngine for WhisperEngine {
    async fn transcribe_file(&self, audio: &Path, language: &str) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map_or_else(|| "audio.wav".to_string(), |name| name.to_string_lossy().into_owned());

        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name))
            .text("language", language.to_string())
            .text("response_format", "json");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SttError::Timeout(self.timeout)
                } else {
                    SttError::TranscriptionFailed(format!("whisper server unreachable: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SttError::TranscriptionFailed(format!("failed to read whisper response: {e}")))?;

        let parsed = serde_json::from_str::<InferenceResponse>(&body).ok();

        match parsed {
            Some(InferenceResponse {
                text: Some(text),
                error: None,
            }) if status.is_success() => Ok(text),
            Some(InferenceResponse { error: Some(error), .. }) => Err(SttError::TranscriptionFailed(error)),
            _ => Err(SttError::TranscriptionFailed(format!("whisper server returned {status}: {body}"))),
        }
    }
}

impl Drop for WhisperEngine {
    fn drop(&mut self) {
        if let Some(child) = &self.child
            && let Ok(mut child) = child.lock()
        {
            let _ = child.start_kill();
        }
    }
}

/// Locate `program` on disk, searching `PATH` for bare names
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;

    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Ask the OS for an unused local port
fn free_port() -> Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

async fn verify_model(model_path: &Path) -> Result<()> {
    let unavailable = |reason: String| SttError::EngineUnavailable(format!("model {}: {reason}", model_path.display()));

    let mut file = tokio::fs::File::open(model_path)
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    let mut magic = [0_u8; 4];
    file.read_exact(&mut magic)
        .await
        .map_err(|e| unavailable(format!("unreadable header: {e}")))?;

    if !MODEL_MAGICS.iter().any(|expected| **expected == magic) {
        return Err(unavailable("not a GGML or GGUF model".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use axum::{Json, Router, body::Bytes, extract::State, routing::post};
    use serde_json::{Value, json};

    use super::*;

    fn model_file(dir: &Path, header: &[u8]) -> PathBuf {
        let path = dir.join("model.bin");
        std::fs::write(&path, header).unwrap();
        path
    }

    fn loader(program: &Path, model_path: &Path) -> WhisperLoader {
        WhisperLoader::new(&SttConfig {
            program: program.to_path_buf(),
            model_path: model_path.to_path_buf(),
            startup_timeout: Duration::from_secs(5),
            ..SttConfig::default()
        })
    }

    /// Serve `router` on a random port, returning its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn audio_file(dir: &Path) -> PathBuf {
        let audio = dir.join("clip.webm");
        std::fs::write(&audio, [0x1A, 0x45, 0xDF, 0xA3, 0x01]).unwrap();
        audio
    }

    #[tokio::test]
    async fn accepts_ggml_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_file(dir.path(), b"lmgg\x01\x00\x00\x00");

        assert!(verify_model(&model).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_foreign_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_file(dir.path(), b"PK\x03\x04zip");

        let err = verify_model(&model).await.unwrap_err();

        assert!(matches!(err, SttError::EngineUnavailable(ref msg) if msg.contains("not a GGML")));
    }

    #[tokio::test]
    async fn rejects_missing_model_file() {
        let err = verify_model(Path::new("/nonexistent/ggml-base.en.bin")).await.unwrap_err();
        assert!(matches!(err, SttError::EngineUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let model = model_file(dir.path(), b"lmgg");

        let err = loader(Path::new("voxdiff-no-such-whisper"), &model).load().await.err().unwrap();

        assert!(matches!(err, SttError::EngineUnavailable(ref msg) if msg.contains("not found")));
    }

    #[cfg(unix)]
    #[test]
    fn resolves_bare_names_on_path() {
        assert!(resolve_program(Path::new("sh")).is_some());
        assert!(resolve_program(Path::new("/nonexistent/bin/sh")).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn server_exiting_at_startup_is_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let model = model_file(dir.path(), b"GGUF");
        let script = dir.path().join("broken-whisper-server");
        std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = loader(&script, &model).load().await.err().unwrap();

        assert!(matches!(err, SttError::EngineUnavailable(ref msg) if msg.contains("exited during startup")));
    }

    #[tokio::test]
    async fn every_transcription_uses_the_running_server() {
        let requests = Arc::new(AtomicU32::new(0));
        let router = Router::new()
            .route(
                "/inference",
                post(|State(requests): State<Arc<AtomicU32>>, body: Bytes| async move {
                    requests.fetch_add(1, Ordering::SeqCst);
                    let body = String::from_utf8_lossy(&body);
                    assert!(body.contains("name=\"file\"; filename=\"clip.webm\""));
                    assert!(body.contains("name=\"response_format\""));
                    Json(json!({"text": " hello from whisper\n"}))
                }),
            )
            .with_state(Arc::clone(&requests));
        let engine = WhisperEngine::connect(&serve(router).await, Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let audio = audio_file(dir.path());

        assert_eq!(engine.transcribe_file(&audio, "en").await.unwrap(), " hello from whisper\n");
        assert_eq!(engine.transcribe_file(&audio, "en").await.unwrap(), " hello from whisper\n");
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn server_error_is_a_transcription_failure() {
        let router = Router::new().route(
            "/inference",
            post(|| async {
                (
                    http::StatusCode::BAD_REQUEST,
                    Json::<Value>(json!({"error": "failed to read audio data"})),
                )
            }),
        );
        let engine = WhisperEngine::connect(&serve(router).await, Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = engine.transcribe_file(&audio_file(dir.path()), "en").await.unwrap_err();

        assert!(matches!(err, SttError::TranscriptionFailed(ref msg) if msg == "failed to read audio data"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transcription_failure() {
        let port = free_port().unwrap();
        let engine = WhisperEngine::connect(&format!("http://127.0.0.1:{port}"), Duration::from_secs(5)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = engine.transcribe_file(&audio_file(dir.path()), "en").await.unwrap_err();

        assert!(matches!(err, SttError::TranscriptionFailed(ref msg) if msg.contains("unreachable")));
    }
}
