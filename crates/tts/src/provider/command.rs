use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use voxdiff_config::CommandTtsConfig;

use crate::{error::TtsError, types::SpeechAudio};

use super::SpeechProvider;

/// Offline speech engine run as a child process
///
/// The program writes its audio to a uniquely named temporary file which is
/// read back whole. The file belongs to a `NamedTempFile` guard and is
/// removed on every exit path.
pub struct CommandProvider {
    program: String,
    args: Vec<String>,
    mime: String,
    timeout: Duration,
    name: String,
}

impl CommandProvider {
    pub fn new(config: &CommandTtsConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            mime: config.mime.clone(),
            timeout: config.timeout,
            name: config.program.clone(),
        }
    }
}

/// Replace `{text}` and `{output}` in one pass so text containing a
/// placeholder is passed through literally
fn substitute(arg: &str, text: &str, output: &str) -> String {
    let mut result = String::with_capacity(arg.len());
    let mut rest = arg;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix("{text}") {
            result.push_str(text);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{output}") {
            result.push_str(output);
            rest = after;
        } else {
            result.push('{');
            rest = &tail[1..];
        }
    }

    result.push_str(rest);
    result
}

#[async_trait]
impl SpeechProvider for CommandProvider {
    async fn synthesize(&self, text: &str) -> crate::error::Result<SpeechAudio> {
        let output_file = tempfile::Builder::new()
            .prefix("voxdiff-tts-")
            .suffix(".mp3")
            .tempfile()?;
        let output_path = output_file.path().to_string_lossy().into_owned();

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| substitute(arg, text, &output_path))
            .collect();

        tracing::debug!(program = %self.program, input_len = text.len(), "running local TTS engine");

        let child = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| TtsError::Timeout {
                provider: self.name.clone(),
                timeout: self.timeout,
            })?
            .map_err(|e| TtsError::EngineFailed(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::EngineFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let audio = tokio::fs::read(output_file.path()).await?;

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio(self.name.clone()));
        }

        tracing::debug!(program = %self.program, "local TTS synthesis complete, {} bytes", audio.len());

        Ok(SpeechAudio {
            audio,
            content_type: self.mime.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
