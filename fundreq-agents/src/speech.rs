use async_trait::async_trait;
use shared_types::LanguageMode;
use std::process::Stdio;
use std::time::Duration;

pub const ERROR_PREFIX: &str = "Error:";
pub const WARNING_PREFIX: &str = "Could not";
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

const ARABIC: &str = "ar-SA";
const ENGLISH: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("speech recognizer '{0}' is not available")]
    Unavailable(String),

    #[error("audio could not be understood")]
    Unintelligible,

    #[error("speech service failed: {0}")]
    Service(String),

    #[error("listening timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Unexpected(String),
}

impl SpeechError {
    /// User-facing sentinel string returned by [`SpeechCapture::listen`]
    pub fn sentinel(&self) -> String {
        match self {
            SpeechError::PermissionDenied => {
                "Error: Please grant microphone permissions to use voice input.".to_string()
            }
            SpeechError::Unavailable(program) => format!(
                "Error: Speech recognizer '{}' is not available. Check the [speech] section of your config.",
                program
            ),
            SpeechError::Unintelligible => {
                "Could not understand audio. Please speak clearly and try again.".to_string()
            }
            SpeechError::Service(message) => format!(
                "Could not request results from speech service: {}",
                message
            ),
            SpeechError::Timeout(_) => {
                "Could not hear anything before listening timed out. Please try again.".to_string()
            }
            SpeechError::Unexpected(message) => format!("Error: {}", message),
        }
    }
}

/// What a [`SpeechCapture::listen`] result means for the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Recognized(String),
    /// Permission or unexpected failure
    Failed(String),
    /// Service failure, unintelligible audio or timeout
    Warning(String),
}

pub fn classify_transcript(text: &str) -> Transcript {
    let text = text.trim();
    if text.starts_with(ERROR_PREFIX) {
        Transcript::Failed(text.to_string())
    } else if text.starts_with(WARNING_PREFIX) {
        Transcript::Warning(text.to_string())
    } else {
        Transcript::Recognized(text.to_string())
    }
}

/// Microphone-to-text conversion
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Non-destructive probe of whether capture can work at all
    async fn check_access(&self) -> bool;

    /// One recognition attempt in a concrete language (`ar-SA` or `en-US`)
    async fn recognize(&self, language: &str) -> Result<String, SpeechError>;

    /// Capture one utterance in `mode`.
    ///
    /// Returns the transcript, or a sentinel starting with `Error:` or
    /// `Could not`. Mixed mode tries Arabic first and falls back to English
    /// when no Arabic transcript was produced.
    async fn listen(&self, mode: LanguageMode) -> String {
        let result = match mode {
            LanguageMode::English => self.recognize(ENGLISH).await,
            LanguageMode::Arabic => self.recognize(ARABIC).await,
            LanguageMode::Mixed => match self.recognize(ARABIC).await {
                Err(SpeechError::Unintelligible) => {
                    tracing::debug!("No Arabic transcript, retrying in English");
                    self.recognize(ENGLISH).await
                }
                other => other,
            },
        };

        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => SpeechError::Unintelligible.sentinel(),
            Err(e) => {
                tracing::warn!(error = %e, mode = %mode.code(), "Speech capture failed");
                e.sentinel()
            }
        }
    }
}

/// Speech capture backed by an external recognizer program.
///
/// The program records one utterance and prints the transcript on stdout.
/// `{language}` in its arguments is replaced with the recognizer language code.
#[derive(Debug, Clone)]
pub struct CommandSpeechCapture {
    program: String,
    args: Vec<String>,
    probe_args: Vec<String>,
    timeout: Duration,
}

impl CommandSpeechCapture {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            probe_args: vec!["--version".to_string()],
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_probe_args(mut self, probe_args: Vec<String>) -> Self {
        self.probe_args = probe_args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn expand_args(&self, language: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(LANGUAGE_PLACEHOLDER, language))
            .collect()
    }

    async fn run(&self, args: &[String]) -> Result<std::process::Output, SpeechError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => Err(SpeechError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(match e.kind() {
                std::io::ErrorKind::NotFound => SpeechError::Unavailable(self.program.clone()),
                std::io::ErrorKind::PermissionDenied => SpeechError::PermissionDenied,
                _ => SpeechError::Unexpected(format!(
                    "Failed to run speech recognizer '{}': {}",
                    self.program, e
                )),
            }),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

#[async_trait]
impl SpeechCapture for CommandSpeechCapture {
    async fn check_access(&self) -> bool {
        match self.run(&self.probe_args).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "Speech recognizer probe failed");
                false
            }
        }
    }

    async fn recognize(&self, language: &str) -> Result<String, SpeechError> {
        let args = self.expand_args(language);
        tracing::debug!(program = %self.program, ?args, "Listening");

        let output = self.run(&args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(SpeechError::Service(if stderr.is_empty() {
                format!("recognizer exited with {}", output.status)
            } else {
                stderr
            }));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::Unintelligible);
        }

        Ok(transcript)
    }
}
