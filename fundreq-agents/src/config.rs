use crate::extraction::ExtractorConfig;
use crate::retry::RetryPolicy;
use crate::speech::CommandSpeechCapture;
use fundreq_llm_sdk::models::gemini::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables checked for the Gemini key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FundreqConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Defaults to `fundreq/requests.db` under the local data directory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Override for the Gemini endpoint, mainly for proxies and tests
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiKeysConfig {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Recognizer program; voice input is disabled when unset
    pub program: Option<String>,
    #[serde(default = "default_speech_args")]
    pub args: Vec<String>,
    #[serde(default = "default_probe_args")]
    pub probe_args: Vec<String>,
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: default_speech_args(),
            probe_args: default_probe_args(),
            timeout_secs: default_speech_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_speech_args() -> Vec<String> {
    vec!["--language".to_string(), "{language}".to_string()]
}

fn default_probe_args() -> Vec<String> {
    vec!["--version".to_string()]
}

fn default_speech_timeout() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl FundreqConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.storage.max_attempts,
            Duration::from_millis(self.storage.retry_delay_ms),
        )
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            model: Some(self.llm.model.clone()).filter(|m| !m.is_empty()),
            temperature: self.llm.temperature,
            max_output_tokens: self.llm.max_output_tokens,
        }
    }

    /// Command-backed speech capture, when a recognizer program is configured
    pub fn speech_capture(&self) -> Option<CommandSpeechCapture> {
        let program = self.speech.program.as_deref().filter(|p| !p.is_empty())?;
        Some(
            CommandSpeechCapture::new(program, self.speech.args.clone())
                .with_probe_args(self.speech.probe_args.clone())
                .with_timeout(Duration::from_secs(self.speech.timeout_secs)),
        )
    }

    /// Gemini API key from the environment, falling back to `[api_keys]`
    pub fn gemini_api_key(&self) -> anyhow::Result<String> {
        self.gemini_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn gemini_api_key_with<F>(&self, lookup: F) -> anyhow::Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
            .or_else(|| {
                self.api_keys
                    .gemini_api_key
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            })
            .map(|key| key.trim().to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Gemini API key not found. Set GEMINI_API_KEY or GOOGLE_API_KEY, or add 'gemini_api_key' under [api_keys] in the config file"
                )
            })
    }
}

/// Replace a leading `~` with the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}
