use config::{Config, ConfigError, Environment, File};
use fundreq_agents::config::{expand_tilde, FundreqConfig};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# fundreq configuration

[database]
# path = "~/.local/share/fundreq/requests.db"

[llm]
model = "gemini-2.5-flash"
temperature = 0.2
max_output_tokens = 2048
# base_url = "https://generativelanguage.googleapis.com"

[api_keys]
# Prefer the GEMINI_API_KEY or GOOGLE_API_KEY environment variables
# gemini_api_key = "your-gemini-key"

[speech]
# External recognizer: records one utterance and prints the transcript.
# "{language}" is replaced with ar-SA or en-US.
# program = "fundreq-recognize"
args = ["--language", "{language}"]
probe_args = ["--version"]
timeout_secs = 15

[storage]
max_attempts = 3
retry_delay_ms = 1000
"#;

/// Load the config file, creating it with defaults on first run.
///
/// `FUNDREQ__SECTION__KEY` environment variables override file values.
pub fn load_app_config(explicit: Option<&Path>) -> Result<(FundreqConfig, PathBuf), ConfigError> {
    let config_path = explicit
        .map(expand_tilde)
        .unwrap_or_else(get_config_path);

    if explicit.is_none() && !config_path.exists() {
        write_default_config(&config_path)?;
    }

    let config = build_config(&config_path)?;
    Ok((config, config_path))
}

fn build_config(config_path: &Path) -> Result<FundreqConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(File::from(config_path.to_path_buf()).required(config_path.exists()))
        .add_source(
            Environment::with_prefix("FUNDREQ")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: FundreqConfig = builder.try_deserialize()?;

    if let Some(path) = config.database.path.take() {
        config.database.path = Some(expand_tilde(&path));
    }

    Ok(config)
}

fn write_default_config(config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| ConfigError::Message(format!("Failed to write default config: {e}")))?;

    tracing::info!(path = %config_path.display(), "Wrote default configuration");
    Ok(())
}

/// `--database` wins over the config file, which wins over the default location
pub fn resolve_database_path(config: &FundreqConfig, override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(expand_tilde)
        .or_else(|| config.database.path.clone())
        .unwrap_or_else(get_default_db_path)
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("fundreq/config.toml")
    } else {
        PathBuf::from("fundreq.toml")
    }
}

pub fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("fundreq/requests.db")
    } else {
        PathBuf::from("requests.db")
    }
}
