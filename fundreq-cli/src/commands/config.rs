//! Configuration command implementations

use super::GlobalOptions;
use crate::cli::ConfigCommands;
use crate::config::get_config_path;
use crate::error::CliError;
use fundreq_agents::config::{expand_tilde, FundreqConfig, API_KEY_ENV_VARS};

const REDACTED: &str = "********";

pub fn handle_config_command(
    options: &GlobalOptions,
    action: &ConfigCommands,
) -> Result<(), CliError> {
    match action {
        ConfigCommands::Path => {
            let path = options
                .config
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(get_config_path);
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => show_config(options),
    }
}

fn show_config(options: &GlobalOptions) -> Result<(), CliError> {
    let ctx = options.load()?;
    let env_key = API_KEY_ENV_VARS
        .iter()
        .find(|name| std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false));

    let mut effective = redacted(&ctx.config);
    effective.database.path = Some(ctx.database_path.clone());
    let rendered = toml::to_string_pretty(&effective)
        .map_err(|e| CliError::Config(format!("Failed to render configuration: {e}")))?;

    println!("# Config file: {}", ctx.config_path.display());
    match env_key {
        Some(name) => println!("# API key: from {name}"),
        None if ctx.config.api_keys.gemini_api_key.is_some() => {
            println!("# API key: from config file")
        }
        None => println!("# API key: not set"),
    }
    println!();
    print!("{}", rendered);
    Ok(())
}

/// Copy of `config` that is safe to print
pub fn redacted(config: &FundreqConfig) -> FundreqConfig {
    let mut config = config.clone();
    if let Some(key) = config.api_keys.gemini_api_key.as_mut() {
        if !key.is_empty() {
            *key = REDACTED.to_string();
        }
    }
    config
}
