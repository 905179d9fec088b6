use crate::error::CliError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with environment-based log level filtering.
///
/// Logs go to stderr so the interactive session on stdout stays readable.
pub fn init_logging(verbose: bool) -> Result<(), CliError> {
    let default_level = if verbose { "debug" } else { "info" };

    // RUST_LOG wins over the default level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Config(format!("Failed to create log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_only_once() {
        // A global subscriber can be installed a single time per process
        let first = init_logging(false);
        let second = init_logging(true);
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
