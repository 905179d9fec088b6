use fundreq_agents::StoreError;
use std::fmt;

/// Main error type for the fundreq CLI
#[derive(Debug)]
pub enum CliError {
    /// Configuration-related errors
    Config(String),
    /// File I/O errors
    Io(std::io::Error),
    /// The request database could not be opened or initialized
    StoreInit(String),
    /// Reading or writing requests failed
    Storage(StoreError),
    /// Language model setup or request errors
    Llm(String),
    /// Command execution errors
    Command(String),
    /// Generic errors from anyhow
    Other(anyhow::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::StoreInit(msg) => write!(f, "Database initialization failed: {msg}"),
            CliError::Storage(err) => write!(f, "Storage error: {err}"),
            CliError::Llm(msg) => write!(f, "Language model error: {msg}"),
            CliError::Command(msg) => write!(f, "Command error: {msg}"),
            CliError::Other(err) => write!(f, "Error: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            CliError::Storage(err) => Some(err),
            CliError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl CliError {
    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Io(_) => 3,
            CliError::StoreInit(_) => 4,
            CliError::Storage(_) => 5,
            CliError::Llm(_) => 6,
            CliError::Command(_) => 7,
            CliError::Other(_) => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other(err.into())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        CliError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_init_has_dedicated_exit_code() {
        let err = CliError::StoreInit("disk full".to_string());
        assert_eq!(err.exit_code(), 4);
        assert_eq!(
            err.to_string(),
            "Database initialization failed: disk full"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            CliError::Config(String::new()).exit_code(),
            CliError::Io(std::io::Error::other("x")).exit_code(),
            CliError::StoreInit(String::new()).exit_code(),
            CliError::Storage(StoreError::LockPoisoned).exit_code(),
            CliError::Llm(String::new()).exit_code(),
            CliError::Command(String::new()).exit_code(),
            CliError::Other(anyhow::anyhow!("x")).exit_code(),
        ];
        let mut unique = codes.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
