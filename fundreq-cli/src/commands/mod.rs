//! Command implementations for the fundreq CLI

pub mod config;
pub mod extract;
pub mod list;
pub mod session;

pub use self::config::*;
pub use extract::*;
pub use list::*;
pub use session::*;

use crate::config::{load_app_config, resolve_database_path};
use crate::error::CliError;
use fundreq_agents::config::FundreqConfig;
use fundreq_agents::factory::SessionFactory;
use fundreq_agents::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

/// Resolved configuration for one invocation
pub struct AppContext {
    pub config: FundreqConfig,
    pub config_path: PathBuf,
    pub database_path: PathBuf,
}

impl GlobalOptions {
    pub fn load(&self) -> Result<AppContext, CliError> {
        let (config, config_path) = load_app_config(self.config.as_deref())?;
        let database_path = resolve_database_path(&config, self.database.as_deref());
        tracing::debug!(
            config = %config_path.display(),
            database = %database_path.display(),
            "Configuration loaded"
        );
        Ok(AppContext {
            config,
            config_path,
            database_path,
        })
    }
}

impl AppContext {
    /// Open the request database; opening also creates or repairs the schema.
    ///
    /// Any failure here is fatal for the command.
    pub fn open_store(&self) -> Result<Arc<RecordStore>, CliError> {
        let store = RecordStore::open(&self.database_path, self.config.retry_policy())
            .map_err(|e| {
                CliError::StoreInit(format!("{}: {e}", self.database_path.display()))
            })?;
        tracing::info!(path = %store.location(), "Request database ready");
        Ok(Arc::new(store))
    }

    pub fn session_factory(&self) -> Result<SessionFactory, CliError> {
        SessionFactory::from_config(self.config.clone()).map_err(|e| CliError::Llm(e.to_string()))
    }
}
