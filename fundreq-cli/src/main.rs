use clap::Parser;
use tracing::debug;

mod cli;
mod commands;
mod config;
mod error;
mod logging;

use cli::Cli;
use error::CliError;
use logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    debug!("CLI arguments: {:?}", cli);

    match cli.run().await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("{:?}", e);
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
