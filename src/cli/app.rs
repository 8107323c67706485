use anyhow::Result;
use clap::Parser;
use docgate::{load_config, LoadedConfig};
use tracing::{debug, error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::init_logging;

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;

    info!("Starting docgate v{}", env!("CARGO_PKG_VERSION"));

    let LoadedConfig { config, path } = load_config(cli.config.as_ref()).await?;
    let cli_context = CliContext::new(config, path, &cli.seeds)?;
    debug!(config = %cli_context.config_path().display(), "context ready");

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {}", err);
            Err(err)
        }
    }
}
