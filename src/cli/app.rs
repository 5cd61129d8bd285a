use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug, cli.json_logs)?;
    debug!("Starting Focus Shield v{}", env!("CARGO_PKG_VERSION"));

    let loaded = load_config(cli.config.as_deref())?;
    let cli_context = CliContext::new(loaded.config, loaded.path, cli.output.clone());

    match dispatch(&cli, &cli_context).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
