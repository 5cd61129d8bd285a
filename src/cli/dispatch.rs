use super::apply::cmd_apply;
use super::classify::cmd_classify;
use super::config::cmd_config;
use super::env::CliArgs;
use super::info::cmd_info;
use super::scan::cmd_scan;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Scan(args) => cmd_scan(args, ctx).await,
        Commands::Classify(args) => cmd_classify(args, ctx).await,
        Commands::Apply(args) => cmd_apply(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
        Commands::Info => cmd_info(ctx).await,
    }
}
