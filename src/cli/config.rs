use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use focus_shield_dom::Selector;
use suppression_center::SuppressionConfig;

use super::context::CliContext;
use super::output::print_structured;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file in use
    Path,

    /// Validate a configuration file, including every selector
    Validate {
        /// Configuration file to check
        file: PathBuf,
    },
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            if !print_structured(ctx.output(), ctx.config())? {
                match ctx.config_path() {
                    Some(path) => println!("Effective configuration ({}):", path.display()),
                    None => println!("Effective configuration (defaults):"),
                }
                print!("{}", serde_yaml::to_string(ctx.config())?);
            }
        }
        ConfigAction::Path => match ctx.config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(none)"),
        },
        ConfigAction::Validate { file } => {
            let config = SuppressionConfig::from_path(&file)
                .with_context(|| format!("parsing {}", file.display()))?;
            let invalid = invalid_selectors(&config);
            if !invalid.is_empty() {
                bail!(
                    "{} has invalid selectors:\n  {}",
                    file.display(),
                    invalid.join("\n  ")
                );
            }
            println!("Configuration file {} is valid", file.display());
        }
    }
    Ok(())
}

fn invalid_selectors(config: &SuppressionConfig) -> Vec<String> {
    config
        .fallback_selectors
        .iter()
        .chain(&config.ad_marker_selectors)
        .chain(&config.main_content_selectors)
        .filter_map(|source| Selector::parse(source).err().map(|err| err.to_string()))
        .collect()
}
