use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{load_layered, LoadedConfig};

pub fn init_logging(level: &str, debug: bool, json: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    Ok(())
}

pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let loaded = load_layered(explicit)?;
    match &loaded.path {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => debug!("No configuration file found, using defaults and environment"),
    }
    Ok(loaded)
}
