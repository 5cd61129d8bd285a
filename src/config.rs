//! Layered configuration: built-in defaults, then a YAML file, then `FOCUS_SHIELD__*` variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use suppression_center::SuppressionConfig;

pub const ENV_PREFIX: &str = "FOCUS_SHIELD";
const LOCAL_CONFIG: &str = "config/focus-shield.yaml";

pub struct LoadedConfig {
    pub config: SuppressionConfig,
    /// File layer that was applied, if any.
    pub path: Option<PathBuf>,
}

/// Explicit path first, then `./config/focus-shield.yaml`, then the user config directory.
/// Only the explicit path is required to exist.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("focus-shield").join("config.yaml"))
        .filter(|path| path.exists())
}

pub fn load_layered(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let defaults = Config::try_from(&SuppressionConfig::default())
        .context("Failed to encode default configuration")?;
    let mut builder = Config::builder().add_source(defaults);

    let path = resolve_config_path(explicit);
    if let Some(path) = &path {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Yaml)
                .required(true),
        );
    }
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize::<SuppressionConfig>()
        .context("Failed to parse configuration")?;
    Ok(LoadedConfig { config, path })
}
