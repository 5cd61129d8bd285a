//! Focus Shield command-line host
//!
//! Exposes modules for integration testing

pub mod cli;
pub mod config;
pub mod page;

pub use crate::config::{load_layered, resolve_config_path, LoadedConfig};
