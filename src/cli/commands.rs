use clap::Subcommand;

use super::apply::ApplyArgs;
use super::classify::ClassifyArgs;
use super::config::ConfigArgs;
use super::scan::ScanArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Rank the distracting elements of an HTML page
    Scan(ScanArgs),

    /// Categorize every candidate above a threshold
    Classify(ClassifyArgs),

    /// Send a mode command to a page and write the suppressed result
    Apply(ApplyArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),

    /// Show version and build information
    Info,
}
