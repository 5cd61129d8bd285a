use std::path::{Path, PathBuf};

use perceiver_distraction::PageScanner;
use suppression_center::SuppressionConfig;

use super::output::OutputFormat;

pub struct CliContext {
    config: SuppressionConfig,
    config_path: Option<PathBuf>,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(
        config: SuppressionConfig,
        config_path: Option<PathBuf>,
        output: OutputFormat,
    ) -> Self {
        Self {
            config,
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &SuppressionConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    pub fn scanner(&self) -> PageScanner {
        PageScanner::new(self.config.perceiver.clone())
    }
}
