use std::fmt;

use focus_shield_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::watcher::MutationWatch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShieldMode {
    #[default]
    None,
    Simple,
    Focus,
}

impl ShieldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShieldMode::None => "none",
            ShieldMode::Simple => "simple",
            ShieldMode::Focus => "focus",
        }
    }

    /// Simple and focus keep a mutation watch alive; none does not.
    pub fn is_active(&self) -> bool {
        !matches!(self, ShieldMode::None)
    }
}

impl fmt::Display for ShieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a mode leaves behind in the page, tracked so it can be undone exactly.
#[derive(Default)]
pub struct SuppressionState {
    pub(crate) mode: ShieldMode,
    pub(crate) watch: Option<MutationWatch>,
    pub(crate) summary: Option<NodeId>,
    pub(crate) highlighted: Option<NodeId>,
}

impl SuppressionState {
    pub fn mode(&self) -> ShieldMode {
        self.mode
    }

    pub fn watch_active(&self) -> bool {
        self.watch.as_ref().is_some_and(MutationWatch::is_active)
    }

    pub fn summary(&self) -> Option<NodeId> {
        self.summary
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }
}
