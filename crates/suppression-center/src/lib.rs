//! Focus Shield suppression center.
//!
//! Owns the `none`/`simple`/`focus` state machine: marks distracting elements found by the
//! distraction perceiver, injects a summary, highlights the main content, and keeps marking ad
//! placeholders that the page inserts later through a debounced mutation watch.

pub mod command;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod errors;
pub mod events;
pub mod state;
pub mod summary;
pub mod watcher;

pub use command::{CommandHandler, CommandRequest, CommandResponse, CommandStatus, ShieldCommand};
pub use config::{SummaryConfig, SuppressionConfig};
pub use controller::{incremental_rescan, SuppressionController, TransitionReport};
pub use errors::SuppressionError;
pub use events::{ShieldEvent, ShieldEventBus};
pub use state::{ShieldMode, SuppressionState};
pub use summary::{ExtractiveSummarizer, SummaryGenerator};
