use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::state::ShieldMode;

pub type ShieldEventBus = broadcast::Sender<ShieldEvent>;

/// Events emitted by the controller to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShieldEvent {
    ModeChanged {
        from: ShieldMode,
        to: ShieldMode,
        marked: usize,
    },
    Rescanned {
        mode: ShieldMode,
        newly_marked: usize,
    },
}

pub fn event_bus(capacity: usize) -> ShieldEventBus {
    broadcast::channel(capacity).0
}
