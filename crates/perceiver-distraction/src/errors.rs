use focus_shield_dom::{DomError, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerceiverError {
    #[error("node {0} is not connected to the document")]
    Detached(NodeId),
    #[error(transparent)]
    Dom(#[from] DomError),
}
