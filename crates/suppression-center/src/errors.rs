use focus_shield_dom::DomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuppressionError {
    #[error("document error: {0}")]
    Dom(#[from] DomError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialize suppression config: {0}")]
    Deserialize(String),
    #[error("document has no element to carry the mode marker")]
    MissingBody,
}
