//! Focus Shield document model.
//!
//! The host (a content-script runtime, a CDP bridge, or the CLI reading HTML files) owns the
//! element tree. Everything above this crate addresses elements through [`ids::NodeId`] handles
//! and never extends an element's lifetime: a handle to a removed node simply stops resolving.

use tokio::sync::broadcast;

pub mod css;
pub mod document;
pub mod html;

pub use css::Selector;
pub use document::{Document, SharedDocument};
pub use error::{DomError, DomResult};
pub use events::MutationRecord;
pub use ids::NodeId;

pub mod ids {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Non-owning handle to a node of a [`crate::Document`].
    ///
    /// Arena slots are reused once a node is removed; the generation tells a stale handle apart
    /// from the node that took over its slot.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct NodeId {
        index: u32,
        generation: u32,
    }

    impl NodeId {
        pub const fn new(index: u32, generation: u32) -> Self {
            Self { index, generation }
        }

        pub fn index(&self) -> usize {
            self.index as usize
        }

        pub fn generation(&self) -> u32 {
            self.generation
        }
    }

    impl fmt::Display for NodeId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "node#{}", self.index)?;
            if self.generation > 0 {
                write!(f, "v{}", self.generation)?;
            }
            Ok(())
        }
    }
}

pub mod error {
    use thiserror::Error;

    use crate::ids::NodeId;

    #[derive(Clone, Debug, Error, PartialEq, Eq)]
    pub enum DomError {
        #[error("node {0} is detached or was removed")]
        StaleNode(NodeId),
        #[error("node {0} is not an element")]
        NotAnElement(NodeId),
        #[error("geometry unavailable for {0}")]
        GeometryUnavailable(NodeId),
        #[error("cannot attach {child} under {parent}: would create a cycle")]
        HierarchyRequest { parent: NodeId, child: NodeId },
        #[error("the document root cannot be removed")]
        RootRemoval,
        #[error("invalid selector `{selector}`: {reason}")]
        InvalidSelector { selector: String, reason: String },
    }

    pub type DomResult<T> = Result<T, DomError>;
}

pub mod events {
    use serde::{Deserialize, Serialize};

    use crate::ids::NodeId;

    /// Child-list change published by a [`crate::Document`].
    ///
    /// Attribute and class edits are intentionally not published, so marker writes never feed
    /// back into a watcher.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum MutationRecord {
        ChildAdded { parent: NodeId, child: NodeId },
        ChildRemoved { parent: NodeId, child: NodeId },
    }
}

/// Geometry of an element relative to the viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Mutation stream sender shared by a document.
pub type MutationBus = broadcast::Sender<MutationRecord>;

/// Build a mutation bus with the given capacity.
pub fn mutation_bus(capacity: usize) -> (MutationBus, broadcast::Receiver<MutationRecord>) {
    broadcast::channel(capacity)
}
