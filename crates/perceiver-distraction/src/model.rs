use focus_shield_dom::{Document, DomError, NodeId};
use serde::Serialize;

use crate::errors::PerceiverError;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub label: String,
    pub weight: f32,
    /// Raw signal before weighting, in `[0, 1]`.
    pub signal: f32,
    pub contribution: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total: f32,
    pub components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn component(&self, label: &str) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.label == label)
    }
}

/// One scan hit. `node` is a handle into the live tree, valid only while the node stays attached.
#[derive(Clone, Debug, Serialize)]
pub struct ScoredElement {
    pub node: NodeId,
    pub score: f32,
    pub class_name: String,
    pub id: String,
    pub tag: String,
    pub breakdown: ScoreBreakdown,
}

impl ScoredElement {
    /// className immediately followed by id.
    pub fn class_and_id(&self) -> String {
        format!("{}{}", self.class_name, self.id)
    }
}

/// Everything the scorer needs from an element, captured once so scoring stays a pure function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSignals {
    pub class_name: String,
    pub id: String,
    pub attribute_names: Vec<String>,
    /// Element area over viewport area; `None` when layout is unknown.
    pub area_ratio: Option<f64>,
}

impl ElementSignals {
    pub fn capture(
        doc: &Document,
        node: NodeId,
        fallback_viewport_area: f64,
    ) -> Result<Self, PerceiverError> {
        if !doc.is_element(node) {
            let err = if doc.exists(node) {
                DomError::NotAnElement(node)
            } else {
                DomError::StaleNode(node)
            };
            return Err(err.into());
        }
        if !doc.is_connected(node) {
            return Err(PerceiverError::Detached(node));
        }

        let viewport_area = doc
            .viewport()
            .map(|viewport| viewport.area())
            .unwrap_or(fallback_viewport_area);
        let area_ratio = match doc.geometry(node) {
            Ok(rect) if viewport_area > 0.0 => Some(rect.area() / viewport_area),
            _ => None,
        };

        Ok(Self {
            class_name: doc.class_name(node).to_string(),
            id: doc.element_id(node).to_string(),
            attribute_names: doc
                .attributes(node)
                .iter()
                .map(|(name, _)| name.clone())
                .collect(),
            area_ratio,
        })
    }
}
