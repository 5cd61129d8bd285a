use focus_shield_dom::Viewport;
use serde::{Deserialize, Serialize};

/// Weights of the distraction score. Hand-tuned; treat as configuration, not derived values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub class_weight: f32,
    pub id_weight: f32,
    /// Extra multiplier on the id signal; ids are trusted less than classes.
    pub id_trust: f32,
    pub data_attribute_weight: f32,
    pub geometry_weight: f32,
    pub geometry_factor: f32,
    /// A token/pattern pair only counts when its similarity exceeds this.
    pub token_threshold: f32,
    /// Share of the viewport above which an element counts as oversized.
    pub large_area_ratio: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            class_weight: 0.4,
            id_weight: 0.3,
            id_trust: 0.8,
            data_attribute_weight: 0.2,
            geometry_weight: 0.1,
            geometry_factor: 0.5,
            token_threshold: 0.75,
            large_area_ratio: 0.25,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceiverPolicyView {
    pub weights: ScoringWeights,
    /// Used when the document carries no viewport of its own.
    pub viewport: Viewport,
}
