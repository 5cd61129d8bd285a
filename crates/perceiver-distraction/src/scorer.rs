//! Per-element distraction score.
//!
//! Pipeline: tokenize → normalize/stem → match against every pattern → weight → sum → clamp.
//! [`score_signals`] is pure; [`ElementScorer::score`] only adds the signal capture.

use focus_shield_dom::{Document, NodeId};

use crate::errors::PerceiverError;
use crate::model::{ElementSignals, ScoreBreakdown, ScoreComponent};
use crate::patterns::PatternDictionary;
use crate::policy::{PerceiverPolicyView, ScoringWeights};
use crate::similarity::similarity;

pub const CLASS_LABEL: &str = "class";
pub const ID_LABEL: &str = "id";
pub const DATA_ATTRIBUTE_LABEL: &str = "data_attribute";
pub const GEOMETRY_LABEL: &str = "geometry";

/// Split on whitespace, `-` and `_`, dropping empty pieces.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
}

/// Summed pattern-match strength of every token of `text`, capped at 1.0.
///
/// A token is compared as written and as its stem; the stronger of the two counts when it
/// exceeds `token_threshold`.
pub fn token_signal(text: &str, dictionary: &PatternDictionary, token_threshold: f32) -> f32 {
    let mut sum = 0.0f32;
    for token in tokenize(text) {
        let stem = dictionary.stem_of(token);
        for pattern in dictionary.patterns() {
            let strength = similarity(token, pattern).max(similarity(&stem, pattern));
            if strength > token_threshold {
                sum += strength;
            }
        }
    }
    sum.min(1.0)
}

fn has_ad_data_attribute(names: &[String]) -> bool {
    names.iter().any(|name| {
        let name = name.to_ascii_lowercase();
        name.starts_with("data-") && (name.contains("ad") || name.contains("tracking"))
    })
}

fn geometry_signal(area_ratio: Option<f64>, weights: &ScoringWeights) -> f32 {
    match area_ratio {
        Some(ratio) if ratio == 0.0 || ratio > weights.large_area_ratio => 1.0,
        _ => 0.0,
    }
}

pub fn score_signals(
    signals: &ElementSignals,
    weights: &ScoringWeights,
    dictionary: &PatternDictionary,
) -> ScoreBreakdown {
    let class_signal = token_signal(&signals.class_name, dictionary, weights.token_threshold);
    let id_signal = token_signal(&signals.id, dictionary, weights.token_threshold);
    let data_signal = if has_ad_data_attribute(&signals.attribute_names) {
        1.0
    } else {
        0.0
    };
    let geometry = geometry_signal(signals.area_ratio, weights);

    let components = vec![
        component(CLASS_LABEL, weights.class_weight, class_signal),
        component(ID_LABEL, weights.id_weight * weights.id_trust, id_signal),
        component(
            DATA_ATTRIBUTE_LABEL,
            weights.data_attribute_weight,
            data_signal,
        ),
        component(
            GEOMETRY_LABEL,
            weights.geometry_weight * weights.geometry_factor,
            geometry,
        ),
    ];
    let total = components
        .iter()
        .map(|component| component.contribution)
        .sum::<f32>()
        .min(1.0);
    ScoreBreakdown { total, components }
}

fn component(label: &str, weight: f32, signal: f32) -> ScoreComponent {
    ScoreComponent {
        label: label.to_string(),
        weight,
        signal,
        contribution: weight * signal,
    }
}

#[derive(Clone)]
pub struct ElementScorer {
    policy: PerceiverPolicyView,
    dictionary: &'static PatternDictionary,
}

impl ElementScorer {
    pub fn new(policy: PerceiverPolicyView) -> Self {
        Self {
            policy,
            dictionary: PatternDictionary::global(),
        }
    }

    pub fn policy(&self) -> &PerceiverPolicyView {
        &self.policy
    }

    pub fn dictionary(&self) -> &'static PatternDictionary {
        self.dictionary
    }

    pub fn capture(&self, doc: &Document, node: NodeId) -> Result<ElementSignals, PerceiverError> {
        ElementSignals::capture(doc, node, self.policy.viewport.area())
    }

    pub fn score(&self, doc: &Document, node: NodeId) -> Result<ScoreBreakdown, PerceiverError> {
        let signals = self.capture(doc, node)?;
        Ok(self.score_signals(&signals))
    }

    pub fn score_signals(&self, signals: &ElementSignals) -> ScoreBreakdown {
        score_signals(signals, &self.policy.weights, self.dictionary)
    }
}

impl Default for ElementScorer {
    fn default() -> Self {
        Self::new(PerceiverPolicyView::default())
    }
}
