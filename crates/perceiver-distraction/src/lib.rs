//! Heuristic distraction perceiver: keyword dictionary, fuzzy similarity, per-element scoring
//! and whole-page scans over a [`focus_shield_dom::Document`].

pub mod errors;
pub mod events;
pub mod metrics;
pub mod model;
pub mod patterns;
pub mod policy;
pub mod scanner;
pub mod scorer;
pub mod similarity;

pub use errors::PerceiverError;
pub use model::{ElementSignals, ScoreBreakdown, ScoreComponent, ScoredElement};
pub use patterns::{Category, PatternDictionary};
pub use policy::{PerceiverPolicyView, ScoringWeights};
pub use scanner::PageScanner;
pub use scorer::ElementScorer;
pub use similarity::{matches, normalize, similarity};
