//! Suppression settings: thresholds, marker names, selector lists and the summary policy.
//!
//! Every field has a default, so a YAML file only needs the keys it overrides.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use perceiver_distraction::PerceiverPolicyView;
use serde::{Deserialize, Serialize};

use crate::errors::SuppressionError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub simple_threshold: f32,
    pub focus_threshold: f32,
    pub rescan_threshold: f32,
    /// Quiet period a mutation burst must settle for before the incremental rescan runs.
    pub debounce_ms: u64,
    pub hidden_class: String,
    pub highlight_class: String,
    pub summary_id: String,
    /// Attribute on `<body>` naming the active mode.
    pub mode_attribute: String,
    pub ad_keywords: Vec<String>,
    /// Marked unconditionally in simple mode, on top of the scored hits.
    pub fallback_selectors: Vec<String>,
    /// Ad placeholders the incremental rescan marks without scoring.
    pub ad_marker_selectors: Vec<String>,
    /// Tried in order; the first match is the page's main content.
    pub main_content_selectors: Vec<String>,
    /// Focus mode also hides top-level body children outside the main content.
    pub isolate_main_content: bool,
    pub summary: SummaryConfig,
    pub perceiver: PerceiverPolicyView,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,
    /// Pages with less readable text than this get no summary.
    pub min_chars: usize,
    pub max_sentences: usize,
    pub min_sentence_chars: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: 200,
            max_sentences: 3,
            min_sentence_chars: 30,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            simple_threshold: 0.45,
            focus_threshold: 0.6,
            rescan_threshold: 0.55,
            debounce_ms: 500,
            hidden_class: "focus-shield-hidden".into(),
            highlight_class: "focus-shield-highlight".into(),
            summary_id: "focus-shield-summary".into(),
            mode_attribute: "data-focus-shield".into(),
            ad_keywords: strings(&[
                "ad-",
                "ad_",
                "-ad",
                "_ad",
                "ads",
                "advert",
                "sponsor",
                "promo",
                "banner",
                "doubleclick",
            ]),
            fallback_selectors: strings(&[
                r#"[class*="ad-"]"#,
                r#"[class*="ad_"]"#,
                r#"[class*="_ad"]"#,
                r#"[class*="ads"]"#,
                r#"[id*="ad-"]"#,
                r#"[id*="ad_"]"#,
                r#"[id*="_ad"]"#,
                r#"[class*="advert"]"#,
                r#"[class*="sponsor"]"#,
                r#"iframe[src*="ads"]"#,
                r#"iframe[src*="doubleclick"]"#,
                r#"iframe[src*="googlesyndication"]"#,
                r#"[class*="modal"]"#,
                r#"[class*="popup"]"#,
                r#"[class*="overlay"]"#,
                r#"[class*="notification"]"#,
                r#"[class*="toast"]"#,
                r#"[class*="newsletter"]"#,
                r#"[class*="social-share"]"#,
                r#"[class*="share-button"]"#,
                r#"[class*="cookie"]"#,
                r#"[id*="cookie"]"#,
                r#"[class*="gdpr"]"#,
                r#"[class*="consent"]"#,
                "aside",
                r#"[class*="sidebar"]"#,
                r#"[class*="right-rail"]"#,
                r#"[role="complementary"]"#,
                r#"[class*="sticky-header"]"#,
                r#"[class*="fixed-header"]"#,
            ]),
            ad_marker_selectors: strings(&[
                "[data-ad-slot]",
                "[data-ad-client]",
                "[data-ad-unit]",
                "[data-ad]",
                "[data-google-query-id]",
                "ins.adsbygoogle",
                r#"iframe[src*="doubleclick"]"#,
                r#"iframe[src*="googlesyndication"]"#,
                r#"iframe[src*="adservice"]"#,
                r#"iframe[src*="/ads"]"#,
                r#"iframe[src*="tracking"]"#,
            ]),
            main_content_selectors: strings(&[
                r#"[role="main"]"#,
                r#"[role="article"]"#,
                "main",
                "article",
                ".post-content",
                ".article-content",
                ".entry-content",
                "#content",
                ".content",
            ]),
            isolate_main_content: false,
            summary: SummaryConfig::default(),
            perceiver: PerceiverPolicyView::default(),
        }
    }
}

impl SuppressionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, SuppressionError> {
        serde_yaml::from_str(source).map_err(|err| SuppressionError::Deserialize(err.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SuppressionError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_yaml_str(&contents)
    }
}
