use std::time::Instant;

use focus_shield_dom::{Document, NodeId};
use tracing::trace;

use crate::events;
use crate::model::ScoredElement;
use crate::patterns::{Category, PatternDictionary};
use crate::policy::PerceiverPolicyView;
use crate::scorer::ElementScorer;
use crate::similarity::matches;

/// className immediately followed by id, the text classification runs on.
pub fn class_and_id(doc: &Document, node: NodeId) -> String {
    format!("{}{}", doc.class_name(node), doc.element_id(node))
}

/// First category, in declared order, with any keyword matching `text`.
pub fn classify_text(text: &str, dictionary: &PatternDictionary) -> Option<Category> {
    dictionary
        .categories()
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| matches(text, keyword)))
        .map(|(category, _)| *category)
}

/// Case-insensitive plain substring test against any non-empty keyword.
pub fn contains_keyword<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let haystack = text.to_lowercase();
    keywords.iter().any(|keyword| {
        let needle = keyword.as_ref().to_lowercase();
        !needle.is_empty() && haystack.contains(&needle)
    })
}

#[derive(Clone, Default)]
pub struct PageScanner {
    scorer: ElementScorer,
}

impl PageScanner {
    pub fn new(policy: PerceiverPolicyView) -> Self {
        Self {
            scorer: ElementScorer::new(policy),
        }
    }

    pub fn scorer(&self) -> &ElementScorer {
        &self.scorer
    }

    /// Every element scoring at least `threshold`, highest first. Ties keep document order.
    pub fn scan(&self, doc: &Document, threshold: f32) -> Vec<ScoredElement> {
        self.scan_where(doc, threshold, |_, _| true)
    }

    /// As [`PageScanner::scan`], but elements rejected by `admit` are neither scored nor returned.
    pub fn scan_where<F>(&self, doc: &Document, threshold: f32, admit: F) -> Vec<ScoredElement>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        let started = Instant::now();
        let mut visited = 0usize;
        let mut hits = Vec::new();
        for node in doc.elements() {
            if !admit(doc, node) {
                continue;
            }
            visited += 1;
            let breakdown = match self.scorer.score(doc, node) {
                Ok(breakdown) => breakdown,
                Err(err) => {
                    trace!(target: "perceiver.events", %node, error = %err, "scan.skip");
                    continue;
                }
            };
            if breakdown.total >= threshold {
                hits.push(ScoredElement {
                    node,
                    score: breakdown.total,
                    class_name: doc.class_name(node).to_string(),
                    id: doc.element_id(node).to_string(),
                    tag: doc.tag(node).unwrap_or_default().to_string(),
                    breakdown,
                });
            }
        }
        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        events::emit_scan(threshold, visited, hits.len(), started.elapsed());
        hits
    }

    /// Category of an element by its className + id; `None` means unknown.
    pub fn classify(&self, doc: &Document, node: NodeId) -> Option<Category> {
        let category = classify_text(&class_and_id(doc, node), self.scorer.dictionary());
        events::emit_classify(node, category);
        category
    }

    /// `scan` narrowed to elements whose className + id contains one of `keywords`.
    pub fn scan_filtered_by_keyword<S: AsRef<str>>(
        &self,
        doc: &Document,
        threshold: f32,
        keywords: &[S],
    ) -> Vec<ScoredElement> {
        self.scan(doc, threshold)
            .into_iter()
            .filter(|hit| contains_keyword(&hit.class_and_id(), keywords))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_uses_declared_order() {
        let dict = PatternDictionary::global();
        assert_eq!(classify_text("sidebar-widget", dict), Some(Category::Sidebars));
        assert_eq!(classify_text("cookie-banner", dict), Some(Category::Ads));
        assert_eq!(classify_text("gdpr", dict), Some(Category::Cookies));
        assert_eq!(classify_text("article-body", dict), None);
    }

    #[test]
    fn keyword_filter_is_case_insensitive_substring() {
        assert!(contains_keyword("Top-ADS-Slot", &["ads"]));
        assert!(!contains_keyword("header main", &["ads", "sponsor", ""]));
    }

    #[test]
    fn class_and_id_are_concatenated_without_separator() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let split = doc
            .append_element(body, "div", &[("class", "ad"), ("id", "s")])
            .unwrap();
        assert_eq!(class_and_id(&doc, split), "ads");
        assert_eq!(
            PageScanner::default().classify(&doc, split),
            Some(Category::Ads)
        );
    }
}
