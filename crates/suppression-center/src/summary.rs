//! Summary generation for simple mode.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SummaryConfig;

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

/// Produces a short digest of readable page text. `None` means no summary is injected.
pub trait SummaryGenerator: Send + Sync {
    fn summarize(&self, text: &str) -> Option<String>;
}

/// Keeps the first few sentences of the text that are long enough to carry content.
#[derive(Clone, Debug)]
pub struct ExtractiveSummarizer {
    min_chars: usize,
    max_sentences: usize,
    min_sentence_chars: usize,
}

impl ExtractiveSummarizer {
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            min_chars: config.min_chars,
            max_sentences: config.max_sentences,
            min_sentence_chars: config.min_sentence_chars,
        }
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(&SummaryConfig::default())
    }
}

impl SummaryGenerator for ExtractiveSummarizer {
    fn summarize(&self, text: &str) -> Option<String> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() < self.min_chars || self.max_sentences == 0 {
            return None;
        }
        let sentences: Vec<&str> = SENTENCE
            .find_iter(&text)
            .map(|found| found.as_str().trim())
            .filter(|sentence| sentence.chars().count() >= self.min_sentence_chars)
            .take(self.max_sentences)
            .collect();
        if sentences.is_empty() {
            None
        } else {
            Some(sentences.join(" "))
        }
    }
}
