//! Token normalization and the fuzzy match used by every scorer.
//!
//! The positional fallback is not an edit distance: it counts characters that agree at the same
//! index and divides by the longer length. Scan thresholds are tuned against exactly this formula.

/// `matches` accepts a pair strictly above this strength.
pub const MATCH_THRESHOLD: f32 = 0.7;

const EXACT: f32 = 1.0;
const CONTAINED: f32 = 0.9;

/// Lowercase, drop `-` and `_`, trim.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(|c: char| c == '-' || c == '_', "")
        .trim()
        .to_string()
}

/// Match strength in `[0, 1]`. Symmetric in its arguments.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = normalize(a);
    let b = normalize(b);
    if a == b {
        return EXACT;
    }
    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return CONTAINED;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let longest = a_chars.len().max(b_chars.len());
    let aligned = a_chars
        .iter()
        .zip(b_chars.iter())
        .filter(|(left, right)| left == right)
        .count();
    aligned as f32 / longest as f32
}

pub fn matches(word: &str, pattern: &str) -> bool {
    similarity(word, pattern) > MATCH_THRESHOLD
}
