//! Keyword categories and the word-stem table.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::similarity::normalize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ads,
    Modals,
    Notifications,
    Sidebars,
    Social,
    Cookies,
    Tracking,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ads => "ads",
            Category::Modals => "modals",
            Category::Notifications => "notifications",
            Category::Sidebars => "sidebars",
            Category::Social => "social",
            Category::Cookies => "cookies",
            Category::Tracking => "tracking",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared order doubles as the classification tie-break.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Ads,
        &[
            "ads",
            "advert",
            "advertisement",
            "adsbygoogle",
            "adslot",
            "sponsored",
            "sponsor",
            "promo",
            "banner",
            "doubleclick",
        ],
    ),
    (
        Category::Modals,
        &["modal", "popup", "overlay", "lightbox", "dialog", "interstitial"],
    ),
    (
        Category::Notifications,
        &["notification", "toast", "snackbar", "alert", "newsletter", "subscribe"],
    ),
    (Category::Sidebars, &["sidebar", "aside", "rail", "widget"]),
    (
        Category::Social,
        &["social", "share", "sharing", "follow", "tweet", "facebook"],
    ),
    (Category::Cookies, &["cookie", "consent", "gdpr", "ccpa"]),
    (
        Category::Tracking,
        &["tracking", "tracker", "analytics", "pixel", "beacon"],
    ),
];

/// Canonical stem → surface variants (already normalized).
const STEMS: &[(&str, &[&str])] = &[
    (
        "ad",
        &[
            "ads",
            "advert",
            "adverts",
            "advertisement",
            "advertisements",
            "advertising",
        ],
    ),
    ("banner", &["banners"]),
    ("sponsor", &["sponsors", "sponsored"]),
    ("promo", &["promos", "promoted", "promotion", "promotional"]),
    ("modal", &["modals"]),
    ("popup", &["popups"]),
    ("overlay", &["overlays"]),
    ("notification", &["notifications", "notify", "notice"]),
    ("sidebar", &["sidebars"]),
    ("widget", &["widgets"]),
    ("share", &["shares", "shared", "sharing"]),
    ("cookie", &["cookies"]),
    ("track", &["tracking", "tracker", "trackers", "tracked"]),
];

static GLOBAL: Lazy<PatternDictionary> = Lazy::new(PatternDictionary::builtin);

/// Read-only keyword dictionary.
pub struct PatternDictionary {
    categories: &'static [(Category, &'static [&'static str])],
    stems: HashMap<&'static str, &'static str>,
}

impl PatternDictionary {
    /// Process-wide built-in dictionary.
    pub fn global() -> &'static PatternDictionary {
        &GLOBAL
    }

    fn builtin() -> Self {
        let stems = STEMS
            .iter()
            .flat_map(|(stem, variants)| variants.iter().map(move |variant| (*variant, *stem)))
            .collect();
        Self {
            categories: CATEGORY_KEYWORDS,
            stems,
        }
    }

    pub fn categories(&self) -> &[(Category, &'static [&'static str])] {
        self.categories
    }

    pub fn keywords(&self, category: Category) -> &[&'static str] {
        self.categories
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    /// Every keyword across all categories, in declared order.
    pub fn patterns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories
            .iter()
            .flat_map(|(_, keywords)| keywords.iter().copied())
    }

    /// Canonical stem of `word`, or the normalized word when no stem is known.
    pub fn stem_of(&self, word: &str) -> String {
        let normalized = normalize(word);
        match self.stems.get(normalized.as_str()) {
            Some(stem) => (*stem).to_string(),
            None => normalized,
        }
    }
}
