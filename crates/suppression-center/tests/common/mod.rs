#![allow(dead_code)]

use std::collections::BTreeSet;

use focus_shield_dom::{Document, NodeId, Rect, SharedDocument, Viewport};
use suppression_center::SuppressionConfig;

pub const HIDDEN: &str = "focus-shield-hidden";
pub const HIGHLIGHT: &str = "focus-shield-highlight";
pub const SUMMARY_ID: &str = "focus-shield-summary";
pub const MODE_ATTR: &str = "data-focus-shield";

pub const STORY: [&str; 4] = [
    "The city council approved the new riverside park after a long public debate.",
    "Construction is expected to begin next spring and last roughly two years.",
    "Local businesses along the waterfront have welcomed the decision so far.",
    "Opponents argued that the budget should have gone to road repairs instead.",
];

pub struct Page {
    pub doc: SharedDocument,
    pub header: NodeId,
    pub banner: NodeId,
    pub main: NodeId,
    pub sidebar: NodeId,
    pub sponsored: NodeId,
    pub hidden_ad: NodeId,
    pub footer: NodeId,
}

pub fn page() -> Page {
    let mut doc = Document::new();
    doc.set_viewport(Viewport::new(1200.0, 800.0));
    let body = doc.body().unwrap();

    let header = doc
        .append_element(body, "header", &[("class", "site-header")])
        .unwrap();
    doc.append_text(header, "Daily Planet").unwrap();
    let banner = doc
        .append_element(body, "div", &[("class", "ad-banner-top"), ("id", "promo-slot")])
        .unwrap();
    let main = doc
        .append_element(body, "main", &[("class", "story")])
        .unwrap();
    for sentence in STORY {
        let paragraph = doc.append_element(main, "p", &[]).unwrap();
        doc.append_text(paragraph, sentence).unwrap();
    }
    let sidebar = doc
        .append_element(body, "aside", &[("class", "sidebar-widget")])
        .unwrap();
    doc.append_text(sidebar, "Most read").unwrap();
    let sponsored = doc
        .append_element(
            body,
            "div",
            &[("class", "sponsored-content"), ("data-ad-client", "ca-pub-1")],
        )
        .unwrap();
    let hidden_ad = doc
        .append_element(body, "ins", &[("class", "adsbygoogle"), ("id", "ad-unit")])
        .unwrap();
    doc.set_geometry(hidden_ad, Rect::new(0.0, 0.0, 0.0, 0.0))
        .unwrap();
    let footer = doc
        .append_element(body, "footer", &[("class", "site-footer")])
        .unwrap();

    Page {
        doc: doc.into_shared(),
        header,
        banner,
        main,
        sidebar,
        sponsored,
        hidden_ad,
        footer,
    }
}

pub fn config() -> SuppressionConfig {
    SuppressionConfig::default()
}

pub fn marked(doc: &SharedDocument) -> BTreeSet<NodeId> {
    doc.read().elements_with_class(HIDDEN).into_iter().collect()
}

pub fn summaries(doc: &SharedDocument) -> Vec<NodeId> {
    let doc = doc.read();
    doc.elements()
        .into_iter()
        .filter(|node| doc.element_id(*node) == SUMMARY_ID)
        .collect()
}
