use std::collections::HashSet;

use focus_shield_dom::{Document, NodeId, Rect, Viewport};
use perceiver_distraction::{Category, PageScanner};
use pretty_assertions::assert_eq;

struct Fixture {
    doc: Document,
    banner: NodeId,
    sponsored: NodeId,
    sidebar: NodeId,
    article: NodeId,
    hidden_ad: NodeId,
}

fn fixture() -> Fixture {
    let mut doc = Document::new();
    doc.set_viewport(Viewport::new(1200.0, 800.0));
    let body = doc.body().unwrap();

    let banner = doc
        .append_element(body, "div", &[("class", "ad-banner-top"), ("id", "promo-slot")])
        .unwrap();
    let article = doc
        .append_element(body, "article", &[("class", "post-body"), ("id", "story")])
        .unwrap();
    doc.append_text(article, "Long form reading.").unwrap();
    let sidebar = doc
        .append_element(body, "aside", &[("class", "sidebar-widget")])
        .unwrap();
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

    Fixture {
        doc,
        banner,
        sponsored,
        sidebar,
        article,
        hidden_ad,
    }
}

fn nodes(hits: &[perceiver_distraction::ScoredElement]) -> Vec<NodeId> {
    hits.iter().map(|hit| hit.node).collect()
}

#[test]
fn scan_ranks_candidates_descending() {
    let f = fixture();
    let scanner = PageScanner::default();
    let hits = scanner.scan(&f.doc, 0.45);

    // ins: 0.4 + 0.24 + 0.05; div.ad-banner-top: 0.4 + 0.24; div.sponsored-content: 0.4 + 0.2.
    assert_eq!(nodes(&hits), vec![f.hidden_ad, f.banner, f.sponsored]);
    assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(hits[0].tag, "ins");
    assert_eq!(hits[1].class_name, "ad-banner-top");
    assert_eq!(hits[1].id, "promo-slot");
}

#[test]
fn ties_keep_document_order() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let first = doc
        .append_element(body, "div", &[("class", "popup"), ("id", "modal")])
        .unwrap();
    let second = doc
        .append_element(body, "div", &[("class", "overlay"), ("id", "dialog")])
        .unwrap();
    let hits = PageScanner::default().scan(&doc, 0.45);
    assert_eq!(hits[0].score, hits[1].score);
    assert_eq!(nodes(&hits), vec![first, second]);
}

#[test]
fn higher_threshold_is_a_subset() {
    let f = fixture();
    let scanner = PageScanner::default();
    let strict: HashSet<NodeId> = nodes(&scanner.scan(&f.doc, 0.6)).into_iter().collect();
    let loose: HashSet<NodeId> = nodes(&scanner.scan(&f.doc, 0.45)).into_iter().collect();
    assert!(!strict.is_empty());
    assert!(strict.is_subset(&loose));
}

#[test]
fn sidebar_is_classified_but_below_threshold() {
    let f = fixture();
    let scanner = PageScanner::default();
    assert_eq!(scanner.classify(&f.doc, f.sidebar), Some(Category::Sidebars));
    assert_eq!(scanner.classify(&f.doc, f.article), None);
    assert!(!nodes(&scanner.scan(&f.doc, 0.45)).contains(&f.sidebar));
}

#[test]
fn keyword_filter_narrows_to_ads() {
    let f = fixture();
    let scanner = PageScanner::default();
    let ads = scanner.scan_filtered_by_keyword(&f.doc, 0.45, &["ad-", "ads", "sponsor"]);
    assert_eq!(nodes(&ads), vec![f.hidden_ad, f.banner, f.sponsored]);

    let only_sponsor = scanner.scan_filtered_by_keyword(&f.doc, 0.45, &["SPONSOR"]);
    assert_eq!(nodes(&only_sponsor), vec![f.sponsored]);
}

#[test]
fn scan_where_skips_rejected_elements() {
    let f = fixture();
    let scanner = PageScanner::default();
    let hits = scanner.scan_where(&f.doc, 0.45, |_, node| node != f.banner);
    assert!(!nodes(&hits).contains(&f.banner));
    assert!(nodes(&hits).contains(&f.hidden_ad));
}
