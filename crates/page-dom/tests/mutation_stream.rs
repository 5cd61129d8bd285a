use focus_shield_dom::{Document, MutationRecord};
use pretty_assertions::assert_eq;
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn child_list_changes_are_published() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let mut rx = doc.subscribe();

    let slot = doc
        .append_element(body, "div", &[("data-ad-slot", "123")])
        .unwrap();
    assert_eq!(
        rx.recv().await.unwrap(),
        MutationRecord::ChildAdded {
            parent: body,
            child: slot
        }
    );

    doc.remove(slot).unwrap();
    assert_eq!(
        rx.recv().await.unwrap(),
        MutationRecord::ChildRemoved {
            parent: body,
            child: slot
        }
    );
}

#[tokio::test]
async fn attribute_and_class_edits_are_silent() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let div = doc.append_element(body, "div", &[]).unwrap();
    let mut rx = doc.subscribe();

    doc.add_class(div, "focus-shield-hidden").unwrap();
    doc.set_attribute(body, "data-focus-shield", "simple").unwrap();
    doc.remove_class(div, "focus-shield-hidden").unwrap();

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn detached_subtrees_do_not_publish_until_attached() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let mut rx = doc.subscribe();

    let wrapper = doc.create_element("section");
    let inner = doc.append_element(wrapper, "p", &[]).unwrap();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    doc.append_child(body, wrapper).unwrap();
    assert_eq!(
        rx.recv().await.unwrap(),
        MutationRecord::ChildAdded {
            parent: body,
            child: wrapper
        }
    );
    assert!(doc.is_connected(inner));
}

#[test]
fn html_round_trip_keeps_markers() {
    let mut doc = Document::parse_html(
        r#"<html><head><title>t</title></head><body><div class="ad-banner">x</div></body></html>"#,
    );
    let banner = doc.select(".ad-banner").unwrap()[0];
    doc.add_class(banner, "focus-shield-hidden").unwrap();

    let reparsed = Document::parse_html(&doc.to_html());
    let marked = reparsed.elements_with_class("focus-shield-hidden");
    assert_eq!(marked.len(), 1);
    assert_eq!(reparsed.class_name(marked[0]), "ad-banner focus-shield-hidden");
}
