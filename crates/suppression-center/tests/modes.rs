mod common;

use std::collections::BTreeSet;

use common::*;
use pretty_assertions::assert_eq;
use suppression_center::{
    CommandHandler, CommandRequest, CommandStatus, ShieldEvent, ShieldMode, SuppressionConfig,
    SuppressionController,
};

#[tokio::test]
async fn simple_mode_marks_scored_and_fallback_elements() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());

    let response = controller.handle(CommandRequest::new("simpleMode")).await;
    assert!(response.is_success());
    assert_eq!(controller.mode().await, ShieldMode::Simple);

    let expected: BTreeSet<_> = [page.banner, page.sidebar, page.sponsored, page.hidden_ad]
        .into_iter()
        .collect();
    assert_eq!(marked(&page.doc), expected);

    let doc = page.doc.read();
    assert!(!doc.has_class(page.header, HIDDEN));
    assert!(!doc.has_class(page.main, HIDDEN));
    assert!(!doc.has_class(page.footer, HIDDEN));
    let body = doc.body().unwrap();
    assert!(!doc.has_class(body, HIDDEN));
    assert_eq!(doc.attribute(body, MODE_ATTR), Some("simple"));
}

#[tokio::test]
async fn simple_mode_injects_summary_as_first_body_child() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());
    let report = controller.transition(ShieldMode::Simple).await.unwrap();

    let expected = STORY[..3].join(" ");
    assert_eq!(report.summary.as_deref(), Some(expected.as_str()));

    let summary = controller.summary_node().await.unwrap();
    assert_eq!(summaries(&page.doc), vec![summary]);
    let doc = page.doc.read();
    let body = doc.body().unwrap();
    assert_eq!(doc.children(body).first(), Some(&summary));
    assert!(doc.text_content(summary).ends_with(&expected));
    assert!(!doc.has_class(summary, HIDDEN));
}

#[tokio::test]
async fn short_pages_get_no_summary() {
    let page = page();
    let mut config = config();
    config.summary.min_chars = 10_000;
    let controller = SuppressionController::new(page.doc.clone(), config);
    let report = controller.transition(ShieldMode::Simple).await.unwrap();
    assert!(report.summary.is_none());
    assert!(summaries(&page.doc).is_empty());
    assert!(!marked(&page.doc).is_empty());
}

#[tokio::test]
async fn repeated_simple_mode_converges() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());

    let first = controller.transition(ShieldMode::Simple).await.unwrap();
    let after_first = marked(&page.doc);
    let second = controller.transition(ShieldMode::Simple).await.unwrap();

    assert_eq!(marked(&page.doc), after_first);
    assert_eq!(first.marked, second.marked);
    assert_eq!(first.summary, second.summary);
    assert_eq!(summaries(&page.doc).len(), 1);
    assert!(controller.watch_active().await);
}

#[tokio::test]
async fn focus_mode_marks_ads_and_highlights_main() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());
    let report = controller.transition(ShieldMode::Focus).await.unwrap();

    assert_eq!(report.highlighted, Some(page.main));
    assert_eq!(controller.highlighted().await, Some(page.main));
    let doc = page.doc.read();
    assert!(doc.has_class(page.main, HIGHLIGHT));
    assert!(doc.has_class(page.banner, HIDDEN));
    assert!(doc.has_class(page.hidden_ad, HIDDEN));
    assert!(!doc.has_class(page.sidebar, HIDDEN));
    assert!(!doc.has_class(page.header, HIDDEN));
    assert_eq!(doc.attribute(doc.body().unwrap(), MODE_ATTR), Some("focus"));
    drop(doc);
    assert!(summaries(&page.doc).is_empty());
}

#[tokio::test]
async fn focus_isolation_hides_everything_but_header_and_main() {
    let page = page();
    let config = SuppressionConfig {
        isolate_main_content: true,
        ..SuppressionConfig::default()
    };
    let controller = SuppressionController::new(page.doc.clone(), config);
    controller.transition(ShieldMode::Focus).await.unwrap();

    let doc = page.doc.read();
    assert!(doc.has_class(page.sidebar, HIDDEN));
    assert!(doc.has_class(page.footer, HIDDEN));
    assert!(!doc.has_class(page.header, HIDDEN));
    assert!(!doc.has_class(page.main, HIDDEN));
}

async fn assert_focus_converges(config: SuppressionConfig) {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config);

    let first = controller.transition(ShieldMode::Focus).await.unwrap();
    let marked_once = marked(&page.doc);
    let highlighted_once = page.doc.read().elements_with_class(HIGHLIGHT);
    assert_eq!(highlighted_once, vec![page.main]);

    let second = controller.transition(ShieldMode::Focus).await.unwrap();
    assert_eq!(marked(&page.doc), marked_once);
    assert_eq!(page.doc.read().elements_with_class(HIGHLIGHT), highlighted_once);
    assert_eq!(first.marked, second.marked);
    assert_eq!(second.highlighted, Some(page.main));
    assert_eq!(controller.highlighted().await, Some(page.main));
    assert!(summaries(&page.doc).is_empty());
    assert!(controller.watch_active().await);
}

#[tokio::test]
async fn repeated_focus_mode_converges() {
    assert_focus_converges(config()).await;
}

#[tokio::test]
async fn repeated_isolated_focus_mode_converges() {
    assert_focus_converges(SuppressionConfig {
        isolate_main_content: true,
        ..SuppressionConfig::default()
    })
    .await;
}

#[tokio::test]
async fn mixed_case_mode_attribute_is_reverted() {
    let page = page();
    let config = SuppressionConfig {
        mode_attribute: "data-Focus-Shield".into(),
        ..SuppressionConfig::default()
    };
    let controller = SuppressionController::new(page.doc.clone(), config);

    controller.transition(ShieldMode::Simple).await.unwrap();
    {
        let doc = page.doc.read();
        assert_eq!(doc.attribute(doc.body().unwrap(), MODE_ATTR), Some("simple"));
    }

    controller.transition(ShieldMode::None).await.unwrap();
    let doc = page.doc.read();
    let body = doc.body().unwrap();
    assert_eq!(doc.attribute(body, MODE_ATTR), None);
    assert!(doc.attributes(body).is_empty());
}

#[tokio::test]
async fn switching_modes_leaves_no_residue() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());
    controller.transition(ShieldMode::Simple).await.unwrap();
    controller.transition(ShieldMode::Focus).await.unwrap();

    assert!(summaries(&page.doc).is_empty());
    assert!(!page.doc.read().has_class(page.sidebar, HIDDEN));
    assert!(controller.watch_active().await);
}

#[tokio::test]
async fn normal_mode_reverts_everything() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());

    for action in ["focusMode", "simplifyMode"] {
        assert!(controller.handle(CommandRequest::new(action)).await.is_success());
        assert!(!marked(&page.doc).is_empty());

        let response = controller.handle(CommandRequest::new("normalMode")).await;
        assert!(response.is_success());
        assert_eq!(controller.mode().await, ShieldMode::None);
        assert!(marked(&page.doc).is_empty());
        assert!(summaries(&page.doc).is_empty());
        let doc = page.doc.read();
        assert!(doc.elements_with_class(HIGHLIGHT).is_empty());
        assert_eq!(doc.attribute(doc.body().unwrap(), MODE_ATTR), None);
        drop(doc);
        assert!(!controller.watch_active().await);
        assert!(controller.summary_node().await.is_none());
        assert!(controller.highlighted().await.is_none());
    }
}

#[tokio::test]
async fn unknown_commands_are_acknowledged_without_effect() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());

    let response = controller.handle(CommandRequest::new("teleportMode")).await;
    assert_eq!(response.status, CommandStatus::Success);
    assert_eq!(controller.mode().await, ShieldMode::None);
    assert!(marked(&page.doc).is_empty());

    controller.handle(CommandRequest::new("simpleMode")).await;
    let before = marked(&page.doc);
    controller.handle(CommandRequest::new("teleportMode")).await;
    assert_eq!(controller.mode().await, ShieldMode::Simple);
    assert_eq!(marked(&page.doc), before);
}

#[tokio::test]
async fn json_commands_round_the_bridge() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());

    let response = controller.handle_json(r#"{"action":"focusMode"}"#).await;
    assert!(response.is_success());
    assert_eq!(controller.mode().await, ShieldMode::Focus);

    let response = controller.handle_json(r#"{"verb":"focusMode"}"#).await;
    assert_eq!(response.status, CommandStatus::Error);
    assert_eq!(controller.mode().await, ShieldMode::Focus);
}

#[tokio::test]
async fn failures_become_error_responses() {
    let page = page();
    {
        let mut doc = page.doc.write();
        let body = doc.body().unwrap();
        doc.remove(body).unwrap();
    }
    let controller = SuppressionController::new(page.doc.clone(), config());
    let response = controller.handle(CommandRequest::new("simpleMode")).await;
    assert_eq!(response.status, CommandStatus::Error);
    assert!(response.message.is_some());
    assert_eq!(controller.mode().await, ShieldMode::None);
    assert!(!controller.watch_active().await);
}

#[tokio::test]
async fn mode_changes_are_published() {
    let page = page();
    let controller = SuppressionController::new(page.doc.clone(), config());
    let mut events = controller.subscribe();

    let report = controller.transition(ShieldMode::Simple).await.unwrap();
    controller.transition(ShieldMode::None).await.unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        ShieldEvent::ModeChanged {
            from: ShieldMode::None,
            to: ShieldMode::Simple,
            marked: report.marked.len(),
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        ShieldEvent::ModeChanged {
            from: ShieldMode::Simple,
            to: ShieldMode::None,
            marked: 0,
        }
    );
}
