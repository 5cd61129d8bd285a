//! Mode state machine over a shared document.
//!
//! Every transition fully reverts whatever the previous mode left in the page before applying
//! the target mode, so `simple -> focus` never leaves simple-mode markers behind and repeating
//! a command converges to the same page. Commands are serialized by the state mutex; the
//! document lock is never held across an await.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use focus_shield_dom::{Document, MutationRecord, NodeId, Selector, SharedDocument};
use perceiver_distraction::events::emit_rescan;
use perceiver_distraction::scanner::contains_keyword;
use perceiver_distraction::PageScanner;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::command::{CommandHandler, CommandRequest, CommandResponse, ShieldCommand};
use crate::config::SuppressionConfig;
use crate::errors::SuppressionError;
use crate::events::{event_bus, ShieldEvent, ShieldEventBus};
use crate::state::{ShieldMode, SuppressionState};
use crate::summary::{ExtractiveSummarizer, SummaryGenerator};
use crate::watcher::MutationWatch;

const EVENT_CAPACITY: usize = 64;
const STRUCTURAL_TAGS: &[&str] = &["html", "head", "body"];

/// What a transition did to the page.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TransitionReport {
    pub from: ShieldMode,
    pub to: ShieldMode,
    pub marked: Vec<NodeId>,
    pub highlighted: Option<NodeId>,
    pub summary: Option<String>,
}

pub struct SuppressionController {
    document: SharedDocument,
    scanner: Arc<PageScanner>,
    config: Arc<SuppressionConfig>,
    summarizer: Arc<dyn SummaryGenerator>,
    events: ShieldEventBus,
    state: Mutex<SuppressionState>,
}

impl SuppressionController {
    pub fn new(document: SharedDocument, config: SuppressionConfig) -> Self {
        let scanner = PageScanner::new(config.perceiver.clone());
        let summarizer = ExtractiveSummarizer::new(&config.summary);
        Self {
            document,
            scanner: Arc::new(scanner),
            config: Arc::new(config),
            summarizer: Arc::new(summarizer),
            events: event_bus(EVENT_CAPACITY),
            state: Mutex::new(SuppressionState::default()),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn SummaryGenerator>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn config(&self) -> &SuppressionConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShieldEvent> {
        self.events.subscribe()
    }

    pub async fn mode(&self) -> ShieldMode {
        self.state.lock().await.mode()
    }

    pub async fn watch_active(&self) -> bool {
        self.state.lock().await.watch_active()
    }

    pub async fn summary_node(&self) -> Option<NodeId> {
        self.state.lock().await.summary()
    }

    pub async fn highlighted(&self) -> Option<NodeId> {
        self.state.lock().await.highlighted()
    }

    /// Reverts the current mode, then applies `target`.
    ///
    /// On error the page may be partially suppressed; the recorded mode stays `none`.
    pub async fn transition(
        &self,
        target: ShieldMode,
    ) -> Result<TransitionReport, SuppressionError> {
        let mut state = self.state.lock().await;
        let from = state.mode;
        self.revert(&mut state).await;

        let mut report = TransitionReport {
            from,
            to: target,
            ..TransitionReport::default()
        };
        let mutations = match target {
            ShieldMode::None => None,
            ShieldMode::Simple => Some(self.apply_simple(&mut state, &mut report)?),
            ShieldMode::Focus => Some(self.apply_focus(&mut state, &mut report)?),
        };
        if let Some(rx) = mutations {
            self.arm_watch(&mut state, target, rx).await;
        }
        state.mode = target;

        info!(
            target: "shield.controller",
            from = %from,
            to = %target,
            marked = report.marked.len(),
            summary = report.summary.is_some(),
            "mode changed"
        );
        let _ = self.events.send(ShieldEvent::ModeChanged {
            from,
            to: target,
            marked: report.marked.len(),
        });
        Ok(report)
    }

    /// Stops the watch, then removes every marker, highlight, summary and mode attribute.
    async fn revert(&self, state: &mut SuppressionState) {
        if let Some(mut watch) = state.watch.take() {
            watch.stop().await;
        }
        let config = &self.config;
        let mut doc = self.document.write();

        let mut unmarked = 0usize;
        for node in doc.elements_with_class(&config.hidden_class) {
            if doc.remove_class(node, &config.hidden_class).unwrap_or(false) {
                unmarked += 1;
            }
        }
        for node in doc.elements_with_class(&config.highlight_class) {
            let _ = doc.remove_class(node, &config.highlight_class);
        }

        let mut summaries: Vec<NodeId> = state.summary.take().into_iter().collect();
        summaries.extend(
            doc.elements()
                .into_iter()
                .filter(|node| doc.element_id(*node) == config.summary_id),
        );
        for node in summaries {
            if doc.is_connected(node) {
                if let Err(err) = doc.remove(node) {
                    debug!(
                        target: "shield.controller",
                        %node,
                        error = %err,
                        "summary already gone"
                    );
                }
            }
        }

        if let Some(carrier) = doc.body() {
            let _ = doc.remove_attribute(carrier, &config.mode_attribute);
        }
        state.highlighted = None;
        state.mode = ShieldMode::None;
        debug!(target: "shield.controller", unmarked, "page reverted");
    }

    /// Returns a mutation subscription taken under the same write lock as the last marker write.
    fn apply_simple(
        &self,
        state: &mut SuppressionState,
        report: &mut TransitionReport,
    ) -> Result<broadcast::Receiver<MutationRecord>, SuppressionError> {
        let config = &self.config;
        let mut doc = self.document.write();

        let mut candidates: Vec<NodeId> = self
            .scanner
            .scan(&doc, config.simple_threshold)
            .into_iter()
            .map(|hit| hit.node)
            .collect();
        candidates.extend(select_each(&doc, &config.fallback_selectors));
        report.marked = mark_all(&mut doc, candidates, config, None);

        if config.summary.enabled {
            let region = main_content(&doc, &config.main_content_selectors)
                .or_else(|| doc.body())
                .unwrap_or_else(|| doc.root());
            let text = doc.text_content(region);
            if let Some(summary) = self.summarizer.summarize(&text) {
                state.summary = Some(inject_summary(&mut doc, config, &summary)?);
                report.summary = Some(summary);
            }
        }

        set_mode_attribute(&mut doc, config, ShieldMode::Simple)?;
        Ok(doc.subscribe())
    }

    fn apply_focus(
        &self,
        state: &mut SuppressionState,
        report: &mut TransitionReport,
    ) -> Result<broadcast::Receiver<MutationRecord>, SuppressionError> {
        let config = &self.config;
        let mut doc = self.document.write();

        let main = main_content(&doc, &config.main_content_selectors);
        let mut candidates: Vec<NodeId> = self
            .scanner
            .scan_filtered_by_keyword(&doc, config.focus_threshold, &config.ad_keywords)
            .into_iter()
            .map(|hit| hit.node)
            .collect();

        if let Some(main) = main {
            doc.add_class(main, &config.highlight_class)?;
            state.highlighted = Some(main);
            report.highlighted = Some(main);

            if config.isolate_main_content {
                if let Some(body) = doc.body() {
                    candidates.extend(
                        doc.element_children(body)
                            .into_iter()
                            .filter(|child| doc.tag(*child) != Some("header")),
                    );
                }
            }
        }
        report.marked = mark_all(&mut doc, candidates, config, main);

        set_mode_attribute(&mut doc, config, ShieldMode::Focus)?;
        Ok(doc.subscribe())
    }

    /// `rx` must come from the apply step: its own writes are unseen, host writes after it are not.
    async fn arm_watch(
        &self,
        state: &mut SuppressionState,
        mode: ShieldMode,
        rx: broadcast::Receiver<MutationRecord>,
    ) {
        if let Some(mut previous) = state.watch.take() {
            previous.stop().await;
        }
        let document = Arc::clone(&self.document);
        let scanner = Arc::clone(&self.scanner);
        let config = Arc::clone(&self.config);
        let events = self.events.clone();
        state.watch = Some(MutationWatch::start(rx, config.debounce(), move || {
            let newly = incremental_rescan(&document, &scanner, &config);
            let _ = events.send(ShieldEvent::Rescanned {
                mode,
                newly_marked: newly.len(),
            });
        }));
    }
}

#[async_trait]
impl CommandHandler for SuppressionController {
    async fn handle(&self, request: CommandRequest) -> CommandResponse {
        let Some(command) = ShieldCommand::parse(&request.action) else {
            debug!(
                target: "shield.controller",
                action = %request.action,
                "ignoring unknown command"
            );
            return CommandResponse::success();
        };
        match self.transition(command.target()).await {
            Ok(_) => CommandResponse::success(),
            Err(err) => {
                warn!(
                    target: "shield.controller",
                    action = %request.action,
                    error = %err,
                    "command failed"
                );
                CommandResponse::error(err.to_string())
            }
        }
    }
}

/// Marks unmarked ad-like elements that appeared since the last pass. Returns the new marks.
pub fn incremental_rescan(
    document: &SharedDocument,
    scanner: &PageScanner,
    config: &SuppressionConfig,
) -> Vec<NodeId> {
    let started = Instant::now();
    let mut doc = document.write();
    let hidden = config.hidden_class.as_str();

    let mut candidates: Vec<NodeId> = scanner
        .scan_where(&doc, config.rescan_threshold, |doc, node| {
            !doc.has_class(node, hidden)
        })
        .into_iter()
        .filter(|hit| contains_keyword(&hit.class_and_id(), &config.ad_keywords))
        .map(|hit| hit.node)
        .collect();
    candidates.extend(select_each(&doc, &config.ad_marker_selectors));

    let newly = mark_all(&mut doc, candidates, config, None);
    emit_rescan(newly.len(), started.elapsed());
    newly
}

fn is_protected(doc: &Document, node: NodeId, summary_id: &str) -> bool {
    if doc
        .tag(node)
        .map_or(true, |tag| STRUCTURAL_TAGS.contains(&tag))
    {
        return true;
    }
    let mut current = Some(node);
    while let Some(id) = current {
        if doc.element_id(id) == summary_id {
            return true;
        }
        current = doc.parent(id);
    }
    false
}

/// Adds the suppression marker to each candidate once. Structural elements, the summary, and
/// anything containing `keep` are skipped. Returns the nodes that were newly marked.
fn mark_all(
    doc: &mut Document,
    candidates: Vec<NodeId>,
    config: &SuppressionConfig,
    keep: Option<NodeId>,
) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut marked = Vec::new();
    for node in candidates {
        if !seen.insert(node) || is_protected(doc, node, &config.summary_id) {
            continue;
        }
        if keep.is_some_and(|keep| doc.contains(node, keep)) {
            continue;
        }
        match doc.add_class(node, &config.hidden_class) {
            Ok(true) => marked.push(node),
            Ok(false) => {}
            Err(err) => debug!(target: "shield.controller", %node, error = %err, "mark skipped"),
        }
    }
    marked
}

/// Union of every selector's matches in list order. Bad selectors are logged and skipped.
fn select_each(doc: &Document, selectors: &[String]) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    for source in selectors {
        match Selector::parse(source) {
            Ok(selector) => nodes.extend(doc.query_all(&selector)),
            Err(err) => warn!(
                target: "shield.controller",
                selector = %source,
                error = %err,
                "selector skipped"
            ),
        }
    }
    nodes
}

fn main_content(doc: &Document, selectors: &[String]) -> Option<NodeId> {
    selectors.iter().find_map(|source| match Selector::parse(source) {
        Ok(selector) => doc.query_first(&selector),
        Err(err) => {
            warn!(
                target: "shield.controller",
                selector = %source,
                error = %err,
                "selector skipped"
            );
            None
        }
    })
}

fn inject_summary(
    doc: &mut Document,
    config: &SuppressionConfig,
    summary: &str,
) -> Result<NodeId, SuppressionError> {
    let container = doc.body().ok_or(SuppressionError::MissingBody)?;
    let panel = doc.create_element("div");
    doc.set_attribute(panel, "id", &config.summary_id)?;
    doc.set_attribute(panel, "role", "note")?;
    let heading = doc.append_element(panel, "h2", &[])?;
    doc.append_text(heading, "Summary")?;
    let paragraph = doc.append_element(panel, "p", &[])?;
    doc.append_text(paragraph, summary)?;
    doc.insert_first_child(container, panel)?;
    Ok(panel)
}

fn set_mode_attribute(
    doc: &mut Document,
    config: &SuppressionConfig,
    mode: ShieldMode,
) -> Result<(), SuppressionError> {
    let body = doc.body().ok_or(SuppressionError::MissingBody)?;
    doc.set_attribute(body, &config.mode_attribute, mode.as_str())?;
    Ok(())
}
