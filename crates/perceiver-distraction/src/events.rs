use std::time::Duration;

use focus_shield_dom::NodeId;
use tracing::debug;

use crate::metrics;
use crate::patterns::Category;

pub fn emit_scan(threshold: f32, visited: usize, retained: usize, duration: Duration) {
    metrics::record_scan(visited, retained, duration);
    debug!(
        target: "perceiver.events",
        threshold,
        visited,
        retained,
        elapsed_us = duration.as_micros() as u64,
        "distraction.scan.completed"
    );
}

pub fn emit_classify(node: NodeId, category: Option<Category>) {
    metrics::record_classify();
    debug!(
        target: "perceiver.events",
        %node,
        category = category.map(|c| c.as_str()).unwrap_or("unknown"),
        "distraction.classify.completed"
    );
}

pub fn emit_rescan(newly_marked: usize, duration: Duration) {
    metrics::record_rescan(newly_marked, duration);
    debug!(
        target: "perceiver.events",
        newly_marked,
        elapsed_us = duration.as_micros() as u64,
        "distraction.rescan.completed"
    );
}
