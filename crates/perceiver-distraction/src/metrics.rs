//! Telemetry helpers for the distraction perceiver.
//!
//! Lightweight counters + latency aggregates so the CLI can surface basic metrics without
//! depending on an external metrics backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

static SCAN_TOTAL: AtomicU64 = AtomicU64::new(0);
static SCAN_VISITED: AtomicU64 = AtomicU64::new(0);
static SCAN_RETAINED: AtomicU64 = AtomicU64::new(0);
static SCAN_LAT_NS: AtomicU64 = AtomicU64::new(0);
static SCAN_LAT_SAMPLES: AtomicU64 = AtomicU64::new(0);

static CLASSIFY_TOTAL: AtomicU64 = AtomicU64::new(0);

static RESCAN_TOTAL: AtomicU64 = AtomicU64::new(0);
static RESCAN_MARKED: AtomicU64 = AtomicU64::new(0);
static RESCAN_LAT_NS: AtomicU64 = AtomicU64::new(0);
static RESCAN_LAT_SAMPLES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricCounter {
    pub total: u64,
    pub avg_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricSnapshot {
    pub scan: MetricCounter,
    pub elements_visited: u64,
    pub elements_retained: u64,
    pub classify_total: u64,
    pub rescan: MetricCounter,
    pub rescan_marked: u64,
}

pub fn record_scan(visited: usize, retained: usize, duration: Duration) {
    SCAN_TOTAL.fetch_add(1, Ordering::Relaxed);
    SCAN_VISITED.fetch_add(visited as u64, Ordering::Relaxed);
    SCAN_RETAINED.fetch_add(retained as u64, Ordering::Relaxed);
    record_latency(&SCAN_LAT_NS, &SCAN_LAT_SAMPLES, duration);
}

pub fn record_classify() {
    CLASSIFY_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_rescan(newly_marked: usize, duration: Duration) {
    RESCAN_TOTAL.fetch_add(1, Ordering::Relaxed);
    RESCAN_MARKED.fetch_add(newly_marked as u64, Ordering::Relaxed);
    record_latency(&RESCAN_LAT_NS, &RESCAN_LAT_SAMPLES, duration);
}

pub fn snapshot() -> MetricSnapshot {
    MetricSnapshot {
        scan: make_counter(
            SCAN_TOTAL.load(Ordering::Relaxed),
            SCAN_LAT_NS.load(Ordering::Relaxed),
            SCAN_LAT_SAMPLES.load(Ordering::Relaxed),
        ),
        elements_visited: SCAN_VISITED.load(Ordering::Relaxed),
        elements_retained: SCAN_RETAINED.load(Ordering::Relaxed),
        classify_total: CLASSIFY_TOTAL.load(Ordering::Relaxed),
        rescan: make_counter(
            RESCAN_TOTAL.load(Ordering::Relaxed),
            RESCAN_LAT_NS.load(Ordering::Relaxed),
            RESCAN_LAT_SAMPLES.load(Ordering::Relaxed),
        ),
        rescan_marked: RESCAN_MARKED.load(Ordering::Relaxed),
    }
}

fn make_counter(total: u64, nanos: u64, samples: u64) -> MetricCounter {
    let avg_ms = if samples == 0 {
        0.0
    } else {
        (nanos as f64 / samples as f64) / 1_000_000.0
    };
    MetricCounter { total, avg_ms }
}

fn record_latency(total_ns: &AtomicU64, samples: &AtomicU64, duration: Duration) {
    let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
    total_ns.fetch_add(nanos, Ordering::Relaxed);
    samples.fetch_add(1, Ordering::Relaxed);
}
