//! Debounced subscription to a document's mutation stream.

use std::time::Duration;

use focus_shield_dom::MutationRecord;
use tokio::select;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::debounce::DebounceTimer;

/// Background task that calls `on_quiet` once per mutation burst, after the stream has been
/// silent for the debounce delay.
pub struct MutationWatch {
    task: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl MutationWatch {
    /// Spawns the watch task. Must be called inside a tokio runtime.
    pub fn start<F>(
        mut rx: broadcast::Receiver<MutationRecord>,
        delay: Duration,
        mut on_quiet: F,
    ) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let task = tokio::spawn(async move {
            debug!(
                target: "shield.watch",
                delay_ms = delay.as_millis() as u64,
                "mutation watch started"
            );
            let mut timer = DebounceTimer::new(delay);
            loop {
                select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!(target: "shield.watch", "mutation watch shutting down");
                        break;
                    }
                    record = rx.recv() => match record {
                        Ok(record) => {
                            trace!(target: "shield.watch", ?record, "mutation observed");
                            timer.arm();
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(target: "shield.watch", skipped, "mutation stream lagged");
                            timer.arm();
                        }
                        Err(RecvError::Closed) => {
                            debug!(target: "shield.watch", "mutation stream closed");
                            break;
                        }
                    },
                    _ = timer.fired() => on_quiet(),
                }
            }
            debug!(target: "shield.watch", "mutation watch exited");
        });
        Self {
            task: Some(task),
            shutdown,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.shutdown.is_cancelled()
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the task and waits for it, so no callback runs after this returns.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.task.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_shield_dom::{mutation_bus, NodeId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time;

    fn record(child: u32) -> MutationRecord {
        MutationRecord::ChildAdded {
            parent: NodeId::new(0, 0),
            child: NodeId::new(child, 0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_callback() {
        let (bus, rx) = mutation_bus(16);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut watch = MutationWatch::start(rx, Duration::from_millis(500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for child in 1..=5 {
            bus.send(record(child)).unwrap();
            time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        bus.send(record(6)).unwrap();
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        watch.stop().await;
        assert!(!watch.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_discards_a_pending_burst() {
        let (bus, rx) = mutation_bus(16);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut watch = MutationWatch::start(rx, Duration::from_millis(500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(watch.is_active());

        bus.send(record(1)).unwrap();
        time::sleep(Duration::from_millis(100)).await;
        watch.stop().await;
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
