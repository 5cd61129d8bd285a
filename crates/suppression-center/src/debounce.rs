use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{self, Instant, Sleep};

/// Trailing-edge debounce: every [`DebounceTimer::arm`] pushes the deadline out by `delay`, and
/// [`DebounceTimer::fired`] resolves once the deadline passes without another arm.
///
/// `fired` is cancel safe, so it can sit in a `select!` next to the event source that re-arms it.
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<Pin<Box<Sleep>>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn arm(&mut self) {
        let deadline = Instant::now() + self.delay;
        match self.pending.as_mut() {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.pending = Some(Box::pin(time::sleep_until(deadline))),
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Waits for the armed deadline; never resolves while disarmed.
    pub async fn fired(&mut self) {
        match self.pending.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.pending = None;
            }
            None => future::pending::<()>().await,
        }
    }
}
