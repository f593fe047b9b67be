//! Minimum-interval gate for outbound calls
//!
//! Every external call made by a step first waits its turn here, so the
//! request rate is bounded by the controller itself rather than by how fast
//! the driver polls.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Enforces a minimum spacing between successive outbound calls
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Time left before another call is allowed, or None if one can go now
    pub fn time_until_ready(&self, last_call: Option<Instant>, now: Instant) -> Option<Duration> {
        let last = last_call?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.min_interval {
            None
        } else {
            Some(self.min_interval - elapsed)
        }
    }

    /// Sleeps until the interval since the previous call has passed, then
    /// records this call
    ///
    /// Concurrent callers are served one at a time.
    pub async fn wait_turn(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(wait) = self.time_until_ready(*last_call, Instant::now()) {
            tracing::trace!("Pacing outbound call, waiting {:?}", wait);
            sleep(wait).await;
        }

        *last_call = Some(Instant::now());
    }
}
