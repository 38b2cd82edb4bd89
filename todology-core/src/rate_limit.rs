//! Minimum spacing between calls to a shared backend.

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Delays calls so consecutive ones are at least `min_interval` apart.
///
/// The interval is measured from when the previous call *finished*
/// ([`RateLimiter::mark`]) to when the next one may start
/// ([`RateLimiter::wait`]). Calls are never dropped, only delayed.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        RateLimiter {
            min_interval,
            last_call: None,
        }
    }

    /// How long a call starting at `now` still has to wait.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_call {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Sleep until the next call is allowed.
    pub async fn wait(&self) {
        let wait = self.remaining(Instant::now());
        if !wait.is_zero() {
            log::debug!("Rate limited, waiting {:.1}s", wait.as_secs_f64());
            sleep(wait).await;
        }
    }

    /// Record that a call just finished.
    pub fn mark(&mut self) {
        self.last_call = Some(Instant::now());
    }
}
