use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Process-wide admission control for upstream calls.
///
/// At most one `acquire` completes per `interval`, however many workers are
/// waiting. Waiters queue on a fair mutex, so they are admitted in the order
/// they arrived.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    last_admitted: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: Mutex::new(None),
        }
    }

    /// Wait until a full interval has passed since the previous admission.
    pub async fn acquire(&self) {
        let mut last = self.last_admitted.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if Instant::now() < ready_at {
                debug!(
                    "Rate gate: waiting {:?} for the next upstream slot",
                    ready_at - Instant::now()
                );
                sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }
}
