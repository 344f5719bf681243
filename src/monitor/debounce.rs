//! Trailing-edge debounce for navigation signals

use std::time::Duration;
use tokio::time::Instant;

/// Collapses a burst of triggers into one firing `delay` after the last one
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending firing and schedule a new one
    ///
    /// A delay too large to represent leaves nothing scheduled.
    pub fn trigger(&mut self) {
        self.deadline = Instant::now().checked_add(self.delay);
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve when the pending deadline passes; never resolves when idle
    ///
    /// Cancel safe: dropping the future before the deadline leaves it armed.
    pub async fn expired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn retrigger_pushes_deadline_back() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        debouncer.trigger();
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.trigger();

        debouncer.expired().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(800), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(900), "{elapsed:?}");
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.expired()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_delay_does_not_panic() {
        let mut debouncer = Debouncer::new(Duration::MAX);
        debouncer.trigger();
        assert!(!debouncer.is_pending());
    }
}
