//! Bounded linear backoff for prayer-time fetches.
//!
//! A *cycle* is one natural trigger (startup, location refresh, midnight)
//! with its follow-up retries. Starting a new cycle cancels the previous
//! cycle's pending retry, and results tagged with an old cycle id are
//! ignored by the session.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::config::settings::RetryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_retries: config.max_retries,
        }
    }

    /// Delay before retrying after `attempt` failed, or `None` once retries
    /// are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        Some(self.base_delay * (attempt + 1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDue {
    pub cycle: u64,
    pub attempt: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Scheduled { attempt: u32, delay: Duration },
    Exhausted,
    Stale,
}

pub struct RetryController<M> {
    policy: RetryPolicy,
    cycle: u64,
    pending: Option<JoinHandle<()>>,
    tx: UnboundedSender<M>,
    wrap: fn(RetryDue) -> M,
}

impl<M: Send + 'static> RetryController<M> {
    pub fn new(policy: RetryPolicy, tx: UnboundedSender<M>, wrap: fn(RetryDue) -> M) -> Self {
        Self {
            policy,
            cycle: 0,
            pending: None,
            tx,
            wrap,
        }
    }

    pub fn is_current(&self, cycle: u64) -> bool {
        cycle == self.cycle
    }

    pub fn retry_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start a fresh cycle at attempt 0.
    pub fn begin_cycle(&mut self) -> u64 {
        self.cancel();
        self.cycle += 1;
        self.cycle
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Record that `attempt` of `cycle` failed and arm the next retry if the
    /// policy allows one.
    pub fn on_failure(&mut self, cycle: u64, attempt: u32) -> RetryOutcome {
        if !self.is_current(cycle) {
            return RetryOutcome::Stale;
        }
        let Some(delay) = self.policy.delay_for(attempt) else {
            self.pending = None;
            return RetryOutcome::Exhausted;
        };

        let next = RetryDue {
            cycle,
            attempt: attempt + 1,
        };
        let tx = self.tx.clone();
        let wrap = self.wrap;
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(wrap(next));
        }));
        RetryOutcome::Scheduled {
            attempt: next.attempt,
            delay,
        }
    }

    pub fn on_success(&mut self, cycle: u64) {
        if self.is_current(cycle) {
            self.cancel();
        }
    }
}

impl<M> Drop for RetryController<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn backoff_grows_linearly_then_stops() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Some(Duration::from_millis(5000)));
        assert_eq!(policy.delay_for(1), Some(Duration::from_millis(10000)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_millis(15000)));
        assert_eq!(policy.delay_for(3), None);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_arrives_after_backoff() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut retry = RetryController::new(RetryPolicy::default(), tx, |d| d);
        let cycle = retry.begin_cycle();

        let start = tokio::time::Instant::now();
        assert_eq!(
            retry.on_failure(cycle, 1),
            RetryOutcome::Scheduled {
                attempt: 2,
                delay: Duration::from_secs(10)
            }
        );
        assert!(retry.retry_pending());
        let due = rx.recv().await.unwrap();
        assert_eq!(due, RetryDue { cycle, attempt: 2 });
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn new_cycle_cancels_pending_retry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut retry = RetryController::new(RetryPolicy::default(), tx, |d| d);
        let old = retry.begin_cycle();
        retry.on_failure(old, 0);

        let new = retry.begin_cycle();
        assert!(!retry.retry_pending());
        assert_eq!(retry.on_failure(old, 1), RetryOutcome::Stale);
        assert!(retry.is_current(new));

        let got = tokio::time::timeout(Duration::from_secs(60), rx.recv()).await;
        assert!(got.is_err());
    }

    #[tokio::test]
    async fn exhausted_after_max_retries() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut retry = RetryController::new(RetryPolicy::default(), tx, |d| d);
        let cycle = retry.begin_cycle();
        assert_eq!(retry.on_failure(cycle, 3), RetryOutcome::Exhausted);
        assert!(!retry.retry_pending());
    }
}
