use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::info;
use tracing::warn;

use crate::freqtrade::FreqtradeClient;

/// Fixed-backoff retry schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Pause between two attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, backoff: Duration::from_secs(1) }
    }
}

/// Asks the running trading engine to re-read its configuration
pub trait ReloadNotifier: Send + Sync {
    /// True only when the engine explicitly acknowledged the reload
    fn notify(&self) -> impl Future<Output = bool> + Send;
}

impl ReloadNotifier for FreqtradeClient {
    async fn notify(&self) -> bool {
        retry_fixed(self.retry_policy(), "Config reload", || self.reload_config()).await.is_some()
    }
}

/// Run `op` until it succeeds or the policy is exhausted
pub async fn retry_fixed<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Some(value),
            Err(err) if attempt < attempts => {
                info!(attempt, attempts, error = %err, "{label} failed, retrying in {:?}", policy.backoff);
                tokio::time::sleep(policy.backoff).await;
            }
            Err(err) => {
                warn!(attempts, error = %err, "{label} failed, giving up");
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;
    use std::sync::atomic::Ordering;

    use tokio::time::Instant;

    use super::*;

    async fn run_with_failures(policy: RetryPolicy, failures: u32) -> (Option<u32>, u32) {
        let calls = AtomicU32::new(0);
        let result = retry_fixed(policy, "test", || {
            let calls = &calls;
            async move {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call <= failures { Err(format!("failure {call}")) } else { Ok(call) }
            }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.backoff, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let started = Instant::now();
        let (result, calls) = run_with_failures(RetryPolicy::default(), 0).await;
        assert_eq!(result, Some(1));
        assert_eq!(calls, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_last_attempt() {
        let started = Instant::now();
        let (result, calls) = run_with_failures(RetryPolicy::default(), 2).await;
        assert_eq!(result, Some(3));
        assert_eq!(calls, 3);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts() {
        let (result, calls) = run_with_failures(RetryPolicy::default(), u32::MAX).await;
        assert_eq!(result, None);
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let (result, calls) = run_with_failures(RetryPolicy { attempts: 0, backoff: Duration::from_secs(1) }, 0).await;
        assert_eq!(result, Some(1));
        assert_eq!(calls, 1);
    }
}
