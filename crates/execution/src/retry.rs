//! Retry policy for remote calls.
//!
//! One policy object is built from configuration and handed to every
//! service that talks to the node.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How backoff delays are randomised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jitter {
    /// Exact exponential delays.
    None,
    /// Uniform in `[0, delay]`.
    Full,
    /// Uniform in `delay ± pct%`.
    Proportional(u8),
}

/// Exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first; `0` behaves as `1`.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Cap on any single delay.
    pub max_delay: Duration,
    pub jitter: Jitter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: Jitter::Proportional(25),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (0-based), without jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return delay;
        }
        let mut rng = rand::rng();
        let jittered_ms = match self.jitter {
            Jitter::None => ms,
            Jitter::Full => rng.random_range(0..=ms),
            Jitter::Proportional(pct) => {
                let spread = ms.saturating_mul(u64::from(pct.min(100))) / 100;
                rng.random_range(ms - spread..=ms.saturating_add(spread))
            }
        };
        Duration::from_millis(jittered_ms)
    }

    /// Delay actually slept before retry number `retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.jittered(self.backoff(retry))
    }

    /// Runs `op`, retrying every failure.
    ///
    /// # Errors
    /// Returns the last error once all attempts are used.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(op, |_| true).await
    }

    /// Runs `op`, retrying failures for which `should_retry` holds.
    ///
    /// # Errors
    /// Returns the first non-retryable error, or the last error once all
    /// attempts are used.
    pub async fn run_if<T, E, F, Fut, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt = attempt, "Call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempt < attempts && should_retry(&e) => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        attempt = attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(attempt = attempt, error = %e, "Call failed, giving up");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            jitter: Jitter::None,
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<&str, String> = fast(3)
            .run(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 { Err(format!("fail {}", n)) } else { Ok("ok") }
                }
            })
            .await;
        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_after_exhaustion() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), String> = fast(3)
            .run(|| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("fail {}", n))
                }
            })
            .await;
        assert_eq!(result, Err("fail 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_stops_early() {
        let calls = Arc::new(AtomicU32::new(0));
        let result: Result<(), String> = fast(5)
            .run_if(
                || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err("rejected".to_string())
                    }
                },
                |e| e != "rejected",
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let _: Result<(), String> = fast(0)
            .run(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("x".to_string())
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            jitter: Jitter::None,
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
        assert_eq!(policy.backoff(4), Duration::from_millis(1000));
        assert_eq!(policy.backoff(40), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[test]
    fn test_jitter_bounds() {
        let proportional = RetryPolicy {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            jitter: Jitter::Proportional(25),
            ..RetryPolicy::default()
        };
        let full = RetryPolicy {
            jitter: Jitter::Full,
            ..proportional.clone()
        };
        for _ in 0..100 {
            let d = proportional.delay_for(0).as_millis();
            assert!((750..=1250).contains(&d));
            assert!(full.delay_for(0).as_millis() <= 1000);
        }
    }
}
