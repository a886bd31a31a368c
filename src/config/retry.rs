//! Retry policy for flaky per-URL operations.
//!
//! Only the browser check retries today: headless page loads time out far more
//! often than plain HTTP requests. Whether a failure is worth retrying is
//! decided by [`CheckException::is_retryable`].
//!
//! ```toml
//! [browser_retry]
//! max_retries = 3
//! base_delay_ms = 500
//! strategy = "exponential"
//! timeout_seconds = 120
//! ```

use crate::errors::CheckException;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Give up once this much time has passed since the first attempt
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            strategy: RetryStrategy::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// No waiting between attempts. Used by tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay_ms: 0,
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Delay before retry number `attempt` (1-indexed), capped at the overall timeout.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms;
        let delay_ms = match self.strategy {
            RetryStrategy::Constant => base,
            RetryStrategy::Linear => base.saturating_mul(u64::from(attempt)),
            RetryStrategy::Exponential => {
                base.saturating_mul(1u64 << attempt.saturating_sub(1).min(16))
            }
        };
        Duration::from_millis(delay_ms).min(self.timeout())
    }

    /// `retries_done` counts retries already made, not the first attempt.
    pub fn should_retry(&self, retries_done: u32, elapsed: Duration) -> bool {
        self.enabled && retries_done < self.max_retries && elapsed < self.timeout()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    Constant,
    Linear,
    #[default]
    Exponential,
}

fn default_enabled() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_timeout_seconds() -> u64 {
    120
}

/// Run `op` until it succeeds, fails with a non-retryable exception, or the
/// policy gives up. Returns the last outcome.
pub fn retry_with<T>(
    config: &RetryConfig,
    mut op: impl FnMut(u32) -> Result<T, CheckException>,
) -> Result<T, CheckException> {
    let started = Instant::now();
    let mut retries = 0;
    loop {
        match op(retries) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && config.should_retry(retries, started.elapsed()) => {
                retries += 1;
                log::debug!("Attempt {} failed ({}), retrying", retries, e);
                std::thread::sleep(config.delay_for_attempt(retries));
            }
            Err(e) => return Err(e),
        }
    }
}
