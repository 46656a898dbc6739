//! Backoff configuration for the bounded versioned-replace loop.
//!
//! The replace protocol is optimistic concurrency: a version conflict means
//! another writer won the race, so the loop re-reads and re-applies. An
//! unbounded loop risks livelock under pathological contention, so attempts
//! are capped while ordinary short conflict runs stay cheap.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the versioned-replace retry loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRetryConfig {
    /// Maximum replace attempts before giving up (default: 16).
    pub max_attempts: u32,
    /// Backoff before the second attempt (default: 5ms).
    pub initial_backoff: Duration,
    /// Cap on any single backoff (default: 250ms).
    pub max_backoff: Duration,
    /// Multiplier for exponential backoff (default: 2.0).
    pub backoff_multiplier: f64,
    /// Whether to add random jitter to each backoff (default: true).
    pub jitter: bool,
}

impl Default for ReplaceRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 16,
            initial_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl ReplaceRetryConfig {
    /// Compute the backoff to sleep after the given zero-based failed attempt.
    ///
    /// Computes `initial_backoff * backoff_multiplier^attempt`, capped at
    /// `max_backoff`, with up to 50% jitter added when enabled.
    pub(crate) fn compute_backoff(&self, attempt: u32) -> Duration {
        let base_delay_ms = self.initial_backoff.as_millis() as f64;
        let max_delay_ms = self.max_backoff.as_millis() as f64;

        let computed = base_delay_ms * self.backoff_multiplier.powi(attempt as i32);
        let capped = computed.min(max_delay_ms);

        if self.jitter {
            let jitter_ms = simple_jitter(capped as u64 / 2);
            Duration::from_millis((capped as u64).saturating_add(jitter_ms))
        } else {
            Duration::from_millis(capped as u64)
        }
    }
}

/// Generate simple jitter using system time entropy.
fn simple_jitter(max_ms: u64) -> u64 {
    if max_ms == 0 {
        return 0;
    }
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % max_ms
}
