// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retry logic with exponential backoff for provider API calls.
//!
//! Transient provider errors (unavailability, connection failures, rate
//! limiting) are retried up to an operator-configured attempt count with
//! exponential backoff and jitter. Permanent errors (configuration,
//! zone-not-found, unresolved schemes) fail fast and propagate immediately.

use crate::dns_errors::DnsError;
use rand::RngExt;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Initial retry interval (100ms)
const INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between retries (30 seconds)
const MAX_INTERVAL_SECS: u64 = 30;

/// Backoff multiplier (exponential growth factor)
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
const RANDOMIZATION_FACTOR: f64 = 0.1;

/// Maximum total time to spend retrying one call (5 minutes)
const MAX_ELAPSED_TIME_SECS: u64 = 300;

/// Exponential backoff with jitter.
///
/// Grows the interval by [`BACKOFF_MULTIPLIER`] per attempt, capped at
/// [`MAX_INTERVAL_SECS`], with ±[`RANDOMIZATION_FACTOR`] jitter applied to
/// each returned interval.
#[derive(Debug)]
pub struct ExponentialBackoff {
    /// Interval returned by the next call to [`Self::next_interval`]
    current_interval: Duration,
    /// Upper bound on the un-jittered interval
    max_interval: Duration,
    /// Total time budget; `next_interval` returns None once exceeded
    max_elapsed_time: Duration,
    /// When this backoff started
    start_time: Instant,
}

impl ExponentialBackoff {
    /// Get the next sleep interval, or None if the elapsed-time budget is
    /// spent.
    pub fn next_interval(&mut self) -> Option<Duration> {
        if self.start_time.elapsed() >= self.max_elapsed_time {
            return None;
        }

        let interval = self.current_interval;
        let next = interval.as_secs_f64() * BACKOFF_MULTIPLIER;
        self.current_interval = Duration::from_secs_f64(next).min(self.max_interval);

        Some(apply_jitter(interval))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            current_interval: Duration::from_millis(INITIAL_INTERVAL_MILLIS),
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
            max_elapsed_time: Duration::from_secs(MAX_ELAPSED_TIME_SECS),
            start_time: Instant::now(),
        }
    }
}

/// Apply ±[`RANDOMIZATION_FACTOR`] jitter to an interval.
fn apply_jitter(interval: Duration) -> Duration {
    let secs = interval.as_secs_f64();
    let delta = secs * RANDOMIZATION_FACTOR;
    let jittered = rand::rng().random_range((secs - delta)..=(secs + delta));
    Duration::from_secs_f64(jittered.max(0.0))
}

/// Retry a provider call up to `max_attempts` times on transient errors.
///
/// Each attempt is the whole call: for record applies that means the full
/// change set is resubmitted, not individual records. Non-transient errors
/// propagate immediately without consuming further attempts.
///
/// # Arguments
///
/// * `max_attempts` - Total attempt budget (operator-configured, at least 1)
/// * `operation_name` - Human-readable name for logging (e.g. "list records")
/// * `operation` - Async closure performing the call
///
/// # Errors
///
/// Returns the last error once the attempt budget or the elapsed-time budget
/// is exhausted, or the first non-transient error encountered.
pub async fn with_retries<T, F, Fut>(
    max_attempts: u32,
    operation_name: &str,
    mut operation: F,
) -> Result<T, DnsError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, DnsError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut backoff = ExponentialBackoff::default();
    let start_time = Instant::now();

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        "Provider call succeeded after retries"
                    );
                }
                return Ok(value);
            }
            Err(e) if !e.is_transient() => {
                error!(
                    operation = operation_name,
                    error = %e,
                    "Non-retryable provider error, failing immediately"
                );
                return Err(e);
            }
            Err(e) if attempt == max_attempts => {
                error!(
                    operation = operation_name,
                    attempts = max_attempts,
                    elapsed = ?start_time.elapsed(),
                    error = %e,
                    "Retry attempts exhausted, giving up"
                );
                return Err(e);
            }
            Err(e) => match backoff.next_interval() {
                Some(duration) => {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        retry_after = ?duration,
                        error = %e,
                        "Transient provider error, will retry"
                    );
                    tokio::time::sleep(duration).await;
                }
                None => {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Retry time budget exceeded, giving up"
                    );
                    return Err(e);
                }
            },
        }
    }

    unreachable!("retry loop returns on the final attempt")
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
