// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use super::super::{with_retries, ExponentialBackoff};
    use crate::dns_errors::{DnsError, ProviderError, ResolveError};
    use crate::records::FrontendScheme;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn transient() -> DnsError {
        ProviderError::Unavailable {
            endpoint: "https://dns.example.test".to_string(),
            status_code: 503,
        }
        .into()
    }

    fn permanent() -> DnsError {
        ResolveError::SchemeNotConfigured {
            scheme: FrontendScheme::Internal,
        }
        .into()
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = with_retries(5, "test op", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DnsError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = with_retries(5, "test op", move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(transient())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3, "two failures, one success");
    }

    #[tokio::test]
    async fn test_permanent_errors_fail_fast() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), DnsError> = with_retries(5, "test op", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(permanent())
            }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            DnsError::Resolve(ResolveError::SchemeNotConfigured { .. })
        ));
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "permanent errors must not consume retry attempts"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_budget_is_bounded() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), DnsError> = with_retries(3, "test op", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            }
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            DnsError::Provider(ProviderError::Unavailable { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = with_retries(0, "test op", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DnsError>(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// Intervals grow exponentially and stay within the jitter window.
    #[test]
    fn test_backoff_growth() {
        let mut backoff = ExponentialBackoff::default();

        let first = backoff.next_interval().unwrap();
        assert!(
            first >= Duration::from_millis(90) && first <= Duration::from_millis(110),
            "first interval should be ~100ms, got {first:?}"
        );

        let second = backoff.next_interval().unwrap();
        assert!(
            second >= Duration::from_millis(180) && second <= Duration::from_millis(220),
            "second interval should be ~200ms, got {second:?}"
        );
    }

    /// The un-jittered interval caps at the configured maximum.
    #[test]
    fn test_backoff_interval_is_capped() {
        let mut backoff = ExponentialBackoff::default();

        let mut last = Duration::ZERO;
        for _ in 0..20 {
            last = backoff.next_interval().unwrap();
        }

        // 30s cap plus 10% jitter headroom
        assert!(
            last <= Duration::from_secs(33),
            "interval should cap at ~30s, got {last:?}"
        );
    }
}
