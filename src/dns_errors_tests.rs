// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `dns_errors.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::records::FrontendScheme;

    #[test]
    fn test_transient_provider_errors() {
        let unavailable: DnsError = ProviderError::Unavailable {
            endpoint: "https://dns.example.test".to_string(),
            status_code: 503,
        }
        .into();
        assert!(unavailable.is_transient());

        let connection: DnsError = ProviderError::ConnectionFailed {
            endpoint: "https://dns.example.test".to_string(),
            reason: "connection refused".to_string(),
        }
        .into();
        assert!(connection.is_transient());

        let rate_limited: DnsError = ProviderError::RateLimited {
            endpoint: "https://dns.example.test".to_string(),
        }
        .into();
        assert!(rate_limited.is_transient());
    }

    #[test]
    fn test_zone_not_found_is_permanent() {
        let err: DnsError = ProviderError::ZoneNotFound {
            zone: "Z123".to_string(),
        }
        .into();
        assert!(!err.is_transient(), "retrying a missing zone cannot help");
        assert_eq!(err.reason(), "ZoneNotFound");
    }

    #[test]
    fn test_unexpected_response_is_permanent() {
        let err: DnsError = ProviderError::UnexpectedResponse {
            endpoint: "https://dns.example.test".to_string(),
            status_code: 400,
            reason: "bad request".to_string(),
        }
        .into();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_resolution_failures_are_permanent() {
        let ambiguous: DnsError = ResolveError::AmbiguousFrontend {
            scheme: FrontendScheme::Internal,
            selector: "frontend=live".to_string(),
            count: 2,
        }
        .into();
        assert!(!ambiguous.is_transient());

        let none: DnsError = ResolveError::NoFrontendFound {
            scheme: FrontendScheme::InternetFacing,
            selector: "names=alb-a".to_string(),
        }
        .into();
        assert!(!none.is_transient());

        let unconfigured: DnsError = ResolveError::SchemeNotConfigured {
            scheme: FrontendScheme::Internal,
        }
        .into();
        assert!(!unconfigured.is_transient());
    }

    #[test]
    fn test_discovery_failure_inherits_source_transience() {
        let transient: DnsError = ResolveError::DiscoveryFailed {
            scheme: FrontendScheme::Internal,
            source: Box::new(ProviderError::Unavailable {
                endpoint: "https://elb.example.test".to_string(),
                status_code: 502,
            }),
        }
        .into();
        assert!(transient.is_transient());

        let permanent: DnsError = ResolveError::DiscoveryFailed {
            scheme: FrontendScheme::Internal,
            source: Box::new(ProviderError::UnexpectedResponse {
                endpoint: "https://elb.example.test".to_string(),
                status_code: 403,
                reason: "forbidden".to_string(),
            }),
        }
        .into();
        assert!(!permanent.is_transient());
    }

    #[test]
    fn test_config_errors_are_permanent() {
        let err: DnsError = ConfigError::ConflictingFrontendSources.into();
        assert!(!err.is_transient());
        assert_eq!(err.reason(), "ConfigurationError");
    }

    #[test]
    fn test_partial_apply_is_permanent() {
        let err: DnsError = ApplyError::Partial {
            zone: "Z123".to_string(),
            succeeded: vec![],
            failed: vec![],
        }
        .into();
        assert!(
            !err.is_transient(),
            "partial applies retry on the next pass, not within the call"
        );
        assert_eq!(err.reason(), "PartialApply");
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = ResolveError::AmbiguousFrontend {
            scheme: FrontendScheme::InternetFacing,
            selector: "frontend=live".to_string(),
            count: 2,
        };
        let message = err.to_string();
        assert!(message.contains("internet-facing"));
        assert!(message.contains('2'));
        assert!(message.contains("frontend=live"));
    }
}
