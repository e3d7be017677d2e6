// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the adapter factory and shared apply plumbing.

#[cfg(test)]
mod tests {
    use super::super::{apply_per_record, build_adapter};
    use crate::config::Settings;
    use crate::dns_errors::{ConfigError, DnsError, ProviderError};
    use crate::records::{ChangeSet, DnsRecord};
    use clap::Parser;

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["zonelink"];
        argv.extend_from_slice(args);
        Settings::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_factory_builds_each_provider() {
        let static_settings = parse(&[
            "--dns-provider",
            "static",
            "--internal-hostname",
            "lb-internal.example.com",
        ]);
        assert_eq!(
            build_adapter(&static_settings).unwrap().provider_name(),
            "static"
        );

        let aws_settings = parse(&[
            "--dns-provider",
            "aws",
            "--hosted-zone",
            "Z123",
            "--frontend-tag-value",
            "live",
        ]);
        assert_eq!(build_adapter(&aws_settings).unwrap().provider_name(), "aws");

        let gcp_settings = parse(&[
            "--dns-provider",
            "gcp",
            "--hosted-zone",
            "example-zone",
            "--gcp-project",
            "my-project",
            "--instance-group-prefix",
            "k8s-ingress",
        ]);
        assert_eq!(build_adapter(&gcp_settings).unwrap().provider_name(), "gcp");
    }

    #[test]
    fn test_factory_rejects_invalid_settings() {
        let settings = parse(&["--dns-provider", "aws", "--frontend-tag-value", "live"]);
        assert!(matches!(
            build_adapter(&settings),
            Err(DnsError::Config(ConfigError::MissingHostedZone { .. }))
        ));
    }

    #[test]
    fn test_factory_rejects_bad_endpoint_override() {
        let settings = parse(&[
            "--dns-provider",
            "aws",
            "--hosted-zone",
            "Z123",
            "--frontend-tag-value",
            "live",
            "--dns-api-endpoint",
            "not a url",
        ]);
        assert!(matches!(
            build_adapter(&settings),
            Err(DnsError::Config(ConfigError::InvalidEndpoint { .. }))
        ));
    }

    #[tokio::test]
    async fn test_apply_per_record_full_success() {
        let changes = ChangeSet {
            creates: vec![DnsRecord::cname("a.example.com", "lb.example.com", 300)],
            updates: vec![],
            deletes: vec![DnsRecord::cname("b.example.com", "lb.example.com", 300)],
        };

        let report = apply_per_record("Z123", &changes, |_change| async { Ok(()) })
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_apply_per_record_reports_partial_failure() {
        let changes = ChangeSet {
            creates: vec![
                DnsRecord::cname("ok.example.com", "lb.example.com", 300),
                DnsRecord::cname("bad.example.com", "lb.example.com", 300),
            ],
            updates: vec![],
            deletes: vec![],
        };

        let result = apply_per_record("Z123", &changes, |change| async move {
            if change.record.name == "bad.example.com" {
                Err(ProviderError::UnexpectedResponse {
                    endpoint: "https://dns.example.test".to_string(),
                    status_code: 400,
                    reason: "invalid record".to_string(),
                }
                .into())
            } else {
                Ok(())
            }
        })
        .await;

        match result.unwrap_err() {
            DnsError::Apply(crate::dns_errors::ApplyError::Partial {
                zone,
                succeeded,
                failed,
            }) => {
                assert_eq!(zone, "Z123");
                assert_eq!(succeeded.len(), 1);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].change.record.name, "bad.example.com");
            }
            other => panic!("expected partial apply error, got {other:?}"),
        }
    }

    /// A failure mid-sequence does not stop later independent records.
    #[tokio::test]
    async fn test_apply_per_record_continues_after_failure() {
        let changes = ChangeSet {
            creates: vec![
                DnsRecord::cname("bad.example.com", "lb.example.com", 300),
                DnsRecord::cname("later.example.com", "lb.example.com", 300),
            ],
            updates: vec![],
            deletes: vec![],
        };

        let result = apply_per_record("Z123", &changes, |change| async move {
            if change.record.name == "bad.example.com" {
                Err(ProviderError::RateLimited {
                    endpoint: "https://dns.example.test".to_string(),
                }
                .into())
            } else {
                Ok(())
            }
        })
        .await;

        match result.unwrap_err() {
            DnsError::Apply(crate::dns_errors::ApplyError::Partial { succeeded, .. }) => {
                assert_eq!(succeeded.len(), 1);
                assert_eq!(succeeded[0].record.name, "later.example.com");
            }
            other => panic!("expected partial apply error, got {other:?}"),
        }
    }
}
