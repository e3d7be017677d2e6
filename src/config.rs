// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration for the synchronizer process.
//!
//! Settings are parsed once at startup, validated before any reconciliation
//! starts, and treated as immutable for the process lifetime. Validation
//! failures are [`ConfigError`]s and stop the process.

use crate::constants::{
    DEFAULT_API_RETRIES, DEFAULT_AWS_REGION, DEFAULT_HEALTH_PORT, DEFAULT_RECORD_TTL_SECS,
    DEFAULT_RESYNC_INTERVAL_SECS,
};
use crate::dns_errors::ConfigError;
use crate::records::FrontendScheme;
use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Which DNS/load-balancer provider backs the synchronizer.
///
/// Exactly one provider is active per process, selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DnsProvider {
    /// Route53 hosted zone with ELB/ALB frontend discovery
    Aws,
    /// Cloud DNS managed zone with instance-group frontend discovery
    Gcp,
    /// Fixed per-scheme hostnames, no remote DNS API
    Static,
}

impl fmt::Display for DnsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProvider::Aws => f.write_str("aws"),
            DnsProvider::Gcp => f.write_str("gcp"),
            DnsProvider::Static => f.write_str("static"),
        }
    }
}

/// Command-line settings for the synchronizer.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zonelink",
    version,
    about = "Keeps DNS records pointed at the load balancers fronting a Kubernetes ingress layer"
)]
pub struct Settings {
    /// DNS provider to use
    #[arg(long, value_enum)]
    pub dns_provider: DnsProvider,

    /// Hosted zone id (aws) or managed zone name (gcp) to manage
    #[arg(long)]
    pub hosted_zone: Option<String>,

    /// Comma delimited list of ALB names; include at most one per scheme
    #[arg(long, value_delimiter = ',')]
    pub alb_names: Vec<String>,

    /// Discover load balancers tagged with this frontend tag value
    #[arg(long)]
    pub frontend_tag_value: Option<String>,

    /// AWS region for load-balancer discovery
    #[arg(long, default_value = DEFAULT_AWS_REGION)]
    pub aws_region: String,

    /// GCP project containing the managed zone and instance groups
    #[arg(long)]
    pub gcp_project: Option<String>,

    /// Name prefix used to discover the backing instance groups (gcp)
    #[arg(long)]
    pub instance_group_prefix: Option<String>,

    /// Hostname of the internal load balancer (static provider)
    #[arg(long)]
    pub internal_hostname: Option<String>,

    /// Hostname of the internet-facing load balancer (static provider)
    #[arg(long)]
    pub external_hostname: Option<String>,

    /// Time-to-live in seconds for managed records
    #[arg(long, default_value_t = DEFAULT_RECORD_TTL_SECS)]
    pub record_ttl: u32,

    /// Number of attempts for each provider API call
    #[arg(long, default_value_t = DEFAULT_API_RETRIES)]
    pub api_retries: u32,

    /// Seconds between full resyncs with the ingress layer
    #[arg(long, default_value_t = DEFAULT_RESYNC_INTERVAL_SECS)]
    pub resync_interval: u64,

    /// Port for the health and metrics endpoints
    #[arg(long, default_value_t = DEFAULT_HEALTH_PORT)]
    pub health_port: u16,

    /// Override the load-balancer API endpoint (local stacks, testing)
    #[arg(long, hide = true)]
    pub lb_api_endpoint: Option<String>,

    /// Override the DNS API endpoint (local stacks, testing)
    #[arg(long, hide = true)]
    pub dns_api_endpoint: Option<String>,
}

impl Settings {
    /// Validate provider-specific settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] on a missing hosted zone, a missing or
    /// contradictory frontend source, or a missing discovery setting. These
    /// are fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_static_hostnames =
            self.internal_hostname.is_some() || self.external_hostname.is_some();
        let has_discovery = !self.alb_names.is_empty() || self.frontend_tag_value.is_some();

        match self.dns_provider {
            DnsProvider::Aws => {
                if self.hosted_zone.is_none() {
                    return Err(ConfigError::MissingHostedZone {
                        provider: self.dns_provider.to_string(),
                    });
                }
                if has_static_hostnames {
                    return Err(ConfigError::ConflictingFrontendSources);
                }
                if !has_discovery {
                    return Err(ConfigError::MissingFrontendSource {
                        provider: self.dns_provider.to_string(),
                    });
                }
            }
            DnsProvider::Gcp => {
                if self.hosted_zone.is_none() {
                    return Err(ConfigError::MissingHostedZone {
                        provider: self.dns_provider.to_string(),
                    });
                }
                if has_static_hostnames {
                    return Err(ConfigError::ConflictingFrontendSources);
                }
                if self.gcp_project.is_none() {
                    return Err(ConfigError::MissingSetting {
                        provider: self.dns_provider.to_string(),
                        setting: "--gcp-project",
                    });
                }
                if self.instance_group_prefix.is_none() {
                    return Err(ConfigError::MissingSetting {
                        provider: self.dns_provider.to_string(),
                        setting: "--instance-group-prefix",
                    });
                }
            }
            DnsProvider::Static => {
                if has_discovery {
                    return Err(ConfigError::ConflictingFrontendSources);
                }
                if !has_static_hostnames {
                    return Err(ConfigError::MissingFrontendSource {
                        provider: self.dns_provider.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The per-scheme static hostname map (static provider).
    #[must_use]
    pub fn static_hostnames(&self) -> HashMap<FrontendScheme, String> {
        let mut hostnames = HashMap::new();
        if let Some(internal) = &self.internal_hostname {
            hostnames.insert(FrontendScheme::Internal, internal.clone());
        }
        if let Some(external) = &self.external_hostname {
            hostnames.insert(FrontendScheme::InternetFacing, external.clone());
        }
        hostnames
    }

    /// The record TTL as a [`Duration`].
    #[must_use]
    pub fn record_ttl_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.record_ttl))
    }

    /// The resync interval as a [`Duration`].
    #[must_use]
    pub fn resync_interval_duration(&self) -> Duration {
        Duration::from_secs(self.resync_interval)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
