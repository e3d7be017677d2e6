// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider adapters: the seam between the reconciliation engine and a
//! concrete DNS/load-balancer backend.
//!
//! Each adapter owns one hosted zone and implements three capabilities:
//! resolving a frontend scheme to a concrete endpoint, listing the zone's
//! current records, and applying a change set. Exactly one adapter is
//! active per process, selected once at startup from configuration.

pub mod aws;
pub mod gcp;
pub(crate) mod http;
pub mod static_hostname;

use crate::config::{DnsProvider, Settings};
use crate::dns_errors::DnsError;
use crate::records::{ApplyReport, ChangeSet, DnsRecord, FrontendScheme, ResolvedTarget};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Capability interface every provider variant implements.
///
/// `apply` is per-record under the hood for the cloud variants: provider
/// record APIs are not transactional across names, so a change set can
/// partially succeed, and the report carries both sides.
#[async_trait]
pub trait FrontendAdapter: Send + Sync {
    /// Short provider name for logging and metrics.
    fn provider_name(&self) -> &'static str;

    /// Resolve a frontend scheme to its concrete endpoint for this pass.
    ///
    /// # Errors
    ///
    /// Fails with a [`crate::dns_errors::ResolveError`] when the scheme has
    /// no configured or discoverable frontend, or when discovery is
    /// ambiguous (zero or multiple matches are rejected, not guessed).
    async fn resolve(&self, scheme: FrontendScheme) -> Result<ResolvedTarget, DnsError>;

    /// List the current records of the managed zone.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::dns_errors::ProviderError::ZoneNotFound`] when
    /// the configured zone does not exist (fatal, not retried) or a
    /// transient provider error (retried by the caller).
    async fn current_records(&self) -> Result<Vec<DnsRecord>, DnsError>;

    /// Apply a change set: creates, then updates, then deletes.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::dns_errors::ApplyError::Partial`] when some
    /// record operations succeed and some fail, or a transient provider
    /// error when the zone cannot be reached at all.
    async fn apply(&self, changes: &ChangeSet) -> Result<ApplyReport, DnsError>;
}

/// Build the active adapter from validated settings.
///
/// # Errors
///
/// Returns a [`crate::dns_errors::ConfigError`] when the settings do not
/// satisfy the selected provider (also caught earlier by
/// [`Settings::validate`]).
pub fn build_adapter(settings: &Settings) -> Result<Arc<dyn FrontendAdapter>, DnsError> {
    settings.validate()?;

    let adapter: Arc<dyn FrontendAdapter> = match settings.dns_provider {
        DnsProvider::Static => Arc::new(static_hostname::StaticHostnameAdapter::new(
            settings.static_hostnames(),
            settings.record_ttl_duration(),
        )),
        DnsProvider::Aws => Arc::new(aws::AwsAdapter::from_settings(settings)?),
        DnsProvider::Gcp => Arc::new(gcp::GcpAdapter::from_settings(settings)?),
    };

    info!(
        provider = adapter.provider_name(),
        zone = settings.hosted_zone.as_deref().unwrap_or("<static>"),
        "DNS provider adapter ready"
    );

    Ok(adapter)
}

/// Apply a change set one record at a time, collecting per-record outcomes.
///
/// Shared by the cloud adapters: creates run before deletes so a hostname
/// never resolves to nothing mid-apply, and a single rejected record does
/// not stop the remaining independent records.
pub(crate) async fn apply_per_record<F, Fut>(
    zone: &str,
    changes: &ChangeSet,
    mut submit: F,
) -> Result<ApplyReport, DnsError>
where
    F: FnMut(crate::records::RecordChange) -> Fut,
    Fut: std::future::Future<Output = Result<(), DnsError>>,
{
    let mut report = ApplyReport::default();

    for change in changes.ordered_changes() {
        match submit(change.clone()).await {
            Ok(()) => report.succeeded.push(change),
            Err(e) => report.failed.push(crate::records::FailedChange {
                change,
                reason: e.to_string(),
            }),
        }
    }

    if report.failed.is_empty() {
        Ok(report)
    } else {
        Err(crate::dns_errors::ApplyError::Partial {
            zone: zone.to_string(),
            succeeded: report.succeeded,
            failed: report.failed,
        }
        .into())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod mod_tests;
