// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! GCP-style adapter: Cloud DNS managed zone records with instance-group
//! frontend discovery.
//!
//! Frontends are the forwarding endpoints of load balancers whose backing
//! instance groups match a configured name prefix. The forwarding rule's
//! load-balancing scheme classifies it as internal or external; a scheme
//! matching zero or several rules is rejected as unresolved. Targets are IP
//! addresses, so managed records are A records.

pub mod api;

use crate::adapters::{apply_per_record, FrontendAdapter};
use crate::config::Settings;
use crate::dns_errors::{DnsError, ResolveError};
use crate::records::{
    ApplyReport, ChangeAction, ChangeSet, DnsRecord, FrontendScheme, ResolvedTarget,
};
use api::{ComputeApi, ForwardingRule, HttpComputeClient, HttpManagedZoneClient, ManagedZoneApi};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Adapter over a Cloud DNS managed zone and instance-group discovery.
pub struct GcpAdapter {
    /// Managed zone name this adapter manages
    zone: String,
    /// TTL applied to resolved targets
    ttl: Duration,
    /// Name prefix identifying this cluster's instance groups and rules
    instance_group_prefix: String,
    /// Compute discovery seam
    compute_api: Arc<dyn ComputeApi>,
    /// Managed-zone record seam
    zone_api: Arc<dyn ManagedZoneApi>,
}

impl GcpAdapter {
    /// Create an adapter with explicit API implementations.
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        ttl: Duration,
        instance_group_prefix: impl Into<String>,
        compute_api: Arc<dyn ComputeApi>,
        zone_api: Arc<dyn ManagedZoneApi>,
    ) -> Self {
        Self {
            zone: zone.into(),
            ttl,
            instance_group_prefix: instance_group_prefix.into(),
            compute_api,
            zone_api,
        }
    }

    /// Create an adapter with HTTP clients built from validated settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when an endpoint override is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self, DnsError> {
        let compute_endpoint = settings
            .lb_api_endpoint
            .clone()
            .unwrap_or_else(|| "https://compute.googleapis.com".to_string());
        let dns_endpoint = settings
            .dns_api_endpoint
            .clone()
            .unwrap_or_else(|| "https://dns.googleapis.com".to_string());
        let project = settings.gcp_project.clone().unwrap_or_default();

        Ok(Self::new(
            settings.hosted_zone.clone().unwrap_or_default(),
            settings.record_ttl_duration(),
            settings.instance_group_prefix.clone().unwrap_or_default(),
            Arc::new(HttpComputeClient::new(&compute_endpoint, &project)?),
            Arc::new(HttpManagedZoneClient::new(&dns_endpoint, &project)?),
        ))
    }

    fn wrap_discovery(scheme: FrontendScheme) -> impl Fn(DnsError) -> DnsError {
        move |e| match e {
            DnsError::Provider(source) => DnsError::Resolve(ResolveError::DiscoveryFailed {
                scheme,
                source: Box::new(source),
            }),
            other => other,
        }
    }
}

#[async_trait]
impl FrontendAdapter for GcpAdapter {
    fn provider_name(&self) -> &'static str {
        "gcp"
    }

    async fn resolve(&self, scheme: FrontendScheme) -> Result<ResolvedTarget, DnsError> {
        let selector = format!("instance-group-prefix={}", self.instance_group_prefix);

        let groups = self
            .compute_api
            .list_instance_groups()
            .await
            .map_err(Self::wrap_discovery(scheme))?;
        let backing: Vec<_> = groups
            .into_iter()
            .filter(|group| group.name.starts_with(&self.instance_group_prefix))
            .collect();
        if backing.is_empty() {
            return Err(ResolveError::NoFrontendFound { scheme, selector }.into());
        }
        debug!(
            scheme = %scheme,
            groups = backing.len(),
            "Found backing instance groups"
        );

        let rules = self
            .compute_api
            .list_forwarding_rules()
            .await
            .map_err(Self::wrap_discovery(scheme))?;
        let mut matches: Vec<ForwardingRule> = rules
            .into_iter()
            .filter(|rule| {
                rule.name.starts_with(&self.instance_group_prefix) && rule.scheme == scheme
            })
            .collect();

        match matches.len() {
            0 => Err(ResolveError::NoFrontendFound { scheme, selector }.into()),
            1 => {
                let rule = matches.remove(0);
                debug!(
                    scheme = %scheme,
                    rule = %rule.name,
                    target = %rule.ip_address,
                    "Resolved frontend"
                );
                Ok(ResolvedTarget::new(scheme, rule.ip_address, self.ttl))
            }
            count => Err(ResolveError::AmbiguousFrontend {
                scheme,
                selector,
                count,
            }
            .into()),
        }
    }

    async fn current_records(&self) -> Result<Vec<DnsRecord>, DnsError> {
        self.zone_api.list_record_sets(&self.zone).await
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<ApplyReport, DnsError> {
        // Cloud DNS deletions must match existing record sets exactly, so
        // updates need the record currently in the zone, not just the
        // desired one.
        let existing: HashMap<String, DnsRecord> = if changes.updates.is_empty() {
            HashMap::new()
        } else {
            self.zone_api
                .list_record_sets(&self.zone)
                .await?
                .into_iter()
                .map(|record| (record.normalized_name(), record))
                .collect()
        };

        apply_per_record(&self.zone, changes, |change| {
            let zone_api = Arc::clone(&self.zone_api);
            let zone = self.zone.clone();
            let old = existing.get(&change.record.normalized_name()).cloned();
            async move {
                match change.action {
                    ChangeAction::Create => {
                        zone_api
                            .submit_change(&zone, &[change.record.clone()], &[])
                            .await
                    }
                    ChangeAction::Update => {
                        let deletions: Vec<DnsRecord> = old.into_iter().collect();
                        zone_api
                            .submit_change(&zone, &[change.record.clone()], &deletions)
                            .await
                    }
                    ChangeAction::Delete => {
                        zone_api
                            .submit_change(&zone, &[], &[change.record.clone()])
                            .await
                    }
                }
            }
        })
        .await
    }
}
