// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! AWS-style adapter: Route53 hosted zone records with ELB/ALB frontend
//! discovery.
//!
//! Frontends are found either by an explicit list of ALB names (at most one
//! balancer per scheme) or by listing balancers carrying the frontend
//! discovery tag. The balancer's own scheme attribute classifies it as
//! internal or internet-facing; a scheme matching zero or several balancers
//! is rejected as unresolved rather than guessed.

pub mod api;

use crate::adapters::{apply_per_record, FrontendAdapter};
use crate::config::Settings;
use crate::constants::FRONTEND_TAG_KEY;
use crate::dns_errors::{DnsError, ResolveError};
use crate::records::{
    ApplyReport, ChangeSet, DnsRecord, FrontendScheme, ResolvedTarget,
};
use api::{
    HttpLoadBalancerClient, HttpRecordSetClient, LoadBalancerApi, LoadBalancerDescription,
    RecordSetApi,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Adapter over a Route53-style hosted zone and ELB/ALB discovery.
pub struct AwsAdapter {
    /// Hosted zone id this adapter manages
    zone: String,
    /// TTL applied to resolved targets
    ttl: Duration,
    /// Explicit balancer names (preferred over tag discovery when set)
    alb_names: Vec<String>,
    /// Frontend tag value for tag-based discovery
    frontend_tag_value: Option<String>,
    /// Load-balancer discovery seam
    lb_api: Arc<dyn LoadBalancerApi>,
    /// Hosted-zone record seam
    records_api: Arc<dyn RecordSetApi>,
}

impl AwsAdapter {
    /// Create an adapter with explicit API implementations.
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        ttl: Duration,
        alb_names: Vec<String>,
        frontend_tag_value: Option<String>,
        lb_api: Arc<dyn LoadBalancerApi>,
        records_api: Arc<dyn RecordSetApi>,
    ) -> Self {
        Self {
            zone: zone.into(),
            ttl,
            alb_names,
            frontend_tag_value,
            lb_api,
            records_api,
        }
    }

    /// Create an adapter with HTTP clients built from validated settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when an endpoint override is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self, DnsError> {
        let lb_endpoint = settings.lb_api_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://elasticloadbalancing.{}.amazonaws.com",
                settings.aws_region
            )
        });
        let dns_endpoint = settings
            .dns_api_endpoint
            .clone()
            .unwrap_or_else(|| "https://route53.amazonaws.com".to_string());

        Ok(Self::new(
            settings.hosted_zone.clone().unwrap_or_default(),
            settings.record_ttl_duration(),
            settings.alb_names.clone(),
            settings.frontend_tag_value.clone(),
            Arc::new(HttpLoadBalancerClient::new(&lb_endpoint)?),
            Arc::new(HttpRecordSetClient::new(&dns_endpoint)?),
        ))
    }

    /// Discover the balancers eligible for scheme classification, with the
    /// selector string used in error reporting.
    async fn discover_candidates(
        &self,
        scheme: FrontendScheme,
    ) -> Result<(Vec<LoadBalancerDescription>, String), DnsError> {
        let wrap = |e: DnsError| match e {
            DnsError::Provider(source) => DnsError::Resolve(ResolveError::DiscoveryFailed {
                scheme,
                source: Box::new(source),
            }),
            other => other,
        };

        if !self.alb_names.is_empty() {
            let selector = format!("names={}", self.alb_names.join(","));
            let balancers = self
                .lb_api
                .describe_load_balancers(Some(&self.alb_names))
                .await
                .map_err(wrap)?;
            return Ok((balancers, selector));
        }

        let tag_value = self.frontend_tag_value.as_deref().unwrap_or_default();
        let selector = format!("{FRONTEND_TAG_KEY}={tag_value}");
        let balancers = self
            .lb_api
            .describe_load_balancers(None)
            .await
            .map_err(wrap)?
            .into_iter()
            .filter(|lb| lb.frontend_tag.as_deref() == Some(tag_value))
            .collect();
        Ok((balancers, selector))
    }
}

#[async_trait]
impl FrontendAdapter for AwsAdapter {
    fn provider_name(&self) -> &'static str {
        "aws"
    }

    async fn resolve(&self, scheme: FrontendScheme) -> Result<ResolvedTarget, DnsError> {
        let (candidates, selector) = self.discover_candidates(scheme).await?;

        let mut matches: Vec<LoadBalancerDescription> = candidates
            .into_iter()
            .filter(|lb| lb.scheme == scheme)
            .collect();

        match matches.len() {
            0 => Err(ResolveError::NoFrontendFound { scheme, selector }.into()),
            1 => {
                let balancer = matches.remove(0);
                debug!(
                    scheme = %scheme,
                    balancer = %balancer.name,
                    target = %balancer.dns_name,
                    "Resolved frontend"
                );
                Ok(ResolvedTarget::new(scheme, balancer.dns_name, self.ttl))
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
        self.records_api.list_record_sets(&self.zone).await
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<ApplyReport, DnsError> {
        apply_per_record(&self.zone, changes, |change| {
            let records_api = Arc::clone(&self.records_api);
            let zone = self.zone.clone();
            async move { records_api.change_record_set(&zone, &change).await }
        })
        .await
    }
}
