// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Seam traits and HTTP clients for the GCP control plane.
//!
//! The adapter logic depends only on [`ComputeApi`] and [`ManagedZoneApi`].
//! The shipped implementations speak the Compute aggregated-list and Cloud
//! DNS v1 JSON shapes against overridable endpoints; authentication is
//! ambient (workload identity or an authenticating proxy in front of the
//! endpoint), and an SDK-backed client slots in at the same seam.

use crate::adapters::http::{connection_error, parse_endpoint, response_error};
use crate::dns_errors::DnsError;
use crate::records::{DnsRecord, FrontendScheme, RecordType};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One instance group backing a load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceGroup {
    /// Group name
    pub name: String,
    /// Compute location (e.g. "zones/europe-west1-b")
    pub location: String,
}

/// One forwarding rule: the load balancer's frontend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingRule {
    /// Rule name
    pub name: String,
    /// Frontend IP address traffic should be pointed at
    pub ip_address: String,
    /// Which frontend class the rule serves
    pub scheme: FrontendScheme,
}

/// Compute discovery capability: instance groups and forwarding rules.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// List all instance groups in the project.
    async fn list_instance_groups(&self) -> Result<Vec<InstanceGroup>, DnsError>;

    /// List all forwarding rules in the project.
    async fn list_forwarding_rules(&self) -> Result<Vec<ForwardingRule>, DnsError>;
}

/// Managed-zone record capability, in Cloud DNS change semantics.
#[async_trait]
pub trait ManagedZoneApi: Send + Sync {
    /// List all A/CNAME record sets of a managed zone.
    async fn list_record_sets(&self, zone: &str) -> Result<Vec<DnsRecord>, DnsError>;

    /// Submit one atomic change: `deletions` must exactly match existing
    /// record sets, `additions` are created alongside.
    async fn submit_change(
        &self,
        zone: &str,
        additions: &[DnsRecord],
        deletions: &[DnsRecord],
    ) -> Result<(), DnsError>;
}

/// Append the trailing dot Cloud DNS requires on absolute names.
fn absolute(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AggregatedInstanceGroups {
    #[serde(default)]
    items: HashMap<String, InstanceGroupScope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceGroupScope {
    #[serde(default)]
    instance_groups: Vec<InstanceGroupPayload>,
}

#[derive(Debug, Deserialize)]
struct InstanceGroupPayload {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AggregatedForwardingRules {
    #[serde(default)]
    items: HashMap<String, ForwardingRuleScope>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForwardingRuleScope {
    #[serde(default)]
    forwarding_rules: Vec<ForwardingRulePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForwardingRulePayload {
    name: String,
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
    #[serde(default)]
    load_balancing_scheme: String,
}

impl ForwardingRulePayload {
    /// Map the Compute load-balancing scheme onto a frontend scheme.
    fn frontend_scheme(&self) -> Option<FrontendScheme> {
        match self.load_balancing_scheme.as_str() {
            "INTERNAL" | "INTERNAL_MANAGED" => Some(FrontendScheme::Internal),
            "EXTERNAL" | "EXTERNAL_MANAGED" => Some(FrontendScheme::InternetFacing),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    ttl: u32,
    #[serde(default)]
    rrdatas: Vec<String>,
}

impl ResourceRecordSet {
    fn from_record(record: &DnsRecord) -> Self {
        let rrdata = match record.record_type {
            RecordType::Cname => absolute(&record.value),
            RecordType::A => record.value.clone(),
        };
        Self {
            name: absolute(&record.name),
            record_type: record.record_type.to_string(),
            ttl: record.ttl,
            rrdatas: vec![rrdata],
        }
    }

    fn into_record(self) -> Option<DnsRecord> {
        let record_type = match self.record_type.as_str() {
            "A" => RecordType::A,
            "CNAME" => RecordType::Cname,
            _ => return None,
        };
        let value = self.rrdatas.into_iter().next()?;
        Some(DnsRecord {
            name: self.name,
            record_type,
            value,
            ttl: self.ttl,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListRrsetsResponse {
    #[serde(default)]
    rrsets: Vec<ResourceRecordSet>,
}

#[derive(Debug, Serialize)]
struct ChangeRequest {
    additions: Vec<ResourceRecordSet>,
    deletions: Vec<ResourceRecordSet>,
}

// ============================================================================
// HTTP clients
// ============================================================================

/// HTTP implementation of [`ComputeApi`].
#[derive(Debug, Clone)]
pub struct HttpComputeClient {
    client: HttpClient,
    endpoint: String,
    project: String,
}

impl HttpComputeClient {
    /// Create a client for a project against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is not a valid URL.
    pub fn new(endpoint: &str, project: &str) -> Result<Self, DnsError> {
        Ok(Self {
            client: HttpClient::new(),
            endpoint: parse_endpoint(endpoint)?,
            project: project.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DnsError> {
        debug!(url = %url, "Compute API request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        if !response.status().is_success() {
            return Err(response_error(&self.endpoint, None, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))
    }
}

#[async_trait]
impl ComputeApi for HttpComputeClient {
    async fn list_instance_groups(&self) -> Result<Vec<InstanceGroup>, DnsError> {
        let url = format!(
            "{}/compute/v1/projects/{}/aggregated/instanceGroups",
            self.endpoint, self.project
        );
        let parsed: AggregatedInstanceGroups = self.get_json(&url).await?;

        Ok(parsed
            .items
            .into_iter()
            .flat_map(|(location, scope)| {
                scope.instance_groups.into_iter().map(move |group| {
                    InstanceGroup {
                        name: group.name,
                        location: location.clone(),
                    }
                })
            })
            .collect())
    }

    async fn list_forwarding_rules(&self) -> Result<Vec<ForwardingRule>, DnsError> {
        let url = format!(
            "{}/compute/v1/projects/{}/aggregated/forwardingRules",
            self.endpoint, self.project
        );
        let parsed: AggregatedForwardingRules = self.get_json(&url).await?;

        Ok(parsed
            .items
            .into_values()
            .flat_map(|scope| scope.forwarding_rules)
            .filter_map(|rule| {
                let scheme = rule.frontend_scheme()?;
                Some(ForwardingRule {
                    name: rule.name,
                    ip_address: rule.ip_address,
                    scheme,
                })
            })
            .collect())
    }
}

/// HTTP implementation of [`ManagedZoneApi`].
#[derive(Debug, Clone)]
pub struct HttpManagedZoneClient {
    client: HttpClient,
    endpoint: String,
    project: String,
}

impl HttpManagedZoneClient {
    /// Create a client for a project against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is not a valid URL.
    pub fn new(endpoint: &str, project: &str) -> Result<Self, DnsError> {
        Ok(Self {
            client: HttpClient::new(),
            endpoint: parse_endpoint(endpoint)?,
            project: project.to_string(),
        })
    }

    fn zone_url(&self, zone: &str) -> String {
        format!(
            "{}/dns/v1/projects/{}/managedZones/{zone}",
            self.endpoint, self.project
        )
    }
}

#[async_trait]
impl ManagedZoneApi for HttpManagedZoneClient {
    async fn list_record_sets(&self, zone: &str) -> Result<Vec<DnsRecord>, DnsError> {
        let url = format!("{}/rrsets", self.zone_url(zone));
        debug!(url = %url, "Listing record sets");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        if !response.status().is_success() {
            return Err(response_error(&self.endpoint, Some(zone), response).await);
        }

        let parsed: ListRrsetsResponse = response
            .json()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        Ok(parsed
            .rrsets
            .into_iter()
            .filter_map(ResourceRecordSet::into_record)
            .collect())
    }

    async fn submit_change(
        &self,
        zone: &str,
        additions: &[DnsRecord],
        deletions: &[DnsRecord],
    ) -> Result<(), DnsError> {
        let url = format!("{}/changes", self.zone_url(zone));
        let request = ChangeRequest {
            additions: additions.iter().map(ResourceRecordSet::from_record).collect(),
            deletions: deletions.iter().map(ResourceRecordSet::from_record).collect(),
        };
        debug!(
            url = %url,
            additions = additions.len(),
            deletions = deletions.len(),
            "Submitting record change"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        if !response.status().is_success() {
            return Err(response_error(&self.endpoint, Some(zone), response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
