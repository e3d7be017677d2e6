// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Seam traits and HTTP clients for the AWS control plane.
//!
//! The adapter logic depends only on [`LoadBalancerApi`] and
//! [`RecordSetApi`]; the shipped implementations are thin JSON clients with
//! overridable endpoints. Requests are unauthenticated at this layer:
//! deployments front the provider API with an authenticating proxy, and an
//! SDK-backed client slots in at the same seam.

use crate::adapters::http::{connection_error, parse_endpoint, response_error};
use crate::constants::FRONTEND_TAG_KEY;
use crate::dns_errors::DnsError;
use crate::records::{ChangeAction, DnsRecord, FrontendScheme, RecordChange, RecordType};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One load balancer as seen by frontend discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerDescription {
    /// Balancer name
    pub name: String,
    /// DNS name traffic should be pointed at
    pub dns_name: String,
    /// Reachability class of the balancer
    pub scheme: FrontendScheme,
    /// Value of the frontend discovery tag, if tagged
    pub frontend_tag: Option<String>,
}

/// Load-balancer discovery capability.
#[async_trait]
pub trait LoadBalancerApi: Send + Sync {
    /// Describe load balancers. `names = None` lists all balancers visible
    /// to the account; otherwise only the named ones are described.
    async fn describe_load_balancers(
        &self,
        names: Option<&[String]>,
    ) -> Result<Vec<LoadBalancerDescription>, DnsError>;
}

/// Hosted-zone record capability.
#[async_trait]
pub trait RecordSetApi: Send + Sync {
    /// List all record sets of a hosted zone.
    async fn list_record_sets(&self, zone: &str) -> Result<Vec<DnsRecord>, DnsError>;

    /// Submit one record change to a hosted zone. Creates and updates are
    /// upserts on the record name; deletes remove the named record.
    async fn change_record_set(&self, zone: &str, change: &RecordChange) -> Result<(), DnsError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLoadBalancersResponse {
    #[serde(default)]
    load_balancers: Vec<LoadBalancerPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadBalancerPayload {
    name: String,
    dns_name: String,
    scheme: FrontendScheme,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl From<LoadBalancerPayload> for LoadBalancerDescription {
    fn from(payload: LoadBalancerPayload) -> Self {
        let frontend_tag = payload.tags.get(FRONTEND_TAG_KEY).cloned();
        Self {
            name: payload.name,
            dns_name: payload.dns_name,
            scheme: payload.scheme,
            frontend_tag,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordSetPayload {
    name: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    value: String,
    ttl: u32,
}

impl From<RecordSetPayload> for DnsRecord {
    fn from(payload: RecordSetPayload) -> Self {
        Self {
            name: payload.name,
            record_type: payload.record_type,
            value: payload.value,
            ttl: payload.ttl,
        }
    }
}

impl From<&DnsRecord> for RecordSetPayload {
    fn from(record: &DnsRecord) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.record_type,
            value: record.value.clone(),
            ttl: record.ttl,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListRecordSetsResponse {
    #[serde(default)]
    records: Vec<RecordSetPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangeRecordSetRequest {
    action: ChangeAction,
    record: RecordSetPayload,
}

// ============================================================================
// HTTP clients
// ============================================================================

/// HTTP implementation of [`LoadBalancerApi`].
#[derive(Debug, Clone)]
pub struct HttpLoadBalancerClient {
    client: HttpClient,
    endpoint: String,
}

impl HttpLoadBalancerClient {
    /// Create a client against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is not a valid URL.
    pub fn new(endpoint: &str) -> Result<Self, DnsError> {
        Ok(Self {
            client: HttpClient::new(),
            endpoint: parse_endpoint(endpoint)?,
        })
    }
}

#[async_trait]
impl LoadBalancerApi for HttpLoadBalancerClient {
    async fn describe_load_balancers(
        &self,
        names: Option<&[String]>,
    ) -> Result<Vec<LoadBalancerDescription>, DnsError> {
        let mut url = format!("{}/loadbalancers", self.endpoint);
        if let Some(names) = names {
            url = format!("{url}?names={}", names.join(","));
        }
        debug!(url = %url, "Describing load balancers");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        if !response.status().is_success() {
            return Err(response_error(&self.endpoint, None, response).await);
        }

        let parsed: DescribeLoadBalancersResponse = response
            .json()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        Ok(parsed
            .load_balancers
            .into_iter()
            .map(LoadBalancerDescription::from)
            .collect())
    }
}

/// HTTP implementation of [`RecordSetApi`].
#[derive(Debug, Clone)]
pub struct HttpRecordSetClient {
    client: HttpClient,
    endpoint: String,
}

impl HttpRecordSetClient {
    /// Create a client against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint is not a valid URL.
    pub fn new(endpoint: &str) -> Result<Self, DnsError> {
        Ok(Self {
            client: HttpClient::new(),
            endpoint: parse_endpoint(endpoint)?,
        })
    }
}

#[async_trait]
impl RecordSetApi for HttpRecordSetClient {
    async fn list_record_sets(&self, zone: &str) -> Result<Vec<DnsRecord>, DnsError> {
        let url = format!("{}/zones/{zone}/recordsets", self.endpoint);
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

        let parsed: ListRecordSetsResponse = response
            .json()
            .await
            .map_err(|e| connection_error(&self.endpoint, &e))?;

        Ok(parsed.records.into_iter().map(DnsRecord::from).collect())
    }

    async fn change_record_set(&self, zone: &str, change: &RecordChange) -> Result<(), DnsError> {
        let url = format!("{}/zones/{zone}/recordsets/changes", self.endpoint);
        let request = ChangeRecordSetRequest {
            action: change.action,
            record: RecordSetPayload::from(&change.record),
        };
        debug!(url = %url, change = %change, "Submitting record change");

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
