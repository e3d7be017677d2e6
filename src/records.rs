// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Core data model for desired state, resolved frontends, and record changes.
//!
//! Desired state is the set of (hostname, scheme) pairs derived from ingress
//! resources. Each scheme resolves once per pass to a concrete frontend
//! target; the diff of desired records against the provider's current record
//! set is expressed as a [`ChangeSet`] and applied as ordered
//! [`RecordChange`]s.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Reachability class of the load balancer serving a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontendScheme {
    /// Reachable only from inside the network
    Internal,
    /// Reachable from the public internet
    InternetFacing,
}

impl FrontendScheme {
    /// All known schemes, in a stable order.
    pub const ALL: [FrontendScheme; 2] = [FrontendScheme::Internal, FrontendScheme::InternetFacing];

    /// The scheme name as used in annotations, tags, and flags.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FrontendScheme::Internal => "internal",
            FrontendScheme::InternetFacing => "internet-facing",
        }
    }
}

impl fmt::Display for FrontendScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrontendScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "internal" => Ok(FrontendScheme::Internal),
            "internet-facing" => Ok(FrontendScheme::InternetFacing),
            other => Err(format!(
                "unknown frontend scheme '{other}' (expected 'internal' or 'internet-facing')"
            )),
        }
    }
}

/// One hostname that should have a DNS entry, and the scheme serving it.
///
/// The set of `DesiredEntry` is rebuilt fresh on every pass from the ingress
/// layer; it is the full target state for the managed zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredEntry {
    /// Fully qualified hostname (e.g. "app.example.com")
    pub hostname: String,
    /// Which frontend class serves this host
    pub scheme: FrontendScheme,
}

impl DesiredEntry {
    /// Create a desired entry.
    #[must_use]
    pub fn new(hostname: impl Into<String>, scheme: FrontendScheme) -> Self {
        Self {
            hostname: hostname.into(),
            scheme,
        }
    }
}

/// A scheme resolved to a concrete frontend endpoint for one pass.
///
/// Computed once per distinct scheme per reconciliation pass and reused for
/// every desired entry sharing that scheme. Never cached across passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The scheme this target serves
    pub scheme: FrontendScheme,
    /// Load-balancer DNS name or IP address
    pub target: String,
    /// TTL applied to every record pointing at this target this pass
    pub ttl: Duration,
}

impl ResolvedTarget {
    /// Create a resolved target.
    #[must_use]
    pub fn new(scheme: FrontendScheme, target: impl Into<String>, ttl: Duration) -> Self {
        Self {
            scheme,
            target: target.into(),
            ttl,
        }
    }

    /// The record type a desired record pointing at this target uses:
    /// A for IP-literal targets, CNAME for hostname targets.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        if self.target.parse::<IpAddr>().is_ok() {
            RecordType::A
        } else {
            RecordType::Cname
        }
    }
}

/// DNS record type managed by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// Canonical name record
    Cname,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::Cname => f.write_str("CNAME"),
        }
    }
}

/// Normalize a DNS name for comparison: lowercase, without the trailing dot.
#[must_use]
pub fn normalize_dns_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// One entry in the provider's zone, either read from the provider or
/// computed from a [`DesiredEntry`] and its [`ResolvedTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record name (fully qualified hostname)
    pub name: String,
    /// Record type (A or CNAME)
    pub record_type: RecordType,
    /// Record value (target hostname or IP address)
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// Create a CNAME record.
    #[must_use]
    pub fn cname(name: impl Into<String>, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::Cname,
            value: value.into(),
            ttl,
        }
    }

    /// Create an A record.
    #[must_use]
    pub fn a(name: impl Into<String>, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            value: value.into(),
            ttl,
        }
    }

    /// Build the desired record for a hostname from its resolved target.
    #[must_use]
    pub fn for_target(hostname: &str, target: &ResolvedTarget) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let ttl = target.ttl.as_secs() as u32;
        Self {
            name: hostname.to_string(),
            record_type: target.record_type(),
            value: target.target.clone(),
            ttl,
        }
    }

    /// Normalized record name, used as the diff key.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_dns_name(&self.name)
    }

    /// Normalized record value. CNAME values are DNS names and compare
    /// case-insensitively without the trailing dot; A values compare as-is.
    #[must_use]
    pub fn normalized_value(&self) -> String {
        match self.record_type {
            RecordType::Cname => normalize_dns_name(&self.value),
            RecordType::A => self.value.trim().to_string(),
        }
    }

    /// Whether another record carries the same data (type, value, and TTL),
    /// comparing values under DNS normalization.
    #[must_use]
    pub fn same_data(&self, other: &DnsRecord) -> bool {
        self.record_type == other.record_type
            && self.ttl == other.ttl
            && self.normalized_value() == other.normalized_value()
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.name, self.ttl, self.record_type, self.value
        )
    }
}

/// The kind of operation a change performs against the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Create => f.write_str("create"),
            ChangeAction::Update => f.write_str("update"),
            ChangeAction::Delete => f.write_str("delete"),
        }
    }
}

/// One record operation submitted to a provider adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    /// What to do with the record
    pub action: ChangeAction,
    /// The record the action applies to
    pub record: DnsRecord,
}

impl RecordChange {
    #[must_use]
    pub fn new(action: ChangeAction, record: DnsRecord) -> Self {
        Self { action, record }
    }
}

impl fmt::Display for RecordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.record)
    }
}

/// The diff output of one reconciliation pass.
///
/// Application order is creates, then updates, then deletes, so a hostname
/// never passes through a window where it resolves to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Records to create (no same-name record exists)
    pub creates: Vec<DnsRecord>,
    /// Records to rewrite (same-name record exists with different data)
    pub updates: Vec<DnsRecord>,
    /// Managed records to remove (no longer desired)
    pub deletes: Vec<DnsRecord>,
}

impl ChangeSet {
    /// True when the zone already matches desired state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Total number of record operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }

    /// All operations in application order: creates, updates, deletes.
    #[must_use]
    pub fn ordered_changes(&self) -> Vec<RecordChange> {
        let mut changes = Vec::with_capacity(self.len());
        changes.extend(
            self.creates
                .iter()
                .map(|r| RecordChange::new(ChangeAction::Create, r.clone())),
        );
        changes.extend(
            self.updates
                .iter()
                .map(|r| RecordChange::new(ChangeAction::Update, r.clone())),
        );
        changes.extend(
            self.deletes
                .iter()
                .map(|r| RecordChange::new(ChangeAction::Delete, r.clone())),
        );
        changes
    }
}

/// One record operation that the provider rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedChange {
    /// The operation that failed
    pub change: RecordChange,
    /// Provider-reported reason
    pub reason: String,
}

impl fmt::Display for FailedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.change, self.reason)
    }
}

/// Per-record outcome of applying a [`ChangeSet`].
///
/// Provider record APIs are not transactional across names, so an apply can
/// partially succeed; the adapter reports both sides rather than collapsing
/// the result to all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Operations the provider accepted
    pub succeeded: Vec<RecordChange>,
    /// Operations the provider rejected
    pub failed: Vec<FailedChange>,
}

impl ApplyReport {
    /// Count of accepted operations with the given action.
    #[must_use]
    pub fn count(&self, action: ChangeAction) -> usize {
        self.succeeded.iter().filter(|c| c.action == action).count()
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
