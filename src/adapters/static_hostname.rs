// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Static per-scheme hostname adapter.
//!
//! Used when the frontends are fixed, externally managed hostnames and no
//! DNS provider API is writable from this process. Resolution is a map
//! lookup; record state is an in-process alias view so repeated passes
//! converge instead of re-reporting the same creates. Nothing persists
//! across restarts, which is the documented at-least-once behavior.

use crate::adapters::FrontendAdapter;
use crate::dns_errors::{DnsError, ResolveError};
use crate::records::{
    ApplyReport, ChangeAction, ChangeSet, DnsRecord, FrontendScheme, RecordChange, ResolvedTarget,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Adapter mapping each scheme to a fixed hostname.
pub struct StaticHostnameAdapter {
    /// Scheme to frontend hostname
    hostnames: HashMap<FrontendScheme, String>,
    /// TTL reported for every resolved target
    ttl: Duration,
    /// Alias view of "applied" records, keyed by normalized name
    records: Mutex<HashMap<String, DnsRecord>>,
}

impl StaticHostnameAdapter {
    /// Create an adapter over a fixed scheme → hostname map.
    #[must_use]
    pub fn new(hostnames: HashMap<FrontendScheme, String>, ttl: Duration) -> Self {
        Self {
            hostnames,
            ttl,
            records: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl FrontendAdapter for StaticHostnameAdapter {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, scheme: FrontendScheme) -> Result<ResolvedTarget, DnsError> {
        let hostname = self
            .hostnames
            .get(&scheme)
            .ok_or(ResolveError::SchemeNotConfigured { scheme })?;
        Ok(ResolvedTarget::new(scheme, hostname.clone(), self.ttl))
    }

    async fn current_records(&self) -> Result<Vec<DnsRecord>, DnsError> {
        let records = self.records.lock().expect("alias view lock poisoned");
        Ok(records.values().cloned().collect())
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<ApplyReport, DnsError> {
        let mut records = self.records.lock().expect("alias view lock poisoned");
        let mut report = ApplyReport::default();

        for change in changes.ordered_changes() {
            let RecordChange { action, record } = &change;
            match action {
                ChangeAction::Create | ChangeAction::Update => {
                    records.insert(record.normalized_name(), record.clone());
                }
                ChangeAction::Delete => {
                    records.remove(&record.normalized_name());
                }
            }
            debug!(change = %change, "Recorded static alias change");
            report.succeeded.push(change);
        }

        Ok(report)
    }
}

#[cfg(test)]
#[path = "static_hostname_tests.rs"]
mod static_hostname_tests;
