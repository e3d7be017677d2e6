// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The DNS reconciliation engine.
//!
//! One pass reads everything fresh: the desired (hostname, scheme) pairs
//! come in from the caller, each distinct scheme resolves once through the
//! active adapter, the zone's current records are fetched, and the minimal
//! change set is applied. A scheme that fails to resolve skips its entries
//! for the pass without stopping the others; a zone fetch failure aborts
//! the pass entirely, because the diff cannot be trusted without current
//! state. Repeated passes over converged state produce no changes.

use crate::adapters::FrontendAdapter;
use crate::diff::{compute_changes, normalized_set};
use crate::dns_errors::{ApplyError, DnsError};
use crate::records::{
    normalize_dns_name, ChangeAction, DesiredEntry, DnsRecord, FailedChange, FrontendScheme,
    ResolvedTarget,
};
use crate::retry::with_retries;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// A scheme whose entries were skipped this pass, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedScheme {
    /// The scheme that failed to resolve
    pub scheme: FrontendScheme,
    /// The resolution failure, rendered
    pub reason: String,
}

/// Outcome summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Records created
    pub created: usize,
    /// Records rewritten
    pub updated: usize,
    /// Records removed
    pub deleted: usize,
    /// Record operations the provider rejected
    pub failed: Vec<FailedChange>,
    /// Schemes skipped because resolution failed
    pub skipped_schemes: Vec<SkippedScheme>,
}

impl ReconcileResult {
    /// Total records changed this pass.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Whether the pass completed without rejected operations or skipped
    /// schemes.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped_schemes.is_empty()
    }
}

/// Reconciles desired entries against the managed zone through the active
/// adapter.
pub struct DnsReconciler {
    adapter: Arc<dyn FrontendAdapter>,
    max_attempts: u32,
}

impl DnsReconciler {
    /// Create an engine over the active adapter with the configured retry
    /// budget for provider calls.
    #[must_use]
    pub fn new(adapter: Arc<dyn FrontendAdapter>, max_attempts: u32) -> Self {
        Self {
            adapter,
            max_attempts,
        }
    }

    /// Name of the active provider, for logging and metrics.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.adapter.provider_name()
    }

    /// Run one reconciliation pass.
    ///
    /// # Errors
    ///
    /// Returns an error only when the pass had to be aborted before any
    /// change was applied (the current record set could not be fetched).
    /// Partial apply failures and unresolved schemes are reported in the
    /// result, not as errors; the next pass recomputes from fresh state and
    /// converges.
    pub async fn reconcile(&self, entries: &[DesiredEntry]) -> Result<ReconcileResult, DnsError> {
        let mut result = ReconcileResult::default();

        let desired_entries = dedupe_by_hostname(entries);
        let schemes: BTreeSet<FrontendScheme> =
            desired_entries.iter().map(|entry| entry.scheme).collect();

        let mut targets: HashMap<FrontendScheme, ResolvedTarget> = HashMap::new();
        for &scheme in &schemes {
            let outcome = with_retries(self.max_attempts, "resolve frontend", || {
                self.adapter.resolve(scheme)
            })
            .await;
            match outcome {
                Ok(target) => {
                    targets.insert(scheme, target);
                }
                Err(e) => {
                    warn!(
                        scheme = %scheme,
                        error = %e,
                        "Frontend resolution failed, skipping scheme this pass"
                    );
                    result.skipped_schemes.push(SkippedScheme {
                        scheme,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let current = with_retries(self.max_attempts, "list current records", || {
            self.adapter.current_records()
        })
        .await?;

        let desired_records: Vec<DnsRecord> = desired_entries
            .iter()
            .filter_map(|entry| {
                targets
                    .get(&entry.scheme)
                    .map(|target| DnsRecord::for_target(&entry.hostname, target))
            })
            .collect();

        let managed_targets = normalized_set(targets.values().map(|t| t.target.as_str()));
        let desired_hostnames =
            normalized_set(desired_entries.iter().map(|e| e.hostname.as_str()));

        let changes = compute_changes(
            &desired_records,
            &current,
            &managed_targets,
            &desired_hostnames,
        );

        if changes.is_empty() {
            info!(
                provider = self.adapter.provider_name(),
                records = current.len(),
                "Zone converged, nothing to apply"
            );
            return Ok(result);
        }

        info!(
            provider = self.adapter.provider_name(),
            creates = changes.creates.len(),
            updates = changes.updates.len(),
            deletes = changes.deletes.len(),
            "Applying record changes"
        );

        let outcome = with_retries(self.max_attempts, "apply record changes", || {
            self.adapter.apply(&changes)
        })
        .await;

        match outcome {
            Ok(report) => {
                result.created = report.count(ChangeAction::Create);
                result.updated = report.count(ChangeAction::Update);
                result.deleted = report.count(ChangeAction::Delete);
            }
            Err(DnsError::Apply(ApplyError::Partial {
                succeeded, failed, ..
            })) => {
                result.created = count_action(&succeeded, ChangeAction::Create);
                result.updated = count_action(&succeeded, ChangeAction::Update);
                result.deleted = count_action(&succeeded, ChangeAction::Delete);
                warn!(
                    succeeded = succeeded.len(),
                    failed = failed.len(),
                    "Change set partially applied, failures retry next pass"
                );
                result.failed = failed;
            }
            Err(e) => {
                warn!(error = %e, "Change set could not be applied");
                result.failed = changes
                    .ordered_changes()
                    .into_iter()
                    .map(|change| FailedChange {
                        change,
                        reason: e.to_string(),
                    })
                    .collect();
            }
        }

        Ok(result)
    }
}

fn count_action(changes: &[crate::records::RecordChange], action: ChangeAction) -> usize {
    changes.iter().filter(|c| c.action == action).count()
}

/// Keep the first entry per hostname; desired state is unique by hostname.
fn dedupe_by_hostname(entries: &[DesiredEntry]) -> Vec<DesiredEntry> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut deduped = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(normalize_dns_name(&entry.hostname)) {
            deduped.push(entry.clone());
        } else {
            warn!(
                hostname = %entry.hostname,
                scheme = %entry.scheme,
                "Duplicate desired hostname, keeping the first entry"
            );
        }
    }
    deduped
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod reconciler_tests;
