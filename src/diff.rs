// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pure record diff between desired state and the provider's current zone.
//!
//! The diff is recomputed from fresh provider state every pass; no local
//! view of the zone survives across passes. Deletion is scoped: only
//! records pointing at one of this pass's resolved frontend targets are
//! delete candidates, so unrelated zone entries are never touched.

use crate::records::{normalize_dns_name, ChangeSet, DnsRecord};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compute the minimal change set turning `current` into `desired`.
///
/// * A desired record with no same-name current record becomes a create.
/// * A desired record whose same-name current record differs in type, value,
///   or TTL becomes an update; identical records are left untouched.
/// * A current A/CNAME record whose value is one of `managed_targets` and
///   whose name is in neither the desired record set nor `desired_hostnames`
///   becomes a delete.
///
/// `desired_hostnames` is the full set of hostnames desired this pass,
/// including hostnames whose scheme failed to resolve; their records must
/// survive even though no desired record could be built for them.
/// `managed_targets` and `desired_hostnames` are expected in normalized form
/// (see [`normalize_dns_name`]).
#[must_use]
pub fn compute_changes(
    desired: &[DnsRecord],
    current: &[DnsRecord],
    managed_targets: &HashSet<String>,
    desired_hostnames: &HashSet<String>,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    let current_by_name: HashMap<String, &DnsRecord> = current
        .iter()
        .map(|record| (record.normalized_name(), record))
        .collect();

    let mut desired_names = HashSet::with_capacity(desired.len());

    for record in desired {
        let name = record.normalized_name();
        if !desired_names.insert(name.clone()) {
            debug!(record = %record, "Duplicate desired record, keeping the first");
            continue;
        }

        match current_by_name.get(&name) {
            None => changes.creates.push(record.clone()),
            Some(existing) if existing.same_data(record) => {}
            Some(_) => changes.updates.push(record.clone()),
        }
    }

    for record in current {
        let name = record.normalized_name();
        if desired_names.contains(&name) || desired_hostnames.contains(&name) {
            continue;
        }
        if managed_targets.contains(&record.normalized_value()) {
            changes.deletes.push(record.clone());
        }
    }

    changes
}

/// Normalize a collection of names into the set form the diff expects.
#[must_use]
pub fn normalized_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| normalize_dns_name(name.as_ref()))
        .collect()
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
