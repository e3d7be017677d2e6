// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `diff.rs`

#[cfg(test)]
mod tests {
    use super::super::{compute_changes, normalized_set};
    use crate::records::{ChangeSet, DnsRecord};
    use std::collections::HashSet;

    const LB_INTERNAL: &str = "lb-internal.example.com";
    const LB_EXTERNAL: &str = "lb-external.example.com";

    fn managed() -> HashSet<String> {
        normalized_set([LB_INTERNAL, LB_EXTERNAL])
    }

    /// Empty zone plus one desired record yields a single create.
    #[test]
    fn test_create_into_empty_zone() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &[], &managed(), &hostnames);

        assert_eq!(
            changes,
            ChangeSet {
                creates: desired.clone(),
                updates: vec![],
                deletes: vec![],
            }
        );
    }

    /// A zone already carrying the exact desired record yields no changes.
    #[test]
    fn test_converged_zone_is_untouched() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let current = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert!(changes.is_empty(), "expected empty change set: {changes:?}");
    }

    /// Current records matching under name/value normalization count as
    /// converged.
    #[test]
    fn test_normalized_comparison() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let current = vec![DnsRecord::cname(
            "A.Example.Com.",
            "LB-Internal.Example.Com.",
            300,
        )];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert!(changes.is_empty());
    }

    /// A changed target value becomes an update, not a create.
    #[test]
    fn test_value_change_is_update() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_EXTERNAL, 300)];
        let current = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert_eq!(changes.updates, desired);
        assert!(changes.creates.is_empty());
        assert!(changes.deletes.is_empty());
    }

    /// A TTL change alone is enough to trigger an update.
    #[test]
    fn test_ttl_change_is_update() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 60)];
        let current = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert_eq!(changes.updates, desired);
    }

    /// A hostname that left the desired set is deleted when its record
    /// points at a managed frontend.
    #[test]
    fn test_shrinking_desired_set_deletes_stale_record() {
        let desired = vec![DnsRecord::cname("a.example.com", LB_INTERNAL, 300)];
        let current = vec![
            DnsRecord::cname("a.example.com", LB_INTERNAL, 300),
            DnsRecord::cname("b.example.com", LB_INTERNAL, 300),
        ];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert!(changes.creates.is_empty());
        assert!(changes.updates.is_empty());
        assert_eq!(
            changes.deletes,
            vec![DnsRecord::cname("b.example.com", LB_INTERNAL, 300)]
        );
    }

    /// Records pointing outside the managed frontends are never deleted.
    #[test]
    fn test_unmanaged_record_is_never_deleted() {
        let current = vec![
            DnsRecord::cname("mail.example.com", "mail-host.example.net", 3600),
            DnsRecord::a("legacy.example.com", "203.0.113.9", 3600),
        ];

        let changes = compute_changes(&[], &current, &managed(), &HashSet::new());

        assert!(changes.is_empty(), "unexpected changes: {changes:?}");
    }

    /// A hostname whose scheme failed to resolve is still desired: its
    /// record survives even though no desired record was built for it.
    #[test]
    fn test_unresolved_scheme_hostname_is_protected() {
        let current = vec![DnsRecord::cname("a.example.com", LB_EXTERNAL, 300)];
        // No desired record could be built, but the hostname is desired.
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&[], &current, &managed(), &hostnames);

        assert!(changes.deletes.is_empty());
    }

    /// Duplicate desired records for the same name collapse to the first.
    #[test]
    fn test_duplicate_desired_records_collapse() {
        let desired = vec![
            DnsRecord::cname("a.example.com", LB_INTERNAL, 300),
            DnsRecord::cname("A.example.com", LB_EXTERNAL, 300),
        ];
        let hostnames = normalized_set(["a.example.com"]);

        let changes = compute_changes(&desired, &[], &managed(), &hostnames);

        assert_eq!(changes.creates.len(), 1);
        assert_eq!(changes.creates[0].value, LB_INTERNAL);
    }

    /// Mixed pass: one create, one update, one delete, one untouched.
    #[test]
    fn test_mixed_changes() {
        let desired = vec![
            DnsRecord::cname("new.example.com", LB_INTERNAL, 300),
            DnsRecord::cname("moved.example.com", LB_EXTERNAL, 300),
            DnsRecord::cname("steady.example.com", LB_INTERNAL, 300),
        ];
        let current = vec![
            DnsRecord::cname("moved.example.com", LB_INTERNAL, 300),
            DnsRecord::cname("steady.example.com", LB_INTERNAL, 300),
            DnsRecord::cname("gone.example.com", LB_EXTERNAL, 300),
        ];
        let hostnames =
            normalized_set(["new.example.com", "moved.example.com", "steady.example.com"]);

        let changes = compute_changes(&desired, &current, &managed(), &hostnames);

        assert_eq!(changes.creates.len(), 1);
        assert_eq!(changes.creates[0].name, "new.example.com");
        assert_eq!(changes.updates.len(), 1);
        assert_eq!(changes.updates[0].name, "moved.example.com");
        assert_eq!(changes.deletes.len(), 1);
        assert_eq!(changes.deletes[0].name, "gone.example.com");
    }
}
