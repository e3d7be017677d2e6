// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `records.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::time::Duration;

    #[test]
    fn test_scheme_roundtrip() {
        for scheme in FrontendScheme::ALL {
            let parsed: FrontendScheme = scheme.to_string().parse().unwrap();
            assert_eq!(parsed, scheme);
        }
    }

    #[test]
    fn test_scheme_parse_rejects_unknown() {
        let err = "public".parse::<FrontendScheme>().unwrap_err();
        assert!(err.contains("public"), "error should name the bad value");
    }

    #[test]
    fn test_scheme_serde_uses_kebab_case() {
        let json = serde_json::to_string(&FrontendScheme::InternetFacing).unwrap();
        assert_eq!(json, "\"internet-facing\"");
    }

    #[test]
    fn test_normalize_dns_name() {
        assert_eq!(normalize_dns_name("App.Example.COM."), "app.example.com");
        assert_eq!(normalize_dns_name("  app.example.com "), "app.example.com");
        assert_eq!(normalize_dns_name("app.example.com"), "app.example.com");
    }

    #[test]
    fn test_resolved_target_record_type() {
        let ttl = Duration::from_secs(300);

        let cname = ResolvedTarget::new(FrontendScheme::Internal, "lb.example.com", ttl);
        assert_eq!(cname.record_type(), RecordType::Cname);

        let a = ResolvedTarget::new(FrontendScheme::InternetFacing, "192.0.2.10", ttl);
        assert_eq!(a.record_type(), RecordType::A);
    }

    #[test]
    fn test_record_for_target() {
        let target = ResolvedTarget::new(
            FrontendScheme::Internal,
            "lb-internal.example.com",
            Duration::from_secs(300),
        );
        let record = DnsRecord::for_target("app.example.com", &target);

        assert_eq!(
            record,
            DnsRecord::cname("app.example.com", "lb-internal.example.com", 300)
        );
    }

    #[test]
    fn test_same_data_normalizes_cname_values() {
        let a = DnsRecord::cname("app.example.com", "lb.example.com", 300);
        let b = DnsRecord::cname("app.example.com", "LB.Example.Com.", 300);
        assert!(a.same_data(&b));
    }

    #[test]
    fn test_same_data_detects_ttl_change() {
        let a = DnsRecord::cname("app.example.com", "lb.example.com", 300);
        let b = DnsRecord::cname("app.example.com", "lb.example.com", 60);
        assert!(!a.same_data(&b));
    }

    #[test]
    fn test_same_data_detects_type_change() {
        let cname = DnsRecord::cname("app.example.com", "192.0.2.10", 300);
        let a = DnsRecord::a("app.example.com", "192.0.2.10", 300);
        assert!(!cname.same_data(&a));
    }

    #[test]
    fn test_changeset_ordering_creates_before_deletes() {
        let changes = ChangeSet {
            creates: vec![DnsRecord::cname("a.example.com", "lb.example.com", 300)],
            updates: vec![DnsRecord::cname("b.example.com", "lb.example.com", 300)],
            deletes: vec![DnsRecord::cname("c.example.com", "lb.example.com", 300)],
        };

        let ordered = changes.ordered_changes();
        let actions: Vec<ChangeAction> = ordered.iter().map(|c| c.action).collect();
        assert_eq!(
            actions,
            vec![
                ChangeAction::Create,
                ChangeAction::Update,
                ChangeAction::Delete
            ]
        );
    }

    #[test]
    fn test_changeset_emptiness() {
        assert!(ChangeSet::default().is_empty());

        let changes = ChangeSet {
            creates: vec![],
            updates: vec![],
            deletes: vec![DnsRecord::cname("c.example.com", "lb.example.com", 300)],
        };
        assert!(!changes.is_empty());
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_apply_report_counts_by_action() {
        let record = DnsRecord::cname("a.example.com", "lb.example.com", 300);
        let report = ApplyReport {
            succeeded: vec![
                RecordChange::new(ChangeAction::Create, record.clone()),
                RecordChange::new(ChangeAction::Create, record.clone()),
                RecordChange::new(ChangeAction::Delete, record),
            ],
            failed: vec![],
        };

        assert_eq!(report.count(ChangeAction::Create), 2);
        assert_eq!(report.count(ChangeAction::Update), 0);
        assert_eq!(report.count(ChangeAction::Delete), 1);
    }
}
