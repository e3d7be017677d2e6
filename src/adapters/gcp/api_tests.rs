// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Contract tests for the GCP HTTP clients, against a mock server.

#[cfg(test)]
mod tests {
    use super::super::{
        ComputeApi, HttpComputeClient, HttpManagedZoneClient, ManagedZoneApi,
    };
    use crate::dns_errors::{DnsError, ProviderError};
    use crate::records::{DnsRecord, FrontendScheme, RecordType};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_instance_groups_flattens_aggregation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/my-project/aggregated/instanceGroups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": {
                    "zones/europe-west1-b": {
                        "instanceGroups": [
                            { "name": "k8s-ingress-group-a" },
                            { "name": "other-group" }
                        ]
                    },
                    "zones/europe-west1-c": {
                        "instanceGroups": [
                            { "name": "k8s-ingress-group-b" }
                        ]
                    },
                    "zones/europe-west1-d": {}
                }
            })))
            .mount(&server)
            .await;

        let client = HttpComputeClient::new(&server.uri(), "my-project").unwrap();
        let mut groups = client.list_instance_groups().await.unwrap();
        groups.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, "k8s-ingress-group-a");
        assert_eq!(groups[0].location, "zones/europe-west1-b");
    }

    #[tokio::test]
    async fn test_list_forwarding_rules_maps_schemes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/my-project/aggregated/forwardingRules"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": {
                    "regions/europe-west1": {
                        "forwardingRules": [
                            {
                                "name": "k8s-ingress-int",
                                "IPAddress": "10.0.0.10",
                                "loadBalancingScheme": "INTERNAL"
                            },
                            {
                                "name": "k8s-ingress-ext",
                                "IPAddress": "203.0.113.10",
                                "loadBalancingScheme": "EXTERNAL_MANAGED"
                            },
                            {
                                "name": "k8s-ingress-odd",
                                "IPAddress": "203.0.113.11",
                                "loadBalancingScheme": "SOMETHING_ELSE"
                            }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = HttpComputeClient::new(&server.uri(), "my-project").unwrap();
        let mut rules = client.list_forwarding_rules().await.unwrap();
        rules.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(rules.len(), 2, "unknown schemes are ignored");
        assert_eq!(rules[0].scheme, FrontendScheme::InternetFacing);
        assert_eq!(rules[1].scheme, FrontendScheme::Internal);
        assert_eq!(rules[1].ip_address, "10.0.0.10");
    }

    #[tokio::test]
    async fn test_list_record_sets_filters_to_managed_types() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/dns/v1/projects/my-project/managedZones/example-zone/rrsets",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rrsets": [
                    {
                        "name": "a.example.com.",
                        "type": "A",
                        "ttl": 300,
                        "rrdatas": ["10.0.0.10"]
                    },
                    {
                        "name": "example.com.",
                        "type": "SOA",
                        "ttl": 21600,
                        "rrdatas": ["ns.example.com. admin.example.com. 1 21600 3600 259200 300"]
                    },
                    {
                        "name": "www.example.com.",
                        "type": "CNAME",
                        "ttl": 300,
                        "rrdatas": ["lb.example.com."]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = HttpManagedZoneClient::new(&server.uri(), "my-project").unwrap();
        let records = client.list_record_sets("example-zone").await.unwrap();

        assert_eq!(records.len(), 2, "SOA and friends are not managed");
        assert_eq!(records[0].record_type, RecordType::A);
        assert_eq!(records[1].record_type, RecordType::Cname);
        assert_eq!(records[1].value, "lb.example.com.");
    }

    #[tokio::test]
    async fn test_missing_zone_maps_to_zone_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dns/v1/projects/my-project/managedZones/nope/rrsets"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpManagedZoneClient::new(&server.uri(), "my-project").unwrap();
        let err = client.list_record_sets("nope").await.unwrap_err();

        assert!(matches!(
            err,
            DnsError::Provider(ProviderError::ZoneNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_change_uses_absolute_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/dns/v1/projects/my-project/managedZones/example-zone/changes",
            ))
            .and(body_json(json!({
                "additions": [
                    {
                        "name": "a.example.com.",
                        "type": "CNAME",
                        "ttl": 300,
                        "rrdatas": ["lb.example.com."]
                    }
                ],
                "deletions": []
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpManagedZoneClient::new(&server.uri(), "my-project").unwrap();
        let additions = vec![DnsRecord::cname("a.example.com", "lb.example.com", 300)];

        client
            .submit_change("example-zone", &additions, &[])
            .await
            .unwrap();
    }
}
