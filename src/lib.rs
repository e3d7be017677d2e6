// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Zonelink - DNS frontend synchronizer for Kubernetes ingress
//!
//! Zonelink keeps the records of one hosted DNS zone pointed at the load
//! balancers fronting a Kubernetes ingress layer. Operators annotate
//! ingresses with a frontend scheme (internal or internet-facing); zonelink
//! discovers the load balancer serving each scheme from a cloud provider
//! (or a static configuration) and converges the zone's CNAME/A records to
//! match.
//!
//! ## Overview
//!
//! Each reconciliation pass rebuilds everything from fresh state:
//!
//! 1. Desired (hostname, scheme) pairs are collected from annotated
//!    Ingress resources
//! 2. Each distinct scheme resolves once to a concrete frontend endpoint
//! 3. The zone's current records are fetched from the provider
//! 4. The minimal set of create/update/delete operations is applied, with
//!    bounded retries and per-record partial failure reporting
//!
//! Passes run serially on a periodic resync tick plus coalesced on-change
//! notifications; repeated passes over converged state apply nothing.
//!
//! ## Modules
//!
//! - [`records`] - Desired state, resolved frontends, and change model
//! - [`reconciler`] - The reconciliation engine
//! - [`diff`] - Pure desired/current record diff
//! - [`adapters`] - Provider adapters (aws, gcp, static) behind one seam
//! - [`retry`] - Bounded-attempt retry with exponential backoff
//! - [`trigger`] - Serial sync loop and change notifications
//! - [`ingress`] - Desired state from Ingress resources
//! - [`health`] - Pass outcome reporting and the health/metrics server
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use zonelink::adapters::static_hostname::StaticHostnameAdapter;
//! use zonelink::reconciler::DnsReconciler;
//! use zonelink::records::{DesiredEntry, FrontendScheme};
//!
//! # async fn example() -> Result<(), zonelink::dns_errors::DnsError> {
//! let mut hostnames = HashMap::new();
//! hostnames.insert(FrontendScheme::Internal, "lb-internal.example.com".to_string());
//! let adapter = Arc::new(StaticHostnameAdapter::new(hostnames, Duration::from_secs(300)));
//!
//! let reconciler = DnsReconciler::new(adapter, 5);
//! let desired = vec![DesiredEntry::new("app.example.com", FrontendScheme::Internal)];
//! let result = reconciler.reconcile(&desired).await?;
//! assert_eq!(result.created, 1);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod constants;
pub mod diff;
pub mod dns_errors;
pub mod health;
pub mod ingress;
pub mod metrics;
pub mod reconciler;
pub mod records;
pub mod retry;
pub mod trigger;
