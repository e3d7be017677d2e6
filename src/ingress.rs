// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired state from Kubernetes Ingress resources.
//!
//! Every pass lists the cluster's Ingress resources fresh and maps each
//! host of each annotated ingress to a [`DesiredEntry`]; no desired-state
//! cache survives across passes. A separate watch task streams ingress
//! events into the sync loop's notification handle so changes are picked
//! up ahead of the periodic resync.

use crate::constants::FRONTEND_SCHEME_ANNOTATION;
use crate::records::{DesiredEntry, FrontendScheme};
use crate::trigger::{DesiredStateSource, SyncHandle};
use async_trait::async_trait;
use futures::TryStreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client, ResourceExt};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Desired-state source backed by the cluster's Ingress resources.
#[derive(Clone)]
pub struct IngressSource {
    client: Client,
}

impl IngressSource {
    /// Create a source over a Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DesiredStateSource for IngressSource {
    async fn desired_entries(&self) -> anyhow::Result<Vec<DesiredEntry>> {
        let api: Api<Ingress> = Api::all(self.client.clone());
        let ingresses = api.list(&ListParams::default()).await?;

        let mut entries = Vec::new();
        for ingress in ingresses {
            let Some(scheme) = frontend_scheme(&ingress) else {
                continue;
            };
            for host in ingress_hosts(&ingress) {
                entries.push(DesiredEntry::new(host, scheme));
            }
        }

        debug!(entries = entries.len(), "Collected desired entries");
        Ok(entries)
    }
}

/// Read and parse the frontend scheme annotation, if present.
fn frontend_scheme(ingress: &Ingress) -> Option<FrontendScheme> {
    let raw = ingress.annotations().get(FRONTEND_SCHEME_ANNOTATION)?;
    match raw.parse::<FrontendScheme>() {
        Ok(scheme) => Some(scheme),
        Err(e) => {
            warn!(
                ingress = %ingress.name_any(),
                namespace = ?ingress.namespace(),
                error = %e,
                "Ignoring ingress with invalid frontend scheme annotation"
            );
            None
        }
    }
}

/// The hosts named by an ingress's rules.
fn ingress_hosts(ingress: &Ingress) -> Vec<String> {
    ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.rules.as_ref())
        .into_iter()
        .flatten()
        .filter_map(|rule| rule.host.clone())
        .collect()
}

/// Stream ingress changes into the sync loop until shutdown.
///
/// Only ingresses carrying the frontend scheme annotation trigger a pass;
/// deletions count as changes too. Watch errors are transient and logged,
/// the watcher restarts itself.
pub async fn watch_ingresses(
    client: Client,
    handle: SyncHandle,
    mut shutdown: watch::Receiver<bool>,
) {
    let api: Api<Ingress> = Api::all(client);
    let stream = watcher(api, watcher::Config::default()).touched_objects();
    let mut stream = std::pin::pin!(stream);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                debug!("Shutdown requested, ingress watch stopping");
                return;
            }
            event = stream.try_next() => match event {
                Ok(Some(ingress)) => {
                    if ingress.annotations().contains_key(FRONTEND_SCHEME_ANNOTATION) {
                        debug!(
                            ingress = %ingress.name_any(),
                            namespace = ?ingress.namespace(),
                            "Ingress change, requesting pass"
                        );
                        handle.notify();
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    warn!(error = %e, "Ingress watch error");
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "ingress_tests.rs"]
mod ingress_tests;
