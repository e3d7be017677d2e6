// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Serial sync loop: the update trigger for the reconciliation engine.
//!
//! One task owns pass execution, so at most one pass is ever in flight.
//! Passes start on a periodic resync tick and on change notifications from
//! the ingress watch; notifications arriving while a pass runs coalesce
//! into a single pending pass through a capacity-one channel. Shutdown is
//! observed between passes, so an in-flight pass always runs to completion.

use crate::health::Health;
use crate::metrics;
use crate::reconciler::DnsReconciler;
use crate::records::DesiredEntry;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Source of the desired (hostname, scheme) set.
///
/// Implementations rebuild the set fresh on every call; the sync loop never
/// caches it across passes.
#[async_trait]
pub trait DesiredStateSource: Send + Sync {
    /// The full desired set at this moment.
    async fn desired_entries(&self) -> anyhow::Result<Vec<DesiredEntry>>;
}

/// Handle for poking the sync loop from watch tasks.
#[derive(Clone)]
pub struct SyncHandle {
    notify: mpsc::Sender<()>,
}

impl SyncHandle {
    /// Request a pass. If one is already pending the request coalesces
    /// into it.
    pub fn notify(&self) {
        let _ = self.notify.try_send(());
    }
}

/// The sync loop driving reconciliation passes serially.
pub struct SyncLoop {
    reconciler: DnsReconciler,
    source: Arc<dyn DesiredStateSource>,
    resync_interval: Duration,
    health: Health,
    notify_rx: mpsc::Receiver<()>,
}

impl SyncLoop {
    /// Create a sync loop and the notification handle feeding it.
    #[must_use]
    pub fn new(
        reconciler: DnsReconciler,
        source: Arc<dyn DesiredStateSource>,
        resync_interval: Duration,
        health: Health,
    ) -> (Self, SyncHandle) {
        let (notify_tx, notify_rx) = mpsc::channel(1);
        (
            Self {
                reconciler,
                source,
                resync_interval,
                health,
                notify_rx,
            },
            SyncHandle { notify: notify_tx },
        )
    }

    /// Run passes until shutdown. The first tick fires immediately, so the
    /// process converges right after startup.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.resync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    info!("Shutdown requested, sync loop stopping");
                    return;
                }
                _ = ticker.tick() => "resync",
                Some(()) = self.notify_rx.recv() => "notification",
            };
            self.run_pass(trigger).await;
        }
    }

    /// Execute one pass and export its outcome to metrics and health.
    pub async fn run_pass(&self, trigger: &str) {
        let provider = self.reconciler.provider_name();
        let start = Instant::now();
        debug!(trigger = trigger, "Starting reconciliation pass");

        let entries = match self.source.desired_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Could not read desired state, skipping pass");
                metrics::record_pass(provider, "error", start.elapsed());
                self.health.record_error(&e);
                return;
            }
        };
        metrics::record_desired_hostnames(provider, entries.len());

        match self.reconciler.reconcile(&entries).await {
            Ok(result) => {
                metrics::record_changes(result.created, result.updated, result.deleted);
                for failed in &result.failed {
                    metrics::record_failure(&failed.change.action.to_string());
                }
                for skipped in &result.skipped_schemes {
                    metrics::record_skipped_scheme(skipped.scheme.as_str());
                }

                let status = if result.is_clean() { "success" } else { "degraded" };
                metrics::record_pass(provider, status, start.elapsed());
                self.health.record_result(&result);

                info!(
                    trigger = trigger,
                    created = result.created,
                    updated = result.updated,
                    deleted = result.deleted,
                    failed = result.failed.len(),
                    skipped_schemes = result.skipped_schemes.len(),
                    duration = ?start.elapsed(),
                    "Reconciliation pass complete"
                );
            }
            Err(e) => {
                error!(error = %e, "Reconciliation pass aborted");
                metrics::record_pass(provider, "error", start.elapsed());
                self.health.record_error(&e);
            }
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod trigger_tests;
