// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Health reporting for the synchronizer process.
//!
//! Each reconciliation pass records its outcome into a shared [`Health`]
//! value; an axum server exposes it on `/health` (200 when the last pass
//! was clean, 503 when degraded) together with the Prometheus `/metrics`
//! endpoint. Persistent failures surface here as a degraded state while the
//! process keeps running and retrying on schedule.

use crate::constants::{HEALTH_SERVER_BIND_ADDRESS, HEALTH_SERVER_PATH, METRICS_SERVER_PATH};
use crate::metrics::gather_metrics;
use crate::reconciler::ReconcileResult;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Outcome of the most recent reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassStatus {
    /// Whether the pass completed without failures or skipped schemes
    pub ok: bool,
    /// When the pass finished
    pub finished_at: DateTime<Utc>,
    /// Records created
    pub created: usize,
    /// Records rewritten
    pub updated: usize,
    /// Records removed
    pub deleted: usize,
    /// Record operations rejected by the provider
    pub failed: usize,
    /// Schemes skipped because resolution failed
    pub skipped_schemes: Vec<String>,
    /// Error that aborted the pass, if it aborted
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct HealthState {
    last_pass: Option<PassStatus>,
    consecutive_failures: u32,
}

/// Shared health aggregator, cheap to clone.
#[derive(Clone, Default)]
pub struct Health {
    inner: Arc<RwLock<HealthState>>,
}

/// JSON shape served on the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    /// Whether the process is considered healthy
    pub healthy: bool,
    /// Failures since the last clean pass
    pub consecutive_failures: u32,
    /// The most recent pass, once one has run
    pub last_pass: Option<PassStatus>,
}

impl Health {
    /// Create an empty aggregator; the process reports healthy until the
    /// first pass completes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed pass.
    pub fn record_result(&self, result: &ReconcileResult) {
        let ok = result.is_clean();
        let status = PassStatus {
            ok,
            finished_at: Utc::now(),
            created: result.created,
            updated: result.updated,
            deleted: result.deleted,
            failed: result.failed.len(),
            skipped_schemes: result
                .skipped_schemes
                .iter()
                .map(|s| s.scheme.to_string())
                .collect(),
            error: None,
        };

        let mut state = self.inner.write().expect("health lock poisoned");
        state.consecutive_failures = if ok {
            0
        } else {
            state.consecutive_failures + 1
        };
        state.last_pass = Some(status);
    }

    /// Record a pass that aborted before applying anything.
    pub fn record_error(&self, error: &dyn std::fmt::Display) {
        let mut state = self.inner.write().expect("health lock poisoned");
        state.consecutive_failures += 1;
        state.last_pass = Some(PassStatus {
            ok: false,
            finished_at: Utc::now(),
            created: 0,
            updated: 0,
            deleted: 0,
            failed: 0,
            skipped_schemes: Vec::new(),
            error: Some(error.to_string()),
        });
    }

    /// Healthy means the last pass was clean, or no pass has run yet.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        let state = self.inner.read().expect("health lock poisoned");
        state.last_pass.as_ref().is_none_or(|pass| pass.ok)
    }

    /// Current state for the health endpoint.
    #[must_use]
    pub fn snapshot(&self) -> HealthSnapshot {
        let state = self.inner.read().expect("health lock poisoned");
        HealthSnapshot {
            healthy: state.last_pass.as_ref().is_none_or(|pass| pass.ok),
            consecutive_failures: state.consecutive_failures,
            last_pass: state.last_pass.clone(),
        }
    }
}

async fn health_handler(State(health): State<Health>) -> impl IntoResponse {
    let snapshot = health.snapshot();
    let status = if snapshot.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(snapshot))
}

async fn metrics_handler() -> impl IntoResponse {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Serve `/health` and `/metrics` until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve_health(
    health: Health,
    port: u16,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let addr = format!("{HEALTH_SERVER_BIND_ADDRESS}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let app = Router::new()
        .route(HEALTH_SERVER_PATH, get(health_handler))
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .with_state(health);

    info!(addr = %addr, "Health server listening");

    tokio::select! {
        biased;
        _ = shutdown.changed() => {}
        result = axum::serve(listener, app) => {
            result?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod health_tests;
