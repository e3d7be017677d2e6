// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use kube::Client;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{debug, error, info};
use zonelink::{
    adapters::build_adapter,
    config::Settings,
    constants::TOKIO_WORKER_THREADS,
    health::{serve_health, Health},
    ingress::{watch_ingresses, IngressSource},
    reconciler::DnsReconciler,
    trigger::SyncLoop,
};

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("zonelink-sync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let settings = Settings::parse();

    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug zonelink ...
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json zonelink ...
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting zonelink DNS synchronizer");

    // Configuration errors stop the process before any reconciliation starts
    if let Err(e) = settings.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let adapter = build_adapter(&settings)?;
    let reconciler = DnsReconciler::new(adapter, settings.api_retries);

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    let source = Arc::new(IngressSource::new(client.clone()));

    let health = Health::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let (sync_loop, sync_handle) = SyncLoop::new(
        reconciler,
        source,
        settings.resync_interval_duration(),
        health.clone(),
    );

    let health_task = tokio::spawn(serve_health(
        health.clone(),
        settings.health_port,
        shutdown_rx.clone(),
    ));
    let watch_task = tokio::spawn(watch_ingresses(
        client,
        sync_handle,
        shutdown_rx.clone(),
    ));
    let sync_task = tokio::spawn(sync_loop.run(shutdown_rx));

    wait_for_signal().await?;
    info!("Signal received, letting the in-flight pass finish");
    let _ = shutdown_tx.send(true);

    sync_task.await?;
    watch_task.await?;
    if let Err(e) = health_task.await? {
        error!(error = %e, "Health server exited with error");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or ctrl-c.
async fn wait_for_signal() -> Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}
