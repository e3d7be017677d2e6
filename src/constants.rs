// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the zonelink synchronizer.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// DNS Constants
// ============================================================================

/// Default time-to-live for managed CNAME/A records (5 minutes)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 300;

/// Annotation on Ingress resources naming the frontend scheme serving its hosts
pub const FRONTEND_SCHEME_ANNOTATION: &str = "zonelink.firestoned.io/frontend-scheme";

/// Tag key used to discover load balancers belonging to this cluster's frontends
pub const FRONTEND_TAG_KEY: &str = "zonelink.firestoned.io/cluster-frontend";

// ============================================================================
// Reconciliation Constants
// ============================================================================

/// Default full resync interval (15 minutes)
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 900;

/// Default number of attempts for a provider API call
pub const DEFAULT_API_RETRIES: u32 = 5;

// ============================================================================
// Provider Constants
// ============================================================================

/// Default AWS region for load-balancer discovery
pub const DEFAULT_AWS_REGION: &str = "eu-west-1";

// ============================================================================
// Health Server Constants
// ============================================================================

/// Default port for the health/metrics HTTP server
pub const DEFAULT_HEALTH_PORT: u16 = 12082;

/// Path for the health endpoint
pub const HEALTH_SERVER_PATH: &str = "/health";

/// Path for the Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for the health HTTP server
pub const HEALTH_SERVER_BIND_ADDRESS: &str = "0.0.0.0";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
