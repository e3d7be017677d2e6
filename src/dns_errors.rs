// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for frontend resolution and DNS provider operations.
//!
//! This module provides specialized error types for:
//! - Startup configuration validation
//! - Per-scheme frontend resolution failures
//! - Provider API availability and zone lookup failures
//! - Partially applied change sets
//!
//! The composite [`DnsError`] carries a transience classification that
//! drives the retry wrapper: transient errors are retried with backoff,
//! permanent errors propagate immediately.

use crate::records::{FailedChange, FrontendScheme, RecordChange};
use thiserror::Error;

/// Errors raised while validating operator configuration at startup.
///
/// These are fatal: the process refuses to start rather than reconcile
/// against a contradictory or incomplete configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// No hosted zone configured for a provider that manages one
    #[error("Provider '{provider}' requires a hosted zone")]
    MissingHostedZone {
        /// The selected provider
        provider: String,
    },

    /// Static hostnames and load-balancer discovery configured together
    ///
    /// A scheme resolves either from the static map or from discovery,
    /// never both.
    #[error("Cannot combine static hostnames with load-balancer discovery (ALB names or frontend tag)")]
    ConflictingFrontendSources,

    /// Neither static hostnames nor any discovery mechanism configured
    #[error("Provider '{provider}' needs at least one frontend source: ALB names, a frontend tag value, or static hostnames")]
    MissingFrontendSource {
        /// The selected provider
        provider: String,
    },

    /// A required discovery setting is absent
    #[error("Provider '{provider}' requires '{setting}'")]
    MissingSetting {
        /// The selected provider
        provider: String,
        /// The flag that must be supplied
        setting: &'static str,
    },

    /// An endpoint override is not a valid URL
    #[error("Invalid API endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The configured endpoint value
        endpoint: String,
        /// Why it failed to parse
        reason: String,
    },
}

/// Errors resolving a frontend scheme to a concrete endpoint.
///
/// Resolution failures are scoped to a single scheme within a single pass:
/// the affected scheme's entries are skipped and the pass continues.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The static configuration has no hostname for this scheme
    #[error("No static hostname configured for scheme '{scheme}'")]
    SchemeNotConfigured {
        /// The scheme that has no mapping
        scheme: FrontendScheme,
    },

    /// Discovery found no load balancer serving this scheme
    #[error("No load balancer found for scheme '{scheme}' (selector: {selector})")]
    NoFrontendFound {
        /// The scheme being resolved
        scheme: FrontendScheme,
        /// The tag value or name list used for discovery
        selector: String,
    },

    /// Discovery found more than one load balancer serving this scheme
    ///
    /// An ambiguous target is rejected rather than guessed; no record for
    /// this scheme is created or modified this pass.
    #[error("Found {count} load balancers for scheme '{scheme}' (selector: {selector}), expected exactly one")]
    AmbiguousFrontend {
        /// The scheme being resolved
        scheme: FrontendScheme,
        /// The tag value or name list used for discovery
        selector: String,
        /// How many balancers matched
        count: usize,
    },

    /// The discovery API call itself failed
    #[error("Frontend discovery for scheme '{scheme}' failed: {source}")]
    DiscoveryFailed {
        /// The scheme being resolved
        scheme: FrontendScheme,
        /// The underlying provider failure
        #[source]
        source: Box<ProviderError>,
    },
}

/// Errors from the DNS provider's API.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The configured hosted zone does not exist
    ///
    /// Fatal for the adapter instance: no amount of retrying helps, and the
    /// pass is aborted because the diff cannot be trusted without current
    /// state.
    #[error("Hosted zone '{zone}' not found")]
    ZoneNotFound {
        /// The configured zone identifier
        zone: String,
    },

    /// The provider returned a gateway or server error (HTTP 5xx)
    #[error("Provider endpoint {endpoint} unavailable (HTTP {status_code})")]
    Unavailable {
        /// The endpoint that failed
        endpoint: String,
        /// HTTP status code
        status_code: u16,
    },

    /// The connection to the provider could not be established
    #[error("Connection to {endpoint} failed: {reason}")]
    ConnectionFailed {
        /// The endpoint that could not be reached
        endpoint: String,
        /// Reason for the connection failure
        reason: String,
    },

    /// The provider rate-limited the request (HTTP 429)
    #[error("Provider endpoint {endpoint} rate limited the request")]
    RateLimited {
        /// The endpoint that throttled
        endpoint: String,
    },

    /// The provider returned a response outside the known error conditions
    #[error("Unexpected response from {endpoint}: HTTP {status_code} {reason}")]
    UnexpectedResponse {
        /// The endpoint that responded
        endpoint: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        reason: String,
    },
}

/// Errors applying a change set.
#[derive(Error, Debug, Clone)]
pub enum ApplyError {
    /// Some record operations succeeded and some failed
    ///
    /// Failures are surfaced and corrected on the next pass, which recomputes
    /// the diff from fresh provider state; they are not retried within the
    /// same apply call.
    #[error("{} of {} record changes failed in zone '{zone}'", .failed.len(), .succeeded.len() + .failed.len())]
    Partial {
        /// The zone the changes were applied to
        zone: String,
        /// Operations the provider accepted
        succeeded: Vec<RecordChange>,
        /// Operations the provider rejected
        failed: Vec<FailedChange>,
    },
}

/// Composite error type for all synchronizer operations.
#[derive(Error, Debug, Clone)]
pub enum DnsError {
    /// Startup configuration error (fatal before any reconciliation)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Per-scheme frontend resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// DNS provider API error
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Partially applied change set
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Generic error for operations that don't fit other categories
    #[error("DNS operation failed: {0}")]
    Generic(String),
}

impl DnsError {
    /// Returns true if this error is transient and the operation should be
    /// retried.
    ///
    /// Transient errors are provider unavailability, connection failures,
    /// and rate limiting. Configuration errors, unresolved schemes, missing
    /// zones, and partial applies are permanent for the current pass.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Provider(
                ProviderError::Unavailable { .. }
                | ProviderError::ConnectionFailed { .. }
                | ProviderError::RateLimited { .. },
            ) => true,

            Self::Resolve(ResolveError::DiscoveryFailed { source, .. }) => {
                DnsError::Provider((**source).clone()).is_transient()
            }

            Self::Config(_)
            | Self::Resolve(
                ResolveError::SchemeNotConfigured { .. }
                | ResolveError::NoFrontendFound { .. }
                | ResolveError::AmbiguousFrontend { .. },
            )
            | Self::Provider(
                ProviderError::ZoneNotFound { .. } | ProviderError::UnexpectedResponse { .. },
            )
            | Self::Apply(ApplyError::Partial { .. })
            | Self::Generic(_) => false,
        }
    }

    /// Short reason code for metrics and health reporting.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigurationError",

            Self::Resolve(ResolveError::SchemeNotConfigured { .. }) => "SchemeNotConfigured",
            Self::Resolve(ResolveError::NoFrontendFound { .. }) => "NoFrontendFound",
            Self::Resolve(ResolveError::AmbiguousFrontend { .. }) => "AmbiguousFrontend",
            Self::Resolve(ResolveError::DiscoveryFailed { .. }) => "DiscoveryFailed",

            Self::Provider(ProviderError::ZoneNotFound { .. }) => "ZoneNotFound",
            Self::Provider(ProviderError::Unavailable { .. }) => "ProviderUnavailable",
            Self::Provider(ProviderError::ConnectionFailed { .. }) => "ConnectionFailed",
            Self::Provider(ProviderError::RateLimited { .. }) => "RateLimited",
            Self::Provider(ProviderError::UnexpectedResponse { .. }) => "UnexpectedResponse",

            Self::Apply(ApplyError::Partial { .. }) => "PartialApply",

            Self::Generic(_) => "DnsOperationFailed",
        }
    }
}

// Conversion from anyhow::Error for binary-level glue code
impl From<anyhow::Error> for DnsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Generic(err.to_string())
    }
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
