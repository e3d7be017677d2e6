// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared HTTP plumbing for the provider API clients.
//!
//! Endpoint validation and the mapping from transport failures and HTTP
//! status codes onto the provider error taxonomy. Used by both cloud
//! adapters' clients.

use crate::dns_errors::{ConfigError, DnsError, ProviderError};
use reqwest::{Response, StatusCode};
use url::Url;

/// Validate and normalize an API endpoint from configuration.
///
/// # Errors
///
/// Returns a configuration error when the endpoint is not a valid URL.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<String, DnsError> {
    Url::parse(endpoint).map_err(|e| {
        DnsError::Config(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    })?;
    Ok(endpoint.trim_end_matches('/').to_string())
}

/// Map a reqwest transport error onto the provider taxonomy.
pub(crate) fn connection_error(endpoint: &str, err: &reqwest::Error) -> DnsError {
    ProviderError::ConnectionFailed {
        endpoint: endpoint.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Map a non-success HTTP status onto the provider taxonomy.
///
/// `zone` is the hosted zone the request addressed, when it addressed one:
/// a 404 on a zone-scoped path means the zone does not exist, which is fatal
/// for the adapter instance rather than retryable.
pub(crate) async fn response_error(
    endpoint: &str,
    zone: Option<&str>,
    response: Response,
) -> DnsError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status {
        StatusCode::NOT_FOUND if zone.is_some() => ProviderError::ZoneNotFound {
            zone: zone.unwrap_or_default().to_string(),
        }
        .into(),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            endpoint: endpoint.to_string(),
        }
        .into(),
        s if s.is_server_error() => ProviderError::Unavailable {
            endpoint: endpoint.to_string(),
            status_code: status.as_u16(),
        }
        .into(),
        _ => ProviderError::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            status_code: status.as_u16(),
            reason: body,
        }
        .into(),
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
