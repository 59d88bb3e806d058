//! Shared construction of the outbound HTTP clients.

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

/// Builds a client with the given request timeout.
///
/// If the TLS backend cannot be initialised the default client is used, which
/// has no timeout; that fallback is logged.
pub fn client_with_timeout(service: &str, timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!(
            "Failed to build {service} HTTP client with {}s timeout ({e}); using default client without timeout",
            timeout.as_secs()
        );
        Client::new()
    })
}
