// Transport configuration for building reqwest::Client instances.
//
// The Telldus Live service is a public cloud API behind normal TLS, so
// there is no certificate-mode machinery here — just the timeout every
// request is bounded by, and a stable user agent.

use std::time::Duration;

/// Fixed per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport configuration for the HTTP session.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Config with a caller-chosen timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("tellive/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Http)
    }
}
