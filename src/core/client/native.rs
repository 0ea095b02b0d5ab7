//! Blocking reqwest-backed transport.

use std::time::Duration;

use crate::core::client::ClientConfig;
use crate::core::error::{HalError, Result};
use crate::core::traits::HalTransport;
use crate::core::types::HalResponse;

/// The default production transport: a blocking `reqwest` client.
pub struct NativeTransport {
    client: reqwest::blocking::Client,
}

impl NativeTransport {
    /// Create a transport with default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_max_idle_per_host(config.max_idle_connections);

        if !config.proxy_url.is_empty() {
            if let Ok(proxy) = reqwest::Proxy::all(&config.proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        NativeTransport {
            client: builder.build().unwrap_or_default(),
        }
    }

    /// Wrap an existing blocking client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        NativeTransport { client }
    }
}

impl Default for NativeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HalTransport for NativeTransport {
    fn get(&self, uri: &str) -> Result<HalResponse> {
        tracing::debug!(uri, "GET");
        let response = self
            .client
            .get(uri)
            .send()
            .map_err(|e| HalError::Http(e.to_string()))?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_owned();
        let body = response
            .bytes()
            .map_err(|e| HalError::Http(e.to_string()))?;
        Ok(HalResponse::new(status.as_u16(), reason, body))
    }
}
