//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Named upstream backends.
    pub backends: Vec<BackendConfig>,

    /// Timeout configuration for the outbound leg.
    pub timeouts: TimeoutConfig,

    /// Header forwarding policy.
    pub headers: HeaderConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A named upstream API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Name used in the request path (`/proxy/{name}/...`).
    pub name: String,

    /// Base URL requests are rewritten against (e.g., "https://api.openai.com").
    pub base_url: String,
}

/// Timeouts for the outbound request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed until upstream response headers arrive, in seconds.
    /// Does not bound the body transfer, so long streams are not cut off.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Header forwarding policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Additional header names to strip from the outbound request, on top
    /// of the built-in Host / hop-by-hop set.
    pub deny: Vec<String>,

    /// Inject X-Forwarded-For / X-Forwarded-Host toward the upstream.
    /// Inbound X-Forwarded-* values are replaced, never trusted.
    pub forwarded: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            deny: Vec::new(),
            forwarded: true,
        }
    }
}

impl ProxyConfig {
    /// Built-in backend table used when no config file is given.
    pub fn with_default_backends(mut self) -> Self {
        if self.backends.is_empty() {
            self.backends = vec![
                BackendConfig {
                    name: "openai".to_string(),
                    base_url: "https://api.openai.com".to_string(),
                },
                BackendConfig {
                    name: "claude".to_string(),
                    base_url: "https://api.anthropic.com".to_string(),
                },
            ];
        }
        self
    }
}
