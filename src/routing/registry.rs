//! Backend name → base URL registry.
//!
//! # Responsibilities
//! - Freeze the configured backend table at startup
//! - Resolve a name to its backend, or report the unknown name
//!
//! # Design Decisions
//! - Immutable after construction: concurrent lookups need no locks
//! - Base URLs are parsed once here, so per-request composition cannot fail
//!   on a bad base

use std::collections::HashMap;

use url::Url;

use crate::config::BackendConfig;
use crate::error::ProxyError;

/// A resolved upstream API.
#[derive(Debug, Clone)]
pub struct Backend {
    pub name: String,
    pub base_url: Url,
}

/// Read-only lookup table from backend name to base URL.
#[derive(Debug)]
pub struct BackendRegistry {
    backends: HashMap<String, Backend>,
}

impl BackendRegistry {
    /// Build the registry from configuration. Entries with unparseable base
    /// URLs are rejected; config validation reports them before this runs.
    pub fn from_config(configs: &[BackendConfig]) -> Result<Self, ProxyError> {
        let mut backends = HashMap::with_capacity(configs.len());
        for config in configs {
            let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
            backends.insert(
                config.name.clone(),
                Backend {
                    name: config.name.clone(),
                    base_url,
                },
            );
        }
        Ok(Self { backends })
    }

    /// Look up a backend by name.
    pub fn resolve(&self, name: &str) -> Result<&Backend, ProxyError> {
        self.backends
            .get(name)
            .ok_or_else(|| ProxyError::UnknownBackend(name.to_string()))
    }

    /// Iterate configured backends (startup logging).
    pub fn iter(&self) -> impl Iterator<Item = &Backend> {
        self.backends.values()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
