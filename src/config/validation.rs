//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: bind address parses,
//! backend names are unique and non-empty, base URLs are absolute http(s)
//! URLs. All errors are collected and reported together.

use std::collections::HashSet;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    EmptyBackendName,
    DuplicateBackendName(String),
    InvalidBaseUrl { name: String, url: String },
    NoBackends,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::EmptyBackendName => write!(f, "backend with empty name"),
            ValidationError::DuplicateBackendName(name) => {
                write!(f, "duplicate backend name: {}", name)
            }
            ValidationError::InvalidBaseUrl { name, url } => {
                write!(f, "backend {} has invalid base URL: {}", name, url)
            }
            ValidationError::NoBackends => write!(f, "no backends configured"),
        }
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    let mut seen = HashSet::new();
    for backend in &config.backends {
        if backend.name.is_empty() {
            errors.push(ValidationError::EmptyBackendName);
        } else if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackendName(backend.name.clone()));
        }

        let ok = matches!(
            Url::parse(&backend.base_url),
            Ok(u) if u.scheme() == "http" || u.scheme() == "https"
        );
        if !ok {
            errors.push(ValidationError::InvalidBaseUrl {
                name: backend.name.clone(),
                url: backend.base_url.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
