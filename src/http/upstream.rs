//! Outbound request construction and execution.
//!
//! # Responsibilities
//! - Compose the target URL (base + remainder, raw query attached verbatim)
//! - Copy inbound headers through an explicit deny-list policy
//! - Inject X-Forwarded-For / X-Forwarded-Host (configurable)
//! - Execute exactly one attempt over a shared, pooled client
//!
//! # Design Decisions
//! - Hop-by-hop headers and Host never cross the proxy leg; the deny list
//!   also honors tokens named in the inbound Connection header
//! - Content-Length is stripped: the outbound framing is derived from the
//!   body actually attached, never from a copied header
//! - The upstream timeout bounds time-to-response-headers only, so long
//!   response streams are not cut off mid-body
//! - No retry, no backoff: a network failure is terminal for the request

use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::Method;
use url::Url;

use crate::config::{HeaderConfig, TimeoutConfig};
use crate::error::ProxyError;
use crate::routing::Backend;

const KEEP_ALIVE: HeaderName = HeaderName::from_static("keep-alive");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Headers meaningful only for a single connection leg. Stripped on both
/// the request and the response side.
pub(crate) fn hop_by_hop_headers() -> [HeaderName; 8] {
    [
        CONNECTION,
        KEEP_ALIVE,
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        UPGRADE,
    ]
}

/// Compose the absolute target URL: `base_url + "/" + remainder`, with the
/// original query string attached unchanged (not re-parsed or re-encoded).
pub fn build_target_url(
    backend: &Backend,
    remainder: &str,
    raw_query: Option<&str>,
) -> Result<Url, ProxyError> {
    let base = backend.base_url.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{}/{}", base, remainder))?;
    url.set_query(raw_query);
    Ok(url)
}

/// Allow/deny policy applied to inbound headers before forwarding.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    deny: HashSet<HeaderName>,
    forwarded: bool,
}

impl HeaderPolicy {
    pub fn from_config(config: &HeaderConfig) -> Self {
        let mut deny: HashSet<HeaderName> = hop_by_hop_headers().into_iter().collect();
        deny.insert(HOST);
        deny.insert(CONTENT_LENGTH);

        for name in &config.deny {
            match name.parse::<HeaderName>() {
                Ok(name) => {
                    deny.insert(name);
                }
                Err(_) => {
                    tracing::warn!(header = %name, "Ignoring invalid header name in deny list");
                }
            }
        }

        Self {
            deny,
            forwarded: config.forwarded,
        }
    }

    /// Copy `inbound` into a fresh map, preserving per-key multiplicity and
    /// order, minus the deny list and any token the inbound Connection
    /// header names. Optionally injects X-Forwarded-For / X-Forwarded-Host,
    /// replacing inbound values rather than trusting them.
    pub fn outbound_headers(&self, inbound: &HeaderMap, client_ip: IpAddr) -> HeaderMap {
        let connection_scoped = connection_tokens(inbound);

        // iter() repeats the name for each value, preserving insertion order
        let mut outbound = HeaderMap::with_capacity(inbound.len());
        for (name, value) in inbound.iter() {
            if self.deny.contains(name) || connection_scoped.contains(name.as_str()) {
                continue;
            }
            outbound.append(name.clone(), value.clone());
        }

        if self.forwarded {
            if let Ok(value) = HeaderValue::from_str(&client_ip.to_string()) {
                outbound.insert(X_FORWARDED_FOR, value);
            }
            match inbound.get(HOST) {
                Some(host) => {
                    outbound.insert(X_FORWARDED_HOST, host.clone());
                }
                None => {
                    outbound.remove(X_FORWARDED_HOST);
                }
            }
        }

        outbound
    }
}

/// Tokens listed in the inbound Connection header (lowercased).
fn connection_tokens(headers: &HeaderMap) -> HashSet<String> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// One-attempt executor over a shared, connection-pooling client.
///
/// Cloning is cheap (the inner client is an `Arc`); one instance serves all
/// requests so connections to each backend are reused.
#[derive(Debug, Clone)]
pub struct Relay {
    client: reqwest::Client,
    upstream_timeout: Duration,
}

impl Relay {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ProxyError::RequestConstruction(e.to_string()))?;

        Ok(Self {
            client,
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// Build and execute the outbound request. The body stream is consumed
    /// here, once; there is no retry on any outcome.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: reqwest::Body,
    ) -> Result<reqwest::Response, ProxyError> {
        let request = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .build()
            .map_err(|e| ProxyError::RequestConstruction(e.to_string()))?;

        let response = tokio::time::timeout(self.upstream_timeout, self.client.execute(request))
            .await
            .map_err(|_| {
                ProxyError::UpstreamUnreachable(
                    format!(
                        "no response headers within {}s",
                        self.upstream_timeout.as_secs()
                    )
                    .into(),
                )
            })?
            .map_err(|e| ProxyError::UpstreamUnreachable(Box::new(e)))?;

        Ok(response)
    }
}
