//! HTTP server setup and the relay handler.
//!
//! # Responsibilities
//! - Create the Axum router (one catch-all route, any method)
//! - Wire up middleware (request ID, tracing)
//! - Dispatch each request through routing → upstream → response
//! - Log every resolved request with method, path, target, and status
//!
//! # Concurrency
//! Each inbound request runs as its own task. The only shared state is the
//! immutable [`BackendRegistry`] and the pooled [`Relay`] client, both
//! lock-free. If the client disconnects, the handler future is dropped,
//! which aborts the in-flight upstream request and releases its connection.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::header::{HeaderMap, CONTENT_LENGTH, TRANSFER_ENCODING},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::response::into_client_response;
use crate::http::upstream::{build_target_url, HeaderPolicy, Relay};
use crate::routing::{parse_target, BackendRegistry};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<BackendRegistry>,
    relay: Relay,
    policy: Arc<HeaderPolicy>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let registry = Arc::new(BackendRegistry::from_config(&config.backends)?);
        for backend in registry.iter() {
            tracing::info!(
                backend = %backend.name,
                base_url = %backend.base_url,
                "Configured backend"
            );
        }

        let state = AppState {
            registry,
            relay: Relay::new(&config.timeouts)?,
            policy: Arc::new(HeaderPolicy::from_config(&config.headers)),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http()),
            )
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutdown signal received");
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown triggered");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main relay handler: Router → registry → RequestBuilder → Relay →
/// ResponseWriter, all within this one invocation.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match relay_request(&state, addr, request).await {
        Ok((target, response)) => {
            tracing::info!(
                method = %method,
                path = %path,
                target = %target,
                status = response.status().as_u16(),
                "Relayed request"
            );
            response
        }
        Err(err) => {
            let status = err.status();
            tracing::warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                error = %err,
                "Request failed"
            );
            err.into_response()
        }
    }
}

/// Resolve, rebuild, and execute one request. The inbound body stream is
/// attached unread and consumed exactly once, by the relay; no outbound
/// call is made unless the target fully resolves.
async fn relay_request(
    state: &AppState,
    addr: SocketAddr,
    request: Request<Body>,
) -> Result<(Url, Response<Body>), ProxyError> {
    let (parts, body) = request.into_parts();

    let target = parse_target(parts.uri.path())?;
    let backend = state.registry.resolve(&target.backend)?;
    let url = build_target_url(backend, &target.remainder, parts.uri.query())?;

    let headers = state.policy.outbound_headers(&parts.headers, addr.ip());
    let body = if has_inbound_body(&parts.headers) {
        reqwest::Body::wrap_stream(body.into_data_stream())
    } else {
        // Fixed-length empty body keeps bodyless methods from going chunked.
        reqwest::Body::from(Vec::new())
    };

    let upstream = state
        .relay
        .execute(parts.method, url.clone(), headers, body)
        .await?;

    Ok((url, into_client_response(upstream)))
}

/// Whether the inbound request actually carries a body, judged by its
/// framing headers.
fn has_inbound_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(TRANSFER_ENCODING) {
        return true;
    }
    match headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok()) {
        Some(len) => len.trim() != "0",
        None => false,
    }
}
