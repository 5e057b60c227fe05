//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Response, StatusCode},
    routing::any,
    Router,
};
use tokio::net::TcpListener;

use api_relay::config::{BackendConfig, ProxyConfig};
use api_relay::http::HttpServer;
use api_relay::lifecycle::Shutdown;

/// One request as seen by a mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Canned response a mock backend serves for every request.
#[derive(Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: b"ok".to_vec(),
            delay: None,
        }
    }
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    response: MockResponse,
}

/// Handle to a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock backend on an ephemeral port that records every request and
/// answers with the given canned response.
pub async fn start_mock_backend(response: MockResponse) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        response,
    };

    let app = Router::new()
        .route("/{*path}", any(record_handler))
        .route("/", any(record_handler))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, requests }
}

async fn record_handler(
    State(state): State<MockState>,
    request: Request<Body>,
) -> Response<Body> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, 64 * 1024 * 1024)
        .await
        .unwrap_or_default();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body: bytes.to_vec(),
    });

    if let Some(delay) = state.response.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::new(Body::from(state.response.body.clone()));
    *response.status_mut() = state.response.status;
    for (name, value) in state.response.headers.iter() {
        response.headers_mut().append(name.clone(), value.clone());
    }
    response
}

/// Start the relay on an ephemeral port with the given backend table.
/// The returned `Shutdown` stops the server when triggered.
pub async fn start_relay(backends: &[(&str, String)]) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.backends = backends
        .iter()
        .map(|(name, base_url)| BackendConfig {
            name: (*name).to_string(),
            base_url: base_url.clone(),
        })
        .collect();
    config.timeouts.upstream_secs = 2;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config).unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
