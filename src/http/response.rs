//! Response handling toward the client.
//!
//! # Responsibilities
//! - Copy the upstream status code verbatim
//! - Copy upstream headers, preserving multi-value order
//! - Stream the upstream body through without buffering it
//!
//! # Design Decisions
//! - The body is forwarded chunk by chunk: memory per request is bounded by
//!   the transfer buffer, not the payload size
//! - Hop-by-hop headers are stripped on this leg too; the client-facing
//!   framing is derived from the streamed body, not the upstream's
//! - Dropping the stream (client gone, copy error) releases the upstream
//!   connection on every exit path

use axum::body::Body;
use axum::http::Response;

use crate::http::upstream::hop_by_hop_headers;

/// Convert the upstream response into the client-facing one.
pub fn into_client_response(upstream: reqwest::Response) -> Response<Body> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in hop_by_hop_headers() {
        headers.remove(&name);
    }

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
