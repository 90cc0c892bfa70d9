//! Access logging middleware.
//!
//! Outermost layer: records every request, including decoy hits and
//! rejected credentials. It never touches the response.

use std::{net::SocketAddr, time::Instant};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Peer address recorded by the server for this connection, or `"unknown"`.
pub(crate) fn remote_addr(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_owned(), |ConnectInfo(addr)| addr.to_string())
}

/// Log method, path, remote address, status and latency of every request.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let remote = remote_addr(&request);
    let span = tracing::info_span!("request", id = %Uuid::new_v4());

    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(
            %method,
            %path,
            %remote,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "request handled"
        );
    });
    response
}
