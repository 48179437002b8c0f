// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP server exposing Prometheus metrics and a liveness probe.

use anyhow::{Context as _, Result};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::constants::{HEALTH_SERVER_PATH, METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PATH};
use crate::metrics::gather_metrics;

async fn metrics_handler() -> impl IntoResponse {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Routes of the metrics server.
pub fn router() -> Router {
    Router::new()
        .route(METRICS_SERVER_PATH, get(metrics_handler))
        .route(HEALTH_SERVER_PATH, get(health_handler))
}

/// Serve [`router`] on an already bound listener until it fails.
///
/// # Errors
///
/// Returns an error if the server stops on an I/O failure.
pub async fn serve(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router())
        .await
        .context("metrics server failed")
}

/// Bind the metrics server on `port` and serve it.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn run_metrics_server(port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{METRICS_SERVER_BIND_ADDRESS}:{port}")
        .parse()
        .context("invalid metrics bind address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics server to {addr}"))?;

    info!("Metrics server listening on {}", addr);
    serve(listener).await
}

#[cfg(test)]
#[path = "metrics_server_tests.rs"]
mod metrics_server_tests;
