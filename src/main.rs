// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use bastion::{
    bastion_controller::run_bastion_controller, config::Config, constants::TOKIO_WORKER_THREADS,
    context::Context, metrics_server::run_metrics_server, provider::http::HttpProviderFactory,
};
use clap::Parser;
use kube::Client;
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let config = Config::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("bastion-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<()> {
    // Respects RUST_LOG if set, otherwise defaults to INFO level.
    // RUST_LOG_FORMAT=json switches to JSON output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting Bastion Controller");
    debug!(?config, "Configuration loaded");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let provider_factory =
        HttpProviderFactory::new(&config.provider_endpoint, config.provider_timeout())?;
    info!(endpoint = %config.provider_endpoint, "Cloud provider gateway configured");

    let context = Arc::new(Context {
        client,
        provider_factory: Arc::new(provider_factory),
        requeue: config.requeue_policy(),
    });

    // Neither task should ever exit - if one does, log it and exit the main process
    tokio::select! {
        result = run_bastion_controller(context) => {
            error!("CRITICAL: Bastion controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Bastion controller exited unexpectedly without error")
        }
        result = run_metrics_server(config.metrics_port) => {
            error!("CRITICAL: Metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
    }
}
