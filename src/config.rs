// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line and environment configuration of the operator.

use clap::Parser;
use std::time::Duration;

use crate::constants::{
    DEFAULT_PROVIDER_TIMEOUT_SECS, ERROR_REQUEUE_DURATION_SECS, METRICS_SERVER_PORT,
    READY_REQUEUE_DURATION_SECS,
};
use crate::context::RequeuePolicy;

/// Bastion operator configuration.
///
/// Every flag can also be set through the environment variable named next to it.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the cloud provider API gateway
    #[arg(long, env = "BASTION_PROVIDER_ENDPOINT")]
    pub provider_endpoint: String,

    /// Timeout of a single provider API call, in seconds
    #[arg(long, env = "BASTION_PROVIDER_TIMEOUT_SECS", default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS)]
    pub provider_timeout_secs: u64,

    /// Port of the metrics and health HTTP server
    #[arg(long, env = "BASTION_METRICS_PORT", default_value_t = METRICS_SERVER_PORT)]
    pub metrics_port: u16,

    /// Requeue delay after a failed reconciliation, in seconds
    #[arg(long, env = "BASTION_ERROR_REQUEUE_SECS", default_value_t = ERROR_REQUEUE_DURATION_SECS)]
    pub error_requeue_secs: u64,

    /// Re-check interval of a published bastion, in seconds
    #[arg(long, env = "BASTION_READY_REQUEUE_SECS", default_value_t = READY_REQUEUE_DURATION_SECS)]
    pub ready_requeue_secs: u64,
}

impl Config {
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    #[must_use]
    pub fn requeue_policy(&self) -> RequeuePolicy {
        RequeuePolicy {
            ready: Duration::from_secs(self.ready_requeue_secs),
            error: Duration::from_secs(self.error_requeue_secs),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
