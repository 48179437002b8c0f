// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context passed to the bastion controller.

use kube::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{ERROR_REQUEUE_DURATION_SECS, READY_REQUEUE_DURATION_SECS};
use crate::provider::ProviderFactory;

/// Shared context passed to every reconciliation.
///
/// Provider handles are not kept here: each pass builds one from the region
/// and credentials of its `WorkloadCluster` through [`Context::provider_factory`].
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client for API operations
    pub client: Client,

    /// Builds cloud provider handles for a region and credentials
    pub provider_factory: Arc<dyn ProviderFactory>,

    /// Requeue intervals of the controller
    pub requeue: RequeuePolicy,
}

/// How long the controller waits before looking at a bastion again.
///
/// Not-ready retries carry their own delay and are not covered here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequeuePolicy {
    /// Periodic re-check of a published bastion
    pub ready: Duration,
    /// Delay after a failed reconciliation
    pub error: Duration,
}

impl Default for RequeuePolicy {
    fn default() -> Self {
        Self {
            ready: Duration::from_secs(READY_REQUEUE_DURATION_SECS),
            error: Duration::from_secs(ERROR_REQUEUE_DURATION_SECS),
        }
    }
}
