// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Readiness probes of the bastion instance and its endpoints.
//!
//! "Not ready yet" is reported as [`Readiness::NotReady`], never as an error.
//! Errors are reserved for state that should not occur at that point of the
//! pass, like an instance that vanished after it was ensured.

use std::time::Duration;
use tracing::debug;

use super::endpoints::{address_to_ingress, BastionEndpoints};
use super::types::RetryAfter;
use crate::constants::{
    ENDPOINTS_NOT_READY_REQUEUE_SECS, INSTANCE_NOT_READY_REQUEUE_SECS, REASON_ENDPOINTS_NOT_READY,
    REASON_INSTANCE_NOT_READY,
};
use crate::errors::BastionError;
use crate::provider::{CloudProvider, Instance};

/// Result of a readiness probe.
#[derive(Clone, Debug, PartialEq)]
pub enum Readiness<T> {
    Ready(T),
    NotReady(RetryAfter),
}

/// Check that the bastion instance is running.
///
/// # Errors
///
/// Returns [`BastionError::InstanceNotFound`] if the instance does not exist,
/// or [`BastionError::Provider`] if the lookup fails.
pub async fn check_instance_ready(
    provider: &dyn CloudProvider,
    name: &str,
) -> Result<Readiness<Instance>, BastionError> {
    let instance = provider
        .lookup_instance(name)
        .await
        .map_err(BastionError::provider("look up instance", name))?
        .ok_or_else(|| BastionError::InstanceNotFound {
            name: name.to_string(),
        })?;

    if !instance.is_running() {
        debug!(instance = %name, status = %instance.status, "Instance not running yet");
        return Ok(Readiness::NotReady(RetryAfter::new(
            Duration::from_secs(INSTANCE_NOT_READY_REQUEUE_SECS),
            REASON_INSTANCE_NOT_READY,
            "bastion instance not ready yet",
        )));
    }

    Ok(Readiness::Ready(instance))
}

/// Pair the instance's private address with the allocated public address.
///
/// # Errors
///
/// Returns [`BastionError::InstanceNotFound`] or
/// [`BastionError::InstanceNotRunning`] if the instance regressed since the
/// readiness check, or [`BastionError::Provider`] if the lookup fails.
pub async fn resolve_endpoints(
    provider: &dyn CloudProvider,
    name: &str,
    public_ip: &str,
) -> Result<Readiness<BastionEndpoints>, BastionError> {
    let instance = provider
        .lookup_instance(name)
        .await
        .map_err(BastionError::provider("look up instance", name))?
        .ok_or_else(|| BastionError::InstanceNotFound {
            name: name.to_string(),
        })?;

    if !instance.is_running() {
        return Err(BastionError::InstanceNotRunning {
            name: name.to_string(),
            status: instance.status.to_string(),
        });
    }

    let endpoints = BastionEndpoints {
        private: address_to_ingress(None, instance.private_ip()),
        public: address_to_ingress(None, Some(public_ip)),
    };

    if !endpoints.ready() {
        debug!(instance = %name, ?endpoints, "Endpoints not populated yet");
        return Ok(Readiness::NotReady(RetryAfter::new(
            Duration::from_secs(ENDPOINTS_NOT_READY_REQUEUE_SECS),
            REASON_ENDPOINTS_NOT_READY,
            "bastion instance has no public/private endpoints yet",
        )));
    }

    Ok(Readiness::Ready(endpoints))
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod readiness_tests;
