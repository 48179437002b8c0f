// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for bastion reconciliation.
//!
//! This module separates two layers:
//! - [`ProviderError`] - failures talking to the cloud provider API
//! - [`BastionError`] - the reconciliation taxonomy surfaced to the controller
//!
//! "Not ready yet" is deliberately absent from both: it is a
//! [`crate::reconcilers::bastion::ReconcileOutcome::Retry`] value, not an error.

use thiserror::Error;

/// Errors returned by a [`crate::provider::CloudProvider`] binding.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider API answered with a non-success status code
    #[error("provider API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error body returned by the API
        message: String,
    },

    /// The request could not be sent or the response could not be read
    #[error("failed to reach provider API: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built from the configured endpoint
    #[error("invalid provider endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors that terminate a bastion reconcile pass.
///
/// Every variant names the resource it concerns so the operator can act on the
/// message without re-running the controller in a debugger.
#[derive(Error, Debug)]
pub enum BastionError {
    /// The bastion or its cluster reference cannot produce valid options
    #[error("invalid bastion options: {0}")]
    InvalidOptions(String),

    /// An ingress allowlist entry is not a valid CIDR
    #[error("invalid ingress CIDR '{cidr}': {reason}")]
    InvalidCidr {
        /// The offending CIDR
        cidr: String,
        /// Why it was rejected
        reason: String,
    },

    /// No machine type is declared to fall back to
    #[error(
        "failed to determine bastion instance type: no machine types declared for cluster '{cluster}'"
    )]
    MissingMachineTypes {
        /// Workload cluster name
        cluster: String,
    },

    /// The configured machine image has no id for the region
    #[error("machine image '{name}' version '{version}' has no image id for region '{region}'")]
    MachineImageNotFound {
        name: String,
        version: String,
        region: String,
    },

    /// The workload network does not exist
    #[error("network '{name}' not found")]
    NetworkNotFound {
        /// Network name
        name: String,
    },

    /// The subnet of the workload network does not exist
    #[error("subnet '{id}' not found")]
    SubnetNotFound {
        /// Subnet id
        id: String,
    },

    /// The workload's security group must exist before a bastion can reach it
    #[error("workload security group '{name}' not found")]
    WorkloadSecurityGroupNotFound {
        /// Security group name
        name: String,
    },

    /// The bastion instance was expected to exist in this pass
    #[error("bastion instance '{name}' not found")]
    InstanceNotFound {
        /// Instance name
        name: String,
    },

    /// The bastion instance left the Running state within a pass
    #[error("bastion instance '{name}' is not running (status: {status})")]
    InstanceNotRunning {
        /// Instance name
        name: String,
        /// Observed status
        status: String,
    },

    /// A running bastion instance reports no private address
    #[error("bastion instance '{name}' does not have a private ip")]
    MissingPrivateIp {
        /// Instance name
        name: String,
    },

    /// The provider returned a nil/empty payload where data was required
    #[error("empty response from provider for {operation} of '{resource}'")]
    EmptyResponse {
        /// Operation that returned nothing
        operation: &'static str,
        /// Resource the operation acted upon
        resource: String,
    },

    /// Provider credentials are missing or malformed
    #[error("invalid provider credentials: {0}")]
    Credentials(String),

    /// A provider call failed
    #[error("failed to {operation} '{resource}': {source}")]
    Provider {
        /// Operation being performed (e.g., "create security group")
        operation: &'static str,
        /// Resource acted upon
        resource: String,
        #[source]
        source: ProviderError,
    },

    /// Creating or revoking a single security rule failed
    #[error("failed to {action} security group {direction} rule '{description}': {source}")]
    Rule {
        /// "add" or "delete"
        action: &'static str,
        /// "ingress" or "egress"
        direction: &'static str,
        /// Description of the failing rule
        description: String,
        #[source]
        source: ProviderError,
    },

    /// A Kubernetes API call failed
    #[error("Kubernetes API error during {operation}: {source}")]
    Kube {
        /// Operation being performed (e.g., "patch bastion status")
        operation: &'static str,
        #[source]
        source: kube::Error,
    },
}

impl BastionError {
    /// Wrap a provider error with the operation and resource it concerns.
    pub fn provider(
        operation: &'static str,
        resource: impl Into<String>,
    ) -> impl FnOnce(ProviderError) -> Self {
        let resource = resource.into();
        move |source| Self::Provider {
            operation,
            resource,
            source,
        }
    }

    /// Returns true for errors an operator has to fix in configuration or
    /// in the workload's own infrastructure; re-running the pass will not help.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOptions(_)
                | Self::InvalidCidr { .. }
                | Self::MissingMachineTypes { .. }
                | Self::MachineImageNotFound { .. }
                | Self::NetworkNotFound { .. }
                | Self::SubnetNotFound { .. }
                | Self::WorkloadSecurityGroupNotFound { .. }
                | Self::MissingPrivateIp { .. }
                | Self::EmptyResponse { .. }
                | Self::Credentials(_)
        )
    }

    /// Short, metrics-safe label of the error category.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider { .. } | Self::Rule { .. } => "provider_error",
            Self::Kube { .. } => "kube_error",
            Self::InstanceNotFound { .. } | Self::InstanceNotRunning { .. } => "state_error",
            _ => "configuration_error",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
