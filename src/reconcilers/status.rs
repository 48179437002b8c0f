// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Publication of the bastion endpoint into `Bastion.status`.
//!
//! Only `status.ingress` and `status.observedGeneration` are written, with a
//! JSON merge patch; other status fields are left untouched. The patch is
//! skipped when neither value would change, so publishing does not retrigger
//! the controller.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::LoadBalancerIngress;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::{json, Value};
use tracing::debug;

use super::status_changed;
use crate::constants::FIELD_MANAGER;
use crate::crd::Bastion;
use crate::errors::BastionError;

/// Sink for the public endpoint of a bastion.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Publish the public endpoint of the bastion.
    ///
    /// # Errors
    ///
    /// Returns [`BastionError::Kube`] if the status cannot be written.
    async fn publish(&self, public: Option<&LoadBalancerIngress>) -> Result<(), BastionError>;
}

/// Build the merge patch for a bastion status.
#[must_use]
pub fn status_patch(ingress: Option<&LoadBalancerIngress>, generation: Option<i64>) -> Value {
    json!({
        "status": {
            "ingress": ingress,
            "observedGeneration": generation,
        }
    })
}

/// Writes the endpoint to the `Bastion` status subresource.
pub struct KubeStatusPublisher {
    client: Client,
    namespace: String,
    name: String,
    current_ingress: Option<LoadBalancerIngress>,
    current_generation: Option<i64>,
    generation: Option<i64>,
}

impl KubeStatusPublisher {
    /// Create a publisher for `bastion`, remembering its current status.
    #[must_use]
    pub fn new(client: Client, bastion: &Bastion) -> Self {
        let status = bastion.status.as_ref();
        Self {
            client,
            namespace: bastion.namespace().unwrap_or_default(),
            name: bastion.name_any(),
            current_ingress: status.and_then(|s| s.ingress.clone()),
            current_generation: status.and_then(|s| s.observed_generation),
            generation: bastion.metadata.generation,
        }
    }

    /// Whether publishing `ingress` would change the stored status.
    #[must_use]
    pub fn needs_update(&self, ingress: Option<&LoadBalancerIngress>) -> bool {
        status_changed(&self.current_ingress.as_ref(), &ingress)
            || status_changed(&self.current_generation, &self.generation)
    }
}

#[async_trait]
impl StatusPublisher for KubeStatusPublisher {
    async fn publish(&self, public: Option<&LoadBalancerIngress>) -> Result<(), BastionError> {
        if !self.needs_update(public) {
            debug!(
                "Bastion {}/{} status unchanged, skipping update",
                self.namespace, self.name
            );
            return Ok(());
        }

        let api: Api<Bastion> = Api::namespaced(self.client.clone(), &self.namespace);
        let patch = status_patch(public, self.generation);
        let params = PatchParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..PatchParams::default()
        };

        api.patch_status(&self.name, &params, &Patch::Merge(&patch))
            .await
            .map_err(|source| BastionError::Kube {
                operation: "patch bastion status",
                source,
            })?;

        debug!(
            "Updated Bastion {}/{} status ingress: {:?}",
            self.namespace, self.name, public
        );

        Ok(())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
