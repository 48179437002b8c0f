// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `Bastion` reconciliation logic.
//!
//! One pass converges the cloud resources of a bastion towards its spec:
//!
//! 1. Resolve the workload network, subnet, and zone
//! 2. Select an instance type
//! 3. Ensure the bastion security group and compute instance exist
//! 4. Wait for the instance to run
//! 5. Reconcile the security group rules
//! 6. Allocate the public address and wait for both endpoints
//! 7. Publish the public endpoint in `status.ingress`
//!
//! Steps run strictly in order. A step that is not ready yet ends the pass
//! with [`ReconcileOutcome::Retry`]; a failing step ends it with an error.
//! Side effects of earlier steps are kept: every step looks its resource up
//! first, so the next pass resumes where this one stopped.
//!
//! ## Module Structure
//!
//! - [`endpoints`] - Endpoint pair and readiness predicate
//! - [`ensure`] - Create-if-absent of the security group and instance
//! - [`instance_type`] - Instance type selection
//! - [`network`] - Network context resolution
//! - [`readiness`] - Instance and endpoint readiness probes
//! - [`rules`] - Security group rule diffing and application
//! - [`types`] - Pass input and outcome types

pub mod endpoints;
pub mod ensure;
pub mod instance_type;
pub mod network;
pub mod readiness;
pub mod rules;
pub mod types;

pub use endpoints::{address_to_ingress, ingress_ready, BastionEndpoints};
pub use readiness::Readiness;
pub use types::{NetworkContext, ReconcileOutcome, ReconcileRequest, RetryAfter};

use kube::{Api, ResourceExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::context::Context;
use crate::credentials::read_credentials;
use crate::crd::{Bastion, WorkloadCluster};
use crate::errors::BastionError;
use crate::options::determine_options;
use crate::provider::CloudProvider;
use crate::reconcilers::status::{KubeStatusPublisher, StatusPublisher};

use ensure::{ensure_compute_instance, ensure_security_group};
use instance_type::select_instance_type;
use network::resolve_network_context;
use readiness::{check_instance_ready, resolve_endpoints};
use rules::reconcile_security_group_rules;

/// Run one reconcile pass against `provider`.
///
/// # Errors
///
/// Returns the first [`BastionError`] raised by a step. Resources created
/// before the failure are left in place.
pub async fn reconcile_pass(
    provider: &dyn CloudProvider,
    publisher: &dyn StatusPublisher,
    request: &ReconcileRequest,
) -> Result<ReconcileOutcome, BastionError> {
    let options = &request.options;

    let network = resolve_network_context(provider, &options.network_name).await?;

    let instance_type = select_instance_type(
        provider,
        &network.zone_id,
        &request.cluster,
        &request.machine_types,
    )
    .await?;

    let security_group_id =
        ensure_security_group(provider, &options.security_group_name, &network.vpc_id).await?;

    let instance_id = ensure_compute_instance(
        provider,
        options,
        &security_group_id,
        &network,
        &instance_type,
    )
    .await?;

    let instance = match check_instance_ready(provider, &options.bastion_instance_name).await? {
        Readiness::Ready(instance) => instance,
        Readiness::NotReady(retry) => {
            debug!(bastion = %request.bastion, %retry, "Bastion not ready");
            return Ok(ReconcileOutcome::Retry(retry));
        }
    };

    reconcile_security_group_rules(provider, options, &security_group_id, &instance).await?;

    let public_address = provider
        .allocate_public_address(&instance_id)
        .await
        .map_err(BastionError::provider("allocate public address for", &instance_id))?;

    let endpoints = match resolve_endpoints(
        provider,
        &options.bastion_instance_name,
        &public_address.ip_address,
    )
    .await?
    {
        Readiness::Ready(endpoints) => endpoints,
        Readiness::NotReady(retry) => {
            debug!(bastion = %request.bastion, %retry, "Bastion endpoints not ready");
            return Ok(ReconcileOutcome::Retry(retry));
        }
    };

    publisher.publish(endpoints.public.as_ref()).await?;

    info!(
        bastion = %request.bastion,
        instance = %options.bastion_instance_name,
        public_ip = %public_address.ip_address,
        "Bastion ready"
    );

    Ok(ReconcileOutcome::Ready(endpoints))
}

/// Reconciles a `Bastion` resource.
///
/// Reads the referenced `WorkloadCluster` and the provider credentials,
/// builds a provider for the cluster's region, and runs one
/// [`reconcile_pass`] that publishes into the bastion's status.
///
/// # Errors
///
/// Returns [`BastionError::Kube`] if the cluster or credentials cannot be
/// read, a configuration error if the bastion cannot be resolved to valid
/// options, or any error of the pass itself.
pub async fn reconcile_bastion(
    ctx: Arc<Context>,
    bastion: Arc<Bastion>,
) -> Result<ReconcileOutcome, BastionError> {
    let namespace = bastion.namespace().unwrap_or_default();
    let name = bastion.name_any();

    info!("Reconciling Bastion: {}/{}", namespace, name);
    debug!(
        namespace = %namespace,
        name = %name,
        generation = ?bastion.metadata.generation,
        cluster = %bastion.spec.cluster_ref,
        "Starting Bastion reconciliation"
    );

    let clusters: Api<WorkloadCluster> = Api::all(ctx.client.clone());
    let cluster = clusters
        .get_opt(&bastion.spec.cluster_ref)
        .await
        .map_err(|source| BastionError::Kube {
            operation: "get workload cluster",
            source,
        })?
        .ok_or_else(|| {
            BastionError::InvalidOptions(format!(
                "workload cluster '{}' not found",
                bastion.spec.cluster_ref
            ))
        })?;

    let options = determine_options(&bastion, &cluster)?;
    let credentials = read_credentials(&ctx.client, &options.secret_ref).await?;
    let provider = ctx
        .provider_factory
        .new_provider(&options.region, &credentials)
        .map_err(BastionError::provider(
            "create provider client for region",
            &options.region,
        ))?;

    let request = ReconcileRequest {
        bastion: format!("{namespace}/{name}"),
        cluster: cluster.name_any(),
        options,
        machine_types: cluster
            .spec
            .machine_types
            .iter()
            .map(|machine_type| machine_type.name.clone())
            .collect(),
    };

    let publisher = KubeStatusPublisher::new(ctx.client.clone(), &bastion);
    reconcile_pass(provider.as_ref(), &publisher, &request).await
}
