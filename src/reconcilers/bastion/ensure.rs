// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Idempotent ensure-exists operations for the bastion's cloud resources.
//!
//! Each operation looks its resource up by name and creates it only when
//! absent. Existing resources are returned unchanged: their attributes are
//! never reconciled in place.

use tracing::{debug, info};

use super::types::NetworkContext;
use crate::errors::BastionError;
use crate::metrics::record_provider_resource_created;
use crate::options::Options;
use crate::provider::{CloudProvider, CreateInstanceRequest};

/// Return the id of the security group `name`, creating it in `network_id`
/// if it does not exist.
///
/// # Errors
///
/// Returns [`BastionError::Provider`] if the lookup or creation fails, or
/// [`BastionError::EmptyResponse`] if the provider returns no id.
pub async fn ensure_security_group(
    provider: &dyn CloudProvider,
    name: &str,
    network_id: &str,
) -> Result<String, BastionError> {
    if let Some(existing) = provider
        .lookup_security_group(name)
        .await
        .map_err(BastionError::provider("look up security group", name))?
    {
        debug!(
            security_group = %name,
            id = %existing.security_group_id,
            "Security group found"
        );
        return Ok(existing.security_group_id);
    }

    info!(security_group = %name, network = %network_id, "Creating security group");
    let created = provider
        .create_security_group(network_id, name)
        .await
        .map_err(BastionError::provider("create security group", name))?;

    if created.security_group_id.is_empty() {
        return Err(BastionError::EmptyResponse {
            operation: "create security group",
            resource: name.to_string(),
        });
    }

    record_provider_resource_created("security_group");
    Ok(created.security_group_id)
}

/// Return the id of the bastion instance, launching it if it does not exist.
///
/// The instance is not awaited: readiness is checked separately.
///
/// # Errors
///
/// Returns [`BastionError::Provider`] if the lookup or creation fails, or
/// [`BastionError::EmptyResponse`] if the provider returns no id.
pub async fn ensure_compute_instance(
    provider: &dyn CloudProvider,
    options: &Options,
    security_group_id: &str,
    network: &NetworkContext,
    instance_type: &str,
) -> Result<String, BastionError> {
    let name = &options.bastion_instance_name;

    if let Some(existing) = provider
        .lookup_instance(name)
        .await
        .map_err(BastionError::provider("look up instance", name))?
    {
        debug!(
            instance = %name,
            id = %existing.instance_id,
            status = %existing.status,
            "Instance found"
        );
        return Ok(existing.instance_id);
    }

    info!(
        instance = %name,
        instance_type = %instance_type,
        zone = %network.zone_id,
        "Creating bastion compute instance"
    );

    let request = CreateInstanceRequest {
        instance_name: name.clone(),
        security_group_id: security_group_id.to_string(),
        image_id: options.image_id.clone(),
        subnet_id: network.subnet_id.clone(),
        zone_id: network.zone_id.clone(),
        instance_type: instance_type.to_string(),
        user_data: options.user_data.clone(),
    };

    let created = provider
        .create_instance(&request)
        .await
        .map_err(BastionError::provider("create instance", name))?;

    if created.instance_id.is_empty() {
        return Err(BastionError::EmptyResponse {
            operation: "create instance",
            resource: name.clone(),
        });
    }

    record_provider_resource_created("instance");
    Ok(created.instance_id)
}

#[cfg(test)]
#[path = "ensure_tests.rs"]
mod ensure_tests;
