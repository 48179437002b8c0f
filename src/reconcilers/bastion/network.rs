// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resolution of the workload network the bastion is placed in.

use tracing::debug;

use super::types::NetworkContext;
use crate::errors::BastionError;
use crate::provider::CloudProvider;

/// Resolve network, subnet, and zone from the workload network name.
///
/// # Errors
///
/// Returns [`BastionError::NetworkNotFound`] or [`BastionError::SubnetNotFound`]
/// if the workload network is not provisioned, or [`BastionError::Provider`] if
/// a lookup fails.
pub async fn resolve_network_context(
    provider: &dyn CloudProvider,
    network_name: &str,
) -> Result<NetworkContext, BastionError> {
    let network = provider
        .lookup_network(network_name)
        .await
        .map_err(BastionError::provider("look up network", network_name))?
        .ok_or_else(|| BastionError::NetworkNotFound {
            name: network_name.to_string(),
        })?;

    let subnet = provider
        .lookup_subnet(&network.subnet_id)
        .await
        .map_err(BastionError::provider("look up subnet", &network.subnet_id))?
        .ok_or_else(|| BastionError::SubnetNotFound {
            id: network.subnet_id.clone(),
        })?;

    debug!(
        network = %network_name,
        vpc_id = %network.vpc_id,
        subnet_id = %subnet.subnet_id,
        zone_id = %subnet.zone_id,
        "Resolved network context"
    );

    Ok(NetworkContext {
        vpc_id: network.vpc_id,
        subnet_id: subnet.subnet_id,
        zone_id: subnet.zone_id,
    })
}

#[cfg(test)]
#[path = "network_tests.rs"]
mod network_tests;
