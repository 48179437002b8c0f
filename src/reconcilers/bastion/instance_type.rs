// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Selection of the bastion instance type.

use tracing::{debug, info};

use crate::constants::{MAX_INSTANCE_CORES, MIN_INSTANCE_CORES};
use crate::errors::BastionError;
use crate::provider::CloudProvider;

/// Pick the smallest instance type available in `zone_id`.
///
/// Core counts from 1 to 2 are probed in order; the first whose availability
/// reports an `Available` type wins. When none does, the first declared
/// machine type of the cluster is used instead.
///
/// # Errors
///
/// Returns [`BastionError::MissingMachineTypes`] if nothing is available and
/// `machine_types` is empty, or [`BastionError::Provider`] if a probe fails.
pub async fn select_instance_type(
    provider: &dyn CloudProvider,
    zone_id: &str,
    cluster: &str,
    machine_types: &[String],
) -> Result<String, BastionError> {
    for cores in MIN_INSTANCE_CORES..=MAX_INSTANCE_CORES {
        let availability = provider
            .list_instance_type_availability(cores, zone_id)
            .await
            .map_err(BastionError::provider(
                "list instance type availability in",
                zone_id,
            ))?;

        if let Some(instance_type) = availability.first_available_type() {
            debug!(
                cores,
                zone = %zone_id,
                instance_type = %instance_type,
                "Instance type available"
            );
            return Ok(instance_type.to_string());
        }
    }

    let fallback = machine_types
        .first()
        .ok_or_else(|| BastionError::MissingMachineTypes {
            cluster: cluster.to_string(),
        })?;

    info!(
        instance_type = %fallback,
        zone = %zone_id,
        "Falling back to first machine type of the cluster as bastion instance type"
    );
    Ok(fallback.clone())
}

#[cfg(test)]
#[path = "instance_type_tests.rs"]
mod instance_type_tests;
