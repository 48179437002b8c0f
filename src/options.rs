// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resolution of a [`Bastion`] and its [`WorkloadCluster`] into the names and
//! parameters a reconcile pass works with.
//!
//! All provider-side names are derived deterministically from the workload's
//! infrastructure name and the bastion name, so every pass resolves the same
//! names and the ensure steps can look resources up by name.
//!
//! # Naming
//!
//! | Resource | Name |
//! |----------|------|
//! | Instance | `{base}` |
//! | Bastion security group | `{base}-sg` |
//! | Workload security group | `{cluster}-sg` |
//! | Workload network | `{cluster}-vpc` |
//!
//! where `{base}` is [`generate_base_resource_name`].

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use kube::ResourceExt;
use sha2::{Digest, Sha256};
use std::net::IpAddr;

use crate::constants::{
    MAX_BASE_NAME_LENGTH, NAME_HASH_LENGTH, NETWORK_SUFFIX, SECURITY_GROUP_SUFFIX,
};
use crate::crd::{Bastion, SecretReference, WorkloadCluster};
use crate::errors::BastionError;

/// A validated SSH source range of the bastion's allowlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngressPermission {
    /// CIDR as written in the `Bastion`
    pub cidr: String,
    /// Whether the CIDR is an IPv6 range
    pub ipv6: bool,
}

/// Resolved options of one bastion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub bastion_instance_name: String,
    pub security_group_name: String,
    /// Security group of the workload nodes the bastion may SSH into
    pub workload_security_group_name: String,
    pub network_name: String,
    pub region: String,
    pub image_id: String,
    /// Base64-encoded cloud-init payload
    pub user_data: String,
    pub ingress: Vec<IngressPermission>,
    pub secret_ref: SecretReference,
}

/// Resolve the options of `bastion` inside `cluster`.
///
/// # Errors
///
/// Returns a configuration error if a name is empty, an ingress CIDR is
/// invalid, or no image id exists for the cluster's region.
pub fn determine_options(
    bastion: &Bastion,
    cluster: &WorkloadCluster,
) -> Result<Options, BastionError> {
    let cluster_name = &cluster.spec.infrastructure_name;
    let base_name = generate_base_resource_name(cluster_name, &bastion.name_any())?;

    let user_data = BASE64.encode(bastion.spec.user_data.as_deref().unwrap_or_default());

    let ingress = bastion
        .spec
        .ingress
        .iter()
        .map(|policy| parse_ingress_cidr(&policy.ip_block.cidr))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Options {
        security_group_name: format!("{base_name}{SECURITY_GROUP_SUFFIX}"),
        bastion_instance_name: base_name,
        workload_security_group_name: format!("{cluster_name}{SECURITY_GROUP_SUFFIX}"),
        network_name: format!("{cluster_name}{NETWORK_SUFFIX}"),
        region: cluster.spec.region.clone(),
        image_id: determine_image_id(cluster)?,
        user_data,
        ingress,
        secret_ref: cluster.spec.secret_ref.clone(),
    })
}

/// Base name shared by the provider resources of one bastion.
///
/// `"{cluster}-{bastion}"` truncated to 33 characters, followed by
/// `-bastion-` and the first 5 hex characters of the SHA-256 of the full,
/// untruncated `"{cluster}-{bastion}"`.
///
/// # Example
///
/// ```rust
/// use bastion::options::generate_base_resource_name;
///
/// let name = generate_base_resource_name("shoot--prod--eu", "debug-session").unwrap();
/// assert_eq!(name, "shoot--prod--eu-debug-session-bastion-6fe46");
/// ```
///
/// # Errors
///
/// Returns [`BastionError::InvalidOptions`] if either name is empty.
pub fn generate_base_resource_name(
    cluster_name: &str,
    bastion_name: &str,
) -> Result<String, BastionError> {
    if cluster_name.is_empty() {
        return Err(BastionError::InvalidOptions(
            "cluster name can't be empty".to_string(),
        ));
    }
    if bastion_name.is_empty() {
        return Err(BastionError::InvalidOptions(
            "bastion name can't be empty".to_string(),
        ));
    }

    let static_name = format!("{cluster_name}-{bastion_name}");
    let mut hasher = Sha256::new();
    hasher.update(static_name.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    let truncated: String = static_name.chars().take(MAX_BASE_NAME_LENGTH).collect();
    let suffix = &hash[..NAME_HASH_LENGTH];
    Ok(format!("{truncated}-bastion-{suffix}"))
}

/// Validate an allowlist entry as `address/prefix` and classify it.
///
/// # Errors
///
/// Returns [`BastionError::InvalidCidr`] if the address or prefix is invalid.
pub fn parse_ingress_cidr(cidr: &str) -> Result<IngressPermission, BastionError> {
    let invalid = |reason: &str| BastionError::InvalidCidr {
        cidr: cidr.to_string(),
        reason: reason.to_string(),
    };

    let (address, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| invalid("missing prefix length"))?;
    let address: IpAddr = address
        .parse()
        .map_err(|_| invalid("invalid IP address"))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| invalid("invalid prefix length"))?;

    let max_prefix = if address.is_ipv6() { 128 } else { 32 };
    if prefix > max_prefix {
        return Err(invalid(&format!("prefix length exceeds {max_prefix}")));
    }

    Ok(IngressPermission {
        cidr: cidr.to_string(),
        ipv6: address.is_ipv6(),
    })
}

/// Image id of the bastion image in the cluster's region.
///
/// Uses `bastionImage` when set, otherwise the first machine image. An unset
/// version selects the last listed version.
///
/// # Errors
///
/// Returns [`BastionError::MachineImageNotFound`] if the image, version, or
/// region entry does not exist.
pub fn determine_image_id(cluster: &WorkloadCluster) -> Result<String, BastionError> {
    let spec = &cluster.spec;
    let (name, version) = match &spec.bastion_image {
        Some(image) => (Some(image.name.as_str()), image.version.as_deref()),
        None => (spec.machine_images.first().map(|i| i.name.as_str()), None),
    };

    let not_found = || BastionError::MachineImageNotFound {
        name: name.unwrap_or_default().to_string(),
        version: version.unwrap_or("latest").to_string(),
        region: spec.region.clone(),
    };

    let image = spec
        .machine_images
        .iter()
        .find(|image| Some(image.name.as_str()) == name)
        .ok_or_else(not_found)?;

    let image_version = match version {
        Some(version) => image.versions.iter().find(|v| v.version == version),
        None => image.versions.last(),
    }
    .ok_or_else(not_found)?;

    image_version
        .regions
        .iter()
        .find(|region| region.name == spec.region)
        .map(|region| region.image_id.clone())
        .ok_or_else(not_found)
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod options_tests;
