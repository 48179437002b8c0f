// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for bastion management.
//!
//! This module defines the Kubernetes Custom Resource Definitions used by the
//! operator to open temporary SSH ingress into a workload network.
//!
//! # Resource Types
//!
//! - [`Bastion`] - A short-lived SSH jump host and its ingress allowlist
//! - [`WorkloadCluster`] - Cloud metadata of the network a bastion is opened into
//!
//! # Example: Requesting a Bastion
//!
//! ```rust,no_run
//! use bastion::crd::{BastionIngressPolicy, BastionSpec, IpBlock};
//!
//! let spec = BastionSpec {
//!     cluster_ref: "prod-eu".to_string(),
//!     user_data: Some("#!/bin/bash\necho hello".to_string()),
//!     ingress: vec![BastionIngressPolicy {
//!         ip_block: IpBlock {
//!             cidr: "203.0.113.0/24".to_string(),
//!         },
//!     }],
//! };
//! ```

use k8s_openapi::api::core::v1::LoadBalancerIngress;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CIDR block allowed to reach the bastion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IpBlock {
    /// CIDR notation of the allowed source range (IPv4 or IPv6).
    ///
    /// Examples: "203.0.113.0/24", "2001:db8::/32"
    pub cidr: String,
}

/// Ingress policy entry of a [`Bastion`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BastionIngressPolicy {
    /// Source range allowed to open SSH sessions to the bastion
    pub ip_block: IpBlock,
}

/// `Bastion` requests a temporary SSH jump host in a workload network.
///
/// The controller provisions a security group and a compute instance, restricts
/// SSH ingress to the listed CIDRs, restricts egress to SSH towards the workload
/// nodes, and publishes the public endpoint in `status.ingress`.
///
/// # Example
///
/// ```yaml
/// apiVersion: bastion.firestoned.io/v1alpha1
/// kind: Bastion
/// metadata:
///   name: debug-session
///   namespace: ops
/// spec:
///   clusterRef: prod-eu
///   userData: |
///     #!/bin/bash
///     useradd -m operator
///   ingress:
///     - ipBlock:
///         cidr: 203.0.113.0/24
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "bastion.firestoned.io",
    version = "v1alpha1",
    kind = "Bastion",
    namespaced,
    shortname = "bst",
    doc = "Bastion requests a short-lived SSH jump host with a restricted ingress allowlist inside the network of a WorkloadCluster.",
    printcolumn = r#"{"name":"Cluster","type":"string","jsonPath":".spec.clusterRef"}"#,
    printcolumn = r#"{"name":"IP","type":"string","jsonPath":".status.ingress.ip"}"#,
    printcolumn = r#"{"name":"Hostname","type":"string","jsonPath":".status.ingress.hostname"}"#
)]
#[kube(status = "BastionStatus")]
#[serde(rename_all = "camelCase")]
pub struct BastionSpec {
    /// Name of the cluster-scoped `WorkloadCluster` the bastion is opened into.
    pub cluster_ref: String,

    /// Cloud-init payload executed on first boot, in plain text.
    ///
    /// The controller base64-encodes it before handing it to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,

    /// Source ranges allowed to connect to the bastion on port 22.
    #[serde(default)]
    pub ingress: Vec<BastionIngressPolicy>,
}

/// `Bastion` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BastionStatus {
    /// Public endpoint users connect to once the bastion is ready.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<LoadBalancerIngress>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// Reference to a `Secret` holding provider credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretReference {
    /// Secret name
    pub name: String,
    /// Secret namespace
    pub namespace: String,
}

/// Machine type offered in the workload cluster's cloud.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineType {
    /// Provider instance type id (e.g., "ecs.t5-lc1m1.small")
    pub name: String,

    /// Number of cores, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
}

/// Region-specific image id of a machine image version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionImage {
    /// Region name (e.g., "eu-central-1")
    pub name: String,
    /// Provider image id in that region
    pub image_id: String,
}

/// One version of a machine image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineImageVersion {
    pub version: String,
    #[serde(default)]
    pub regions: Vec<RegionImage>,
}

/// Machine image offered in the workload cluster's cloud.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineImage {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<MachineImageVersion>,
}

/// Image selection for bastion instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BastionImageRef {
    /// Name of an entry of `machineImages`
    pub name: String,

    /// Version of the image; the last listed version is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// `WorkloadCluster` describes the cloud environment bastions are opened into.
///
/// It carries the resolved cluster metadata the bastion controller needs:
/// the infrastructure name prefix of the network resources, the region, the
/// credentials reference, and the machine types and images offered there.
///
/// # Example
///
/// ```yaml
/// apiVersion: bastion.firestoned.io/v1alpha1
/// kind: WorkloadCluster
/// metadata:
///   name: prod-eu
/// spec:
///   infrastructureName: shoot--prod--eu
///   region: eu-central-1
///   secretRef:
///     name: cloud-credentials
///     namespace: ops
///   machineTypes:
///     - name: ecs.t5-lc1m1.small
///       cpu: 1
///   machineImages:
///     - name: ubuntu
///       versions:
///         - version: "22.04"
///           regions:
///             - name: eu-central-1
///               imageId: m-0001
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "bastion.firestoned.io",
    version = "v1alpha1",
    kind = "WorkloadCluster",
    shortname = "wlc",
    doc = "WorkloadCluster describes the cloud network, region, credentials, machine types and machine images that Bastions are provisioned with."
)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadClusterSpec {
    /// Name prefix of the workload's infrastructure resources.
    ///
    /// The workload network is `{infrastructureName}-vpc` and the workload
    /// security group is `{infrastructureName}-sg`.
    pub infrastructure_name: String,

    /// Cloud region of the workload
    pub region: String,

    /// Provider credentials
    pub secret_ref: SecretReference,

    /// Machine types, in order of preference; the first one is the fallback bastion type
    #[serde(default)]
    pub machine_types: Vec<MachineType>,

    /// Machine images available in the cloud
    #[serde(default)]
    pub machine_images: Vec<MachineImage>,

    /// Image used for bastions; defaults to the first machine image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bastion_image: Option<BastionImageRef>,
}
