// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Value types exchanged with the cloud provider.
//!
//! All types are plain data re-read from the provider on every pass; nothing
//! here is cached between reconciliations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::INSTANCE_TYPE_AVAILABLE;

/// Provider credentials, passed explicitly to provider construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .finish()
    }
}

/// Virtual network (VPC) of the workload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub vpc_id: String,
    pub name: String,
    /// Subnet (vSwitch) bastions are placed in
    pub subnet_id: String,
}

/// Subnet of the workload network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetInfo {
    pub subnet_id: String,
    pub zone_id: String,
}

/// Security group as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub security_group_id: String,
    pub security_group_name: String,
}

/// Lifecycle status of a compute instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Pending,
    Starting,
    Running,
    Stopping,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Pending => "Pending",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Stopped => "Stopped",
            Self::Unknown => "Unknown",
        };
        f.write_str(status)
    }
}

/// Compute instance as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    pub status: InstanceStatus,
    /// Private addresses inside the VPC; empty until the instance is placed
    #[serde(default)]
    pub private_ip_addresses: Vec<String>,
}

impl Instance {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == InstanceStatus::Running
    }

    /// First private address, if one has been assigned.
    #[must_use]
    pub fn private_ip(&self) -> Option<&str> {
        self.private_ip_addresses.first().map(String::as_str)
    }
}

/// Parameters of an instance creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
    pub instance_name: String,
    pub security_group_id: String,
    pub image_id: String,
    pub subnet_id: String,
    pub zone_id: String,
    pub instance_type: String,
    /// Base64-encoded init payload
    pub user_data: String,
}

/// Public address attached to an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAddress {
    pub ip_address: String,
}

/// Instance type availability of a zone, as nested by the provider:
/// zone → resource → supported resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInfo {
    #[serde(default)]
    pub available_zones: Vec<AvailableZone>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableZone {
    pub zone_id: String,
    #[serde(default)]
    pub available_resources: Vec<AvailableResource>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableResource {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub supported_resources: Vec<SupportedResource>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedResource {
    /// Instance type id
    pub value: String,
    /// "Available", "SoldOut", ...
    pub status: String,
}

impl AvailabilityInfo {
    /// Instance type id of the first zone's first resource's first supported
    /// resource, if that entry is `Available`.
    #[must_use]
    pub fn first_available_type(&self) -> Option<&str> {
        let supported = self
            .available_zones
            .first()?
            .available_resources
            .first()?
            .supported_resources
            .first()?;

        (supported.status == INSTANCE_TYPE_AVAILABLE).then_some(supported.value.as_str())
    }
}

/// Direction of a security group rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleDirection {
    Ingress,
    Egress,
}

impl RuleDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingress => "ingress",
            Self::Egress => "egress",
        }
    }
}

/// Action of a security group rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePolicy {
    Accept,
    Drop,
}

/// A security group rule as described by the provider.
///
/// This is the raw observed record; it is projected onto [`IngressRule`] or
/// [`EgressRule`] before comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub description: String,
    pub ip_protocol: String,
    pub port_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RulePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// Ingress rule compared by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub description: String,
    pub ip_protocol: String,
    pub port_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl From<&Permission> for IngressRule {
    fn from(p: &Permission) -> Self {
        Self {
            description: p.description.clone(),
            ip_protocol: p.ip_protocol.clone(),
            port_range: p.port_range.clone(),
            source_cidr_ip: p.source_cidr_ip.clone(),
            ipv6_source_cidr_ip: p.ipv6_source_cidr_ip.clone(),
            priority: p.priority,
        }
    }
}

/// Egress rule compared by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EgressRule {
    pub description: String,
    pub ip_protocol: String,
    pub port_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RulePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl From<&Permission> for EgressRule {
    fn from(p: &Permission) -> Self {
        Self {
            description: p.description.clone(),
            ip_protocol: p.ip_protocol.clone(),
            port_range: p.port_range.clone(),
            source_cidr_ip: p.source_cidr_ip.clone(),
            dest_cidr_ip: p.dest_cidr_ip.clone(),
            dest_group_id: p.dest_group_id.clone(),
            policy: p.policy,
            priority: p.priority,
        }
    }
}

/// Fields identifying a rule to revoke.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMatch {
    pub ip_protocol: String,
    pub port_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_source_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_cidr_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RulePolicy>,
}

impl From<&IngressRule> for RuleMatch {
    fn from(rule: &IngressRule) -> Self {
        Self {
            ip_protocol: rule.ip_protocol.clone(),
            port_range: rule.port_range.clone(),
            source_cidr_ip: rule.source_cidr_ip.clone(),
            ipv6_source_cidr_ip: rule.ipv6_source_cidr_ip.clone(),
            ..Self::default()
        }
    }
}

impl From<&EgressRule> for RuleMatch {
    fn from(rule: &EgressRule) -> Self {
        Self {
            ip_protocol: rule.ip_protocol.clone(),
            port_range: rule.port_range.clone(),
            source_cidr_ip: rule.source_cidr_ip.clone(),
            dest_cidr_ip: rule.dest_cidr_ip.clone(),
            dest_group_id: rule.dest_group_id.clone(),
            policy: rule.policy,
            ..Self::default()
        }
    }
}
