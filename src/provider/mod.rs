// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cloud provider capability consumed by the bastion reconciler.
//!
//! The reconciler never talks to a vendor SDK directly. It consumes the
//! [`CloudProvider`] trait, and a [`ProviderFactory`] turns a region plus
//! explicit credentials into a ready-to-use provider handle.
//!
//! # Bindings
//!
//! - [`http::HttpCloudProvider`] - JSON gateway binding built on `reqwest`
//!
//! # Assumptions
//!
//! Lookups are by name. When a lookup could match several resources, the
//! binding returns the first exact name match. Create-if-absent races between
//! two controllers are only safe if the provider itself deduplicates by name;
//! the reconciler does not guarantee it.

pub mod http;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProviderError;
pub use types::{
    AvailabilityInfo, AvailableResource, AvailableZone, CreateInstanceRequest, Credentials,
    EgressRule, IngressRule, Instance, InstanceStatus, NetworkInfo, Permission, PublicAddress,
    RuleDirection, RuleMatch, RulePolicy, SecurityGroup, SubnetInfo, SupportedResource,
};

/// Result type of provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Operations the bastion reconciler needs from a cloud provider.
///
/// Every call is awaited before the next one is issued; implementations do
/// not need to support concurrent use by a single pass.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Find a security group by exact name.
    async fn lookup_security_group(&self, name: &str) -> ProviderResult<Option<SecurityGroup>>;

    /// Create a security group in the given network.
    async fn create_security_group(
        &self,
        network_id: &str,
        name: &str,
    ) -> ProviderResult<SecurityGroup>;

    /// Find a compute instance by exact name.
    async fn lookup_instance(&self, name: &str) -> ProviderResult<Option<Instance>>;

    /// Launch a compute instance.
    async fn create_instance(&self, request: &CreateInstanceRequest) -> ProviderResult<Instance>;

    /// Availability of instance types with `core_count` cores in `zone_id`.
    async fn list_instance_type_availability(
        &self,
        core_count: u32,
        zone_id: &str,
    ) -> ProviderResult<AvailabilityInfo>;

    /// Rules of a security group in one direction.
    async fn describe_rules(
        &self,
        security_group_id: &str,
        direction: RuleDirection,
    ) -> ProviderResult<Vec<Permission>>;

    async fn create_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &IngressRule,
    ) -> ProviderResult<()>;

    async fn revoke_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()>;

    async fn create_egress_rule(
        &self,
        security_group_id: &str,
        rule: &EgressRule,
    ) -> ProviderResult<()>;

    async fn revoke_egress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()>;

    /// Allocate (or return the already allocated) public address of an instance.
    async fn allocate_public_address(&self, instance_id: &str) -> ProviderResult<PublicAddress>;

    /// Find a virtual network by exact name.
    async fn lookup_network(&self, name: &str) -> ProviderResult<Option<NetworkInfo>>;

    /// Find a subnet by id.
    async fn lookup_subnet(&self, subnet_id: &str) -> ProviderResult<Option<SubnetInfo>>;
}

/// Builds provider handles from explicit region and credentials.
pub trait ProviderFactory: Send + Sync {
    /// Create a provider bound to `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn new_provider(
        &self,
        region: &str,
        credentials: &Credentials,
    ) -> ProviderResult<Arc<dyn CloudProvider>>;
}

#[cfg(test)]
pub(crate) mod fake;
