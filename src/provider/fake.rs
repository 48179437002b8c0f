// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`CloudProvider`] used by the reconciler tests.
//!
//! Created resources get sequential ids (`sg-1`, `i-1`, ...). Instances are
//! created `Pending` without a private address; tests move them along with
//! [`FakeProvider::set_instance_state`].

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    AvailabilityInfo, AvailableResource, AvailableZone, CloudProvider, CreateInstanceRequest,
    EgressRule, IngressRule, Instance, InstanceStatus, NetworkInfo, Permission, ProviderResult,
    PublicAddress, RuleDirection, RuleMatch, SecurityGroup, SubnetInfo, SupportedResource,
};
use crate::errors::ProviderError;

/// Number of mutating calls seen by the fake.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CallCounts {
    pub create_security_group: usize,
    pub create_instance: usize,
    pub create_rule: usize,
    pub revoke_rule: usize,
    pub allocate_public_address: usize,
}

/// Result of one scripted instance lookup.
#[derive(Clone, Debug)]
pub(crate) enum ScriptedLookup {
    /// Answer from the stored instances
    Live,
    /// Answer with this value regardless of the stored instances
    Returns(Option<Instance>),
}

#[derive(Default)]
struct FakeState {
    security_groups: Vec<SecurityGroup>,
    instances: Vec<Instance>,
    created_instances: Vec<CreateInstanceRequest>,
    scripted_lookups: VecDeque<ScriptedLookup>,
    rules: HashMap<(String, RuleDirection), Vec<Permission>>,
    availability: HashMap<u32, AvailabilityInfo>,
    probed_cores: Vec<u32>,
    networks: Vec<NetworkInfo>,
    subnets: Vec<SubnetInfo>,
    public_ip: String,
    fail_rule: Option<String>,
    calls: CallCounts,
}

#[derive(Clone, Default)]
pub(crate) struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvider {
    /// Fake with network `{prefix}-vpc` (`vpc-1`, subnet `vsw-1` in `zone-a`)
    /// and the workload security group `{prefix}-sg` (`sg-workload`).
    pub fn with_workload(prefix: &str) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state();
            state.networks.push(NetworkInfo {
                vpc_id: "vpc-1".to_string(),
                name: format!("{prefix}-vpc"),
                subnet_id: "vsw-1".to_string(),
            });
            state.subnets.push(SubnetInfo {
                subnet_id: "vsw-1".to_string(),
                zone_id: "zone-a".to_string(),
            });
            state.security_groups.push(SecurityGroup {
                security_group_id: "sg-workload".to_string(),
                security_group_name: format!("{prefix}-sg"),
            });
            state.public_ip = "198.51.100.9".to_string();
        }
        fake
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls.clone()
    }

    pub fn add_security_group(&self, id: &str, name: &str) {
        self.state().security_groups.push(SecurityGroup {
            security_group_id: id.to_string(),
            security_group_name: name.to_string(),
        });
    }

    pub fn remove_security_group(&self, name: &str) {
        self.state()
            .security_groups
            .retain(|sg| sg.security_group_name != name);
    }

    pub fn add_instance(&self, instance: Instance) {
        self.state().instances.push(instance);
    }

    /// Update the status and private address of a stored instance.
    pub fn set_instance_state(
        &self,
        name: &str,
        status: InstanceStatus,
        private_ip: Option<&str>,
    ) {
        let mut state = self.state();
        if let Some(instance) = state
            .instances
            .iter_mut()
            .find(|i| i.instance_name == name)
        {
            instance.status = status;
            instance.private_ip_addresses =
                private_ip.map(str::to_string).into_iter().collect();
        }
    }

    /// Queue answers for the next instance lookups, in call order.
    pub fn script_instance_lookups(&self, lookups: Vec<ScriptedLookup>) {
        self.state().scripted_lookups.extend(lookups);
    }

    pub fn created_instances(&self) -> Vec<CreateInstanceRequest> {
        self.state().created_instances.clone()
    }

    /// Mark `instance_type` as available for `cores` cores.
    pub fn set_available(&self, cores: u32, instance_type: &str, status: &str) {
        let info = AvailabilityInfo {
            available_zones: vec![AvailableZone {
                zone_id: "zone-a".to_string(),
                available_resources: vec![AvailableResource {
                    resource_type: "InstanceType".to_string(),
                    supported_resources: vec![SupportedResource {
                        value: instance_type.to_string(),
                        status: status.to_string(),
                    }],
                }],
            }],
        };
        self.state().availability.insert(cores, info);
    }

    pub fn probed_cores(&self) -> Vec<u32> {
        self.state().probed_cores.clone()
    }

    pub fn seed_rules(
        &self,
        security_group_id: &str,
        direction: RuleDirection,
        rules: Vec<Permission>,
    ) {
        self.state()
            .rules
            .insert((security_group_id.to_string(), direction), rules);
    }

    pub fn rules(&self, security_group_id: &str, direction: RuleDirection) -> Vec<Permission> {
        self.state()
            .rules
            .get(&(security_group_id.to_string(), direction))
            .cloned()
            .unwrap_or_default()
    }

    /// Fail every creation of the rule with this description.
    pub fn fail_rule(&self, description: &str) {
        self.state().fail_rule = Some(description.to_string());
    }

    fn check_rule(state: &FakeState, description: &str) -> ProviderResult<()> {
        match &state.fail_rule {
            Some(failing) if failing == description => Err(ProviderError::Api {
                status: 400,
                message: "InvalidParameter".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn revoke(
        state: &mut FakeState,
        security_group_id: &str,
        direction: RuleDirection,
        rule: &RuleMatch,
    ) {
        if let Some(rules) = state.rules.get_mut(&(security_group_id.to_string(), direction)) {
            rules.retain(|p| {
                let observed = match direction {
                    RuleDirection::Ingress => RuleMatch::from(&IngressRule::from(p)),
                    RuleDirection::Egress => RuleMatch::from(&EgressRule::from(p)),
                };
                observed != *rule
            });
        }
    }
}

impl From<&IngressRule> for Permission {
    fn from(rule: &IngressRule) -> Self {
        Self {
            description: rule.description.clone(),
            ip_protocol: rule.ip_protocol.clone(),
            port_range: rule.port_range.clone(),
            source_cidr_ip: rule.source_cidr_ip.clone(),
            ipv6_source_cidr_ip: rule.ipv6_source_cidr_ip.clone(),
            priority: rule.priority,
            ..Self::default()
        }
    }
}

impl From<&EgressRule> for Permission {
    fn from(rule: &EgressRule) -> Self {
        Self {
            description: rule.description.clone(),
            ip_protocol: rule.ip_protocol.clone(),
            port_range: rule.port_range.clone(),
            source_cidr_ip: rule.source_cidr_ip.clone(),
            dest_cidr_ip: rule.dest_cidr_ip.clone(),
            dest_group_id: rule.dest_group_id.clone(),
            policy: rule.policy,
            priority: rule.priority,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CloudProvider for FakeProvider {
    async fn lookup_security_group(&self, name: &str) -> ProviderResult<Option<SecurityGroup>> {
        Ok(self
            .state()
            .security_groups
            .iter()
            .find(|sg| sg.security_group_name == name)
            .cloned())
    }

    async fn create_security_group(
        &self,
        _network_id: &str,
        name: &str,
    ) -> ProviderResult<SecurityGroup> {
        let mut state = self.state();
        state.calls.create_security_group += 1;
        let sg = SecurityGroup {
            security_group_id: format!("sg-{}", state.calls.create_security_group),
            security_group_name: name.to_string(),
        };
        state.security_groups.push(sg.clone());
        Ok(sg)
    }

    async fn lookup_instance(&self, name: &str) -> ProviderResult<Option<Instance>> {
        let mut state = self.state();
        if let Some(ScriptedLookup::Returns(instance)) = state.scripted_lookups.pop_front() {
            return Ok(instance);
        }
        Ok(state
            .instances
            .iter()
            .find(|i| i.instance_name == name)
            .cloned())
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> ProviderResult<Instance> {
        let mut state = self.state();
        state.calls.create_instance += 1;
        let instance = Instance {
            instance_id: format!("i-{}", state.calls.create_instance),
            instance_name: request.instance_name.clone(),
            status: InstanceStatus::Pending,
            private_ip_addresses: Vec::new(),
        };
        state.instances.push(instance.clone());
        state.created_instances.push(request.clone());
        Ok(instance)
    }

    async fn list_instance_type_availability(
        &self,
        core_count: u32,
        _zone_id: &str,
    ) -> ProviderResult<AvailabilityInfo> {
        let mut state = self.state();
        state.probed_cores.push(core_count);
        Ok(state
            .availability
            .get(&core_count)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_rules(
        &self,
        security_group_id: &str,
        direction: RuleDirection,
    ) -> ProviderResult<Vec<Permission>> {
        Ok(self.rules(security_group_id, direction))
    }

    async fn create_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &IngressRule,
    ) -> ProviderResult<()> {
        let mut state = self.state();
        Self::check_rule(&state, &rule.description)?;
        state.calls.create_rule += 1;
        state
            .rules
            .entry((security_group_id.to_string(), RuleDirection::Ingress))
            .or_default()
            .push(Permission::from(rule));
        Ok(())
    }

    async fn revoke_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()> {
        let mut state = self.state();
        state.calls.revoke_rule += 1;
        Self::revoke(&mut state, security_group_id, RuleDirection::Ingress, rule);
        Ok(())
    }

    async fn create_egress_rule(
        &self,
        security_group_id: &str,
        rule: &EgressRule,
    ) -> ProviderResult<()> {
        let mut state = self.state();
        Self::check_rule(&state, &rule.description)?;
        state.calls.create_rule += 1;
        state
            .rules
            .entry((security_group_id.to_string(), RuleDirection::Egress))
            .or_default()
            .push(Permission::from(rule));
        Ok(())
    }

    async fn revoke_egress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()> {
        let mut state = self.state();
        state.calls.revoke_rule += 1;
        Self::revoke(&mut state, security_group_id, RuleDirection::Egress, rule);
        Ok(())
    }

    async fn allocate_public_address(&self, _instance_id: &str) -> ProviderResult<PublicAddress> {
        let mut state = self.state();
        state.calls.allocate_public_address += 1;
        Ok(PublicAddress {
            ip_address: state.public_ip.clone(),
        })
    }

    async fn lookup_network(&self, name: &str) -> ProviderResult<Option<NetworkInfo>> {
        Ok(self
            .state()
            .networks
            .iter()
            .find(|n| n.name == name)
            .cloned())
    }

    async fn lookup_subnet(&self, subnet_id: &str) -> ProviderResult<Option<SubnetInfo>> {
        Ok(self
            .state()
            .subnets
            .iter()
            .find(|s| s.subnet_id == subnet_id)
            .cloned())
    }
}
