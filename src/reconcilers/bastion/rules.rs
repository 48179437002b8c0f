// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Security group rule reconciliation.
//!
//! Rules are compared by value: two rules are the same rule when every field
//! matches exactly, including the description. A rule whose description was
//! changed out-of-band is therefore revoked and recreated rather than updated.
//!
//! Rules to delete are revoked before rules to add are created. Revocation
//! matches on every field except the description, so a revoke issued after
//! the create would also remove a recreated rule. The first failing call
//! aborts the step; the next pass diffs against whatever state resulted.

use tracing::{debug, info};

use crate::constants::{
    ALLOW_RULE_PRIORITY, ALL_PORTS_RANGE, ANY_IPV4_CIDR, DENY_RULE_PRIORITY,
    EGRESS_ALLOW_SSH_DESCRIPTION, EGRESS_DENY_ALL_DESCRIPTION, INGRESS_ALLOW_SSH_DESCRIPTION,
    PROTOCOL_ALL, PROTOCOL_TCP, SSH_PORT_RANGE,
};
use crate::errors::{BastionError, ProviderError};
use crate::metrics::record_rule_change;
use crate::options::{IngressPermission, Options};
use crate::provider::{
    CloudProvider, EgressRule, IngressRule, Instance, RuleDirection, RuleMatch, RulePolicy,
};

/// Rules to create and rules to revoke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDiff<R> {
    pub to_add: Vec<R>,
    pub to_delete: Vec<R>,
}

impl<R> RuleDiff<R> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty()
    }
}

/// `to_add = wanted \ observed`, `to_delete = observed \ wanted`.
///
/// Both sides are treated as sets: order is irrelevant and duplicates collapse.
pub fn symmetric_difference<R: PartialEq + Clone>(wanted: &[R], observed: &[R]) -> RuleDiff<R> {
    RuleDiff {
        to_add: difference(wanted, observed),
        to_delete: difference(observed, wanted),
    }
}

fn difference<R: PartialEq + Clone>(left: &[R], right: &[R]) -> Vec<R> {
    let mut result: Vec<R> = Vec::new();
    for rule in left {
        if !right.contains(rule) && !result.contains(rule) {
            result.push(rule.clone());
        }
    }
    result
}

/// SSH from one allowlisted range into the bastion.
#[must_use]
pub fn ingress_allow_ssh(permission: &IngressPermission) -> IngressRule {
    let (source_cidr_ip, ipv6_source_cidr_ip) = if permission.ipv6 {
        (None, Some(permission.cidr.clone()))
    } else {
        (Some(permission.cidr.clone()), None)
    };

    IngressRule {
        description: INGRESS_ALLOW_SSH_DESCRIPTION.to_string(),
        ip_protocol: PROTOCOL_TCP.to_string(),
        port_range: SSH_PORT_RANGE.to_string(),
        source_cidr_ip,
        ipv6_source_cidr_ip,
        priority: Some(ALLOW_RULE_PRIORITY),
    }
}

/// SSH from the bastion's private address to the workload nodes.
#[must_use]
pub fn egress_allow_ssh_to_workload(
    private_ip: &str,
    workload_security_group_id: &str,
) -> EgressRule {
    EgressRule {
        description: EGRESS_ALLOW_SSH_DESCRIPTION.to_string(),
        ip_protocol: PROTOCOL_TCP.to_string(),
        port_range: SSH_PORT_RANGE.to_string(),
        source_cidr_ip: Some(private_ip.to_string()),
        dest_cidr_ip: None,
        dest_group_id: Some(workload_security_group_id.to_string()),
        policy: Some(RulePolicy::Accept),
        priority: Some(ALLOW_RULE_PRIORITY),
    }
}

/// Drop all other egress.
#[must_use]
pub fn egress_deny_all() -> EgressRule {
    EgressRule {
        description: EGRESS_DENY_ALL_DESCRIPTION.to_string(),
        ip_protocol: PROTOCOL_ALL.to_string(),
        port_range: ALL_PORTS_RANGE.to_string(),
        source_cidr_ip: None,
        dest_cidr_ip: Some(ANY_IPV4_CIDR.to_string()),
        dest_group_id: None,
        policy: Some(RulePolicy::Drop),
        priority: Some(DENY_RULE_PRIORITY),
    }
}

/// Converge the ingress rules of `security_group_id` to `wanted`.
///
/// # Errors
///
/// Returns [`BastionError::Provider`] if the rules cannot be described, or
/// [`BastionError::Rule`] naming the first rule that could not be changed.
pub async fn reconcile_ingress_rules(
    provider: &dyn CloudProvider,
    security_group_id: &str,
    wanted: &[IngressRule],
) -> Result<RuleDiff<IngressRule>, BastionError> {
    let observed: Vec<IngressRule> = provider
        .describe_rules(security_group_id, RuleDirection::Ingress)
        .await
        .map_err(BastionError::provider(
            "describe ingress rules of security group",
            security_group_id,
        ))?
        .iter()
        .map(IngressRule::from)
        .collect();

    let diff = symmetric_difference(wanted, &observed);

    for rule in &diff.to_delete {
        provider
            .revoke_ingress_rule(security_group_id, &RuleMatch::from(rule))
            .await
            .map_err(|source| {
                rule_error("delete", RuleDirection::Ingress, &rule.description, source)
            })?;
        record_rule_change(RuleDirection::Ingress.as_str(), "delete");
        info!(
            security_group = %security_group_id,
            rule = %rule.description,
            "Revoked ingress rule"
        );
    }

    for rule in &diff.to_add {
        provider
            .create_ingress_rule(security_group_id, rule)
            .await
            .map_err(|source| {
                rule_error("add", RuleDirection::Ingress, &rule.description, source)
            })?;
        record_rule_change(RuleDirection::Ingress.as_str(), "add");
        info!(
            security_group = %security_group_id,
            rule = %rule.description,
            source_cidr = ?rule.source_cidr_ip.as_ref().or(rule.ipv6_source_cidr_ip.as_ref()),
            "Created ingress rule"
        );
    }

    Ok(diff)
}

/// Converge the egress rules of `security_group_id` to `wanted`.
///
/// # Errors
///
/// Returns [`BastionError::Provider`] if the rules cannot be described, or
/// [`BastionError::Rule`] naming the first rule that could not be changed.
pub async fn reconcile_egress_rules(
    provider: &dyn CloudProvider,
    security_group_id: &str,
    wanted: &[EgressRule],
) -> Result<RuleDiff<EgressRule>, BastionError> {
    let observed: Vec<EgressRule> = provider
        .describe_rules(security_group_id, RuleDirection::Egress)
        .await
        .map_err(BastionError::provider(
            "describe egress rules of security group",
            security_group_id,
        ))?
        .iter()
        .map(EgressRule::from)
        .collect();

    let diff = symmetric_difference(wanted, &observed);

    for rule in &diff.to_delete {
        provider
            .revoke_egress_rule(security_group_id, &RuleMatch::from(rule))
            .await
            .map_err(|source| {
                rule_error("delete", RuleDirection::Egress, &rule.description, source)
            })?;
        record_rule_change(RuleDirection::Egress.as_str(), "delete");
        info!(
            security_group = %security_group_id,
            rule = %rule.description,
            "Revoked egress rule"
        );
    }

    for rule in &diff.to_add {
        provider
            .create_egress_rule(security_group_id, rule)
            .await
            .map_err(|source| {
                rule_error("add", RuleDirection::Egress, &rule.description, source)
            })?;
        record_rule_change(RuleDirection::Egress.as_str(), "add");
        info!(
            security_group = %security_group_id,
            rule = %rule.description,
            "Created egress rule"
        );
    }

    Ok(diff)
}

/// Reconcile both rule families of the bastion security group.
///
/// Ingress allows SSH from each allowlisted range. Egress allows SSH from the
/// bastion's private address to the workload security group and drops the
/// rest. The workload security group is provisioned with the workload; its
/// absence is a configuration error.
///
/// # Errors
///
/// Returns [`BastionError::MissingPrivateIp`] if `instance` has no private
/// address, [`BastionError::WorkloadSecurityGroupNotFound`] if the workload
/// security group does not exist, or the first provider failure.
pub async fn reconcile_security_group_rules(
    provider: &dyn CloudProvider,
    options: &Options,
    security_group_id: &str,
    instance: &Instance,
) -> Result<(), BastionError> {
    let wanted_ingress: Vec<IngressRule> = options.ingress.iter().map(ingress_allow_ssh).collect();
    let ingress = reconcile_ingress_rules(provider, security_group_id, &wanted_ingress).await?;

    let workload_security_group = provider
        .lookup_security_group(&options.workload_security_group_name)
        .await
        .map_err(BastionError::provider(
            "look up workload security group",
            &options.workload_security_group_name,
        ))?
        .ok_or_else(|| BastionError::WorkloadSecurityGroupNotFound {
            name: options.workload_security_group_name.clone(),
        })?;

    let private_ip = instance
        .private_ip()
        .ok_or_else(|| BastionError::MissingPrivateIp {
            name: instance.instance_name.clone(),
        })?;

    let wanted_egress = [
        egress_allow_ssh_to_workload(private_ip, &workload_security_group.security_group_id),
        egress_deny_all(),
    ];
    let egress = reconcile_egress_rules(provider, security_group_id, &wanted_egress).await?;

    debug!(
        security_group = %security_group_id,
        ingress_added = ingress.to_add.len(),
        ingress_deleted = ingress.to_delete.len(),
        egress_added = egress.to_add.len(),
        egress_deleted = egress.to_delete.len(),
        "Security group rules reconciled"
    );

    Ok(())
}

fn rule_error(
    action: &'static str,
    direction: RuleDirection,
    description: &str,
    source: ProviderError,
) -> BastionError {
    BastionError::Rule {
        action,
        direction: direction.as_str(),
        description: description.to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
