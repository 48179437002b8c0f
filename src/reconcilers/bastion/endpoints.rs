// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Endpoint pair of a bastion and its readiness predicate.

use k8s_openapi::api::core::v1::LoadBalancerIngress;

/// Endpoints a bastion provides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BastionEndpoints {
    /// Address inside the workload network; the workload side opens SSH to it
    pub private: Option<LoadBalancerIngress>,
    /// Address the user connects to
    pub public: Option<LoadBalancerIngress>,
}

impl BastionEndpoints {
    /// Both sides carry a hostname or an IP.
    #[must_use]
    pub fn ready(&self) -> bool {
        ingress_ready(self.private.as_ref()) && ingress_ready(self.public.as_ref())
    }
}

/// An ingress is ready when it has a non-empty hostname or IP.
#[must_use]
pub fn ingress_ready(ingress: Option<&LoadBalancerIngress>) -> bool {
    ingress.is_some_and(|ingress| {
        ingress.hostname.as_deref().is_some_and(|h| !h.is_empty())
            || ingress.ip.as_deref().is_some_and(|ip| !ip.is_empty())
    })
}

/// Build an ingress from an optional hostname and IP.
///
/// Returns `None` only when both are absent.
#[must_use]
pub fn address_to_ingress(
    hostname: Option<&str>,
    ip: Option<&str>,
) -> Option<LoadBalancerIngress> {
    if hostname.is_none() && ip.is_none() {
        return None;
    }

    Some(LoadBalancerIngress {
        hostname: hostname.map(str::to_string),
        ip: ip.map(str::to_string),
        ..LoadBalancerIngress::default()
    })
}

#[cfg(test)]
#[path = "endpoints_tests.rs"]
mod endpoints_tests;
