// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Bastion operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all Bastion CRDs
pub const API_GROUP: &str = "bastion.firestoned.io";

/// API version for all Bastion CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Kind name for `Bastion` resource
pub const KIND_BASTION: &str = "Bastion";

/// Kind name for `WorkloadCluster` resource
pub const KIND_WORKLOAD_CLUSTER: &str = "WorkloadCluster";

/// Field manager used when patching `Bastion` status
pub const FIELD_MANAGER: &str = "bastion-controller";

// ============================================================================
// Naming Constants
// ============================================================================

/// Maximum length of the `{cluster}-{bastion}` prefix before the hash suffix is appended
pub const MAX_BASE_NAME_LENGTH: usize = 33;

/// Number of hex characters of the SHA-256 name hash kept in resource names
pub const NAME_HASH_LENGTH: usize = 5;

/// Suffix of the bastion security group name
pub const SECURITY_GROUP_SUFFIX: &str = "-sg";

/// Suffix of the workload network (VPC) name
pub const NETWORK_SUFFIX: &str = "-vpc";

// ============================================================================
// Retry Constants
// ============================================================================

/// Requeue delay while the bastion instance boots (10 seconds)
pub const INSTANCE_NOT_READY_REQUEUE_SECS: u64 = 10;

/// Requeue delay while the public/private endpoints are not yet populated (5 seconds)
///
/// Shorter than the instance delay: an operator usually waits on this endpoint
/// to open an SSH session.
pub const ENDPOINTS_NOT_READY_REQUEUE_SECS: u64 = 5;

/// Requeue metric reason while the instance boots
pub const REASON_INSTANCE_NOT_READY: &str = "instance_not_ready";

/// Requeue metric reason while the endpoints are incomplete
pub const REASON_ENDPOINTS_NOT_READY: &str = "endpoints_not_ready";

/// Default requeue delay after a failed reconciliation (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Default periodic re-check of a published bastion (5 minutes)
pub const READY_REQUEUE_DURATION_SECS: u64 = 300;

// ============================================================================
// Provider Constants
// ============================================================================

/// Smallest core count probed when selecting the bastion instance type
pub const MIN_INSTANCE_CORES: u32 = 1;

/// Largest core count probed when selecting the bastion instance type
pub const MAX_INSTANCE_CORES: u32 = 2;

/// Status reported by the provider for an instance type that can be launched in a zone
pub const INSTANCE_TYPE_AVAILABLE: &str = "Available";

/// Default HTTP timeout for provider API calls
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Secret key holding the provider access key id
pub const SECRET_KEY_ACCESS_KEY_ID: &str = "accessKeyID";

/// Secret key holding the provider access key secret
pub const SECRET_KEY_ACCESS_KEY_SECRET: &str = "accessKeySecret";

// ============================================================================
// Security Rule Constants
// ============================================================================

/// Protocol of SSH rules
pub const PROTOCOL_TCP: &str = "tcp";

/// Protocol matching every protocol
pub const PROTOCOL_ALL: &str = "all";

/// Port range of SSH rules
pub const SSH_PORT_RANGE: &str = "22/22";

/// Port range matching every port
pub const ALL_PORTS_RANGE: &str = "-1/-1";

/// IPv4 CIDR matching every destination
pub const ANY_IPV4_CIDR: &str = "0.0.0.0/0";

/// Priority of allow rules (evaluated before deny rules)
pub const ALLOW_RULE_PRIORITY: u32 = 1;

/// Priority of the egress deny-all rule
pub const DENY_RULE_PRIORITY: u32 = 2;

/// Description of the ingress rules allowing SSH from the allowlisted ranges
pub const INGRESS_ALLOW_SSH_DESCRIPTION: &str = "Allow SSH ingress to Bastion";

/// Description of the egress rule allowing SSH to the workload nodes
pub const EGRESS_ALLOW_SSH_DESCRIPTION: &str = "Allow Bastion egress to workload nodes";

/// Description of the egress deny-all rule
pub const EGRESS_DENY_ALL_DESCRIPTION: &str = "Bastion egress deny all";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Path for the liveness endpoint
pub const HEALTH_SERVER_PATH: &str = "/healthz";

/// Bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";
