// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Bastion - SSH Jump Host Operator for Kubernetes
//!
//! Bastion is a Kubernetes operator that provisions short-lived SSH jump
//! hosts inside the private network of a workload cluster, restricted to an
//! allowlist of source ranges.
//!
//! ## Overview
//!
//! For each `Bastion` resource the operator converges:
//!
//! - A security group with SSH ingress from the allowlisted CIDRs only
//! - Egress restricted to SSH towards the workload nodes
//! - A compute instance with a public address
//! - The public endpoint, published in `status.ingress`
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definitions (`Bastion`, `WorkloadCluster`)
//! - [`options`] - Resolution of names, image, and allowlist from the resources
//! - [`provider`] - Cloud provider capability and its HTTP binding
//! - [`reconcilers`] - The reconcile pass and status publication
//! - [`bastion_controller`] - Controller wiring and requeue policy
//!
//! ## Example
//!
//! ```rust,no_run
//! use bastion::options::generate_base_resource_name;
//!
//! let name = generate_base_resource_name("shoot--prod--eu", "debug-session")?;
//! assert_eq!(name, "shoot--prod--eu-debug-session-bastion-6fe46");
//! # Ok::<(), bastion::errors::BastionError>(())
//! ```

pub mod bastion_controller;
pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod credentials;
pub mod errors;
pub mod metrics;
pub mod metrics_server;
pub mod options;
pub mod provider;
pub mod reconcilers;
