// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation controllers for bastion resources.
//!
//! # Reconciliation Architecture
//!
//! The operator follows the standard Kubernetes controller pattern:
//!
//! 1. **Watch** - Monitor `Bastion` changes via the Kubernetes API
//! 2. **Reconcile** - Converge the cloud resources towards the spec
//! 3. **Status** - Publish the bastion endpoint back to Kubernetes
//!
//! A pass that is waiting on the cloud returns a retry value instead of an
//! error; the controller turns it into a requeue.
//!
//! # Available Reconcilers
//!
//! - [`reconcile_bastion`] - Provisions a bastion and publishes its endpoint
//!
//! # Example: Driving a Pass
//!
//! ```rust,ignore
//! use bastion::reconcilers::{reconcile_pass, ReconcileOutcome};
//!
//! match reconcile_pass(provider.as_ref(), &publisher, &request).await? {
//!     ReconcileOutcome::Ready(endpoints) => println!("ready: {endpoints:?}"),
//!     ReconcileOutcome::Retry(retry) => println!("{retry}"),
//! }
//! ```

pub mod bastion;
pub mod status;

pub use bastion::{reconcile_bastion, reconcile_pass, ReconcileOutcome, ReconcileRequest};

/// Check if a status value has actually changed compared to the current status.
///
/// Status patches trigger "object updated" events which cause new
/// reconciliations, so unchanged values must not be written back.
///
/// # Example
///
/// ```rust,ignore
/// use bastion::reconcilers::status_changed;
///
/// let current = bastion.status.as_ref().and_then(|s| s.ingress.clone());
/// if status_changed(&current, &new_ingress) {
///     publisher.publish(new_ingress.as_ref()).await?;
/// }
/// ```
#[must_use]
pub fn status_changed<T: PartialEq>(current_value: &Option<T>, new_value: &Option<T>) -> bool {
    current_value != new_value
}
