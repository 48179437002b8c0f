// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `Bastion` controller.
//!
//! Watches `Bastion` resources and the `WorkloadCluster` resources they
//! reference, and maps each reconcile pass outcome to a controller action:
//! a published bastion is re-checked periodically, a not-ready bastion is
//! requeued after the delay the pass asked for, and a failure is requeued
//! by the error policy.

use anyhow::Result;
use futures::StreamExt;
use kube::api::Api;
use kube::runtime::controller::Action;
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::ResourceExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::constants::KIND_BASTION;
use crate::context::{Context, RequeuePolicy};
use crate::crd::{Bastion, WorkloadCluster};
use crate::errors::BastionError;
use crate::metrics;
use crate::reconcilers::{reconcile_bastion, ReconcileOutcome};

/// Reconciliation error wrapper
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReconcileError(#[from] anyhow::Error);

impl From<BastionError> for ReconcileError {
    fn from(err: BastionError) -> Self {
        Self(err.into())
    }
}

/// Error policy for the bastion controller.
#[allow(clippy::needless_pass_by_value)] // Signature required by kube::runtime::Controller
fn error_policy(bastion: Arc<Bastion>, err: &ReconcileError, ctx: Arc<Context>) -> Action {
    error!(
        error = %err,
        bastion = %bastion.name_any(),
        namespace = ?bastion.namespace(),
        "Reconciliation error - will retry in {}s",
        ctx.requeue.error.as_secs()
    );
    Action::requeue(ctx.requeue.error)
}

/// References of the bastions opened into `cluster`.
#[must_use]
pub fn bastions_for_cluster(bastions: &[Arc<Bastion>], cluster: &str) -> Vec<ObjectRef<Bastion>> {
    bastions
        .iter()
        .filter(|bastion| bastion.spec.cluster_ref == cluster)
        .map(|bastion| ObjectRef::from_obj(&**bastion))
        .collect()
}

/// Map a pass outcome to the controller action.
#[must_use]
pub fn outcome_action(outcome: &ReconcileOutcome, requeue: &RequeuePolicy) -> Action {
    match outcome {
        ReconcileOutcome::Ready(_) => Action::requeue(requeue.ready),
        ReconcileOutcome::Retry(retry) => Action::requeue(retry.after),
    }
}

/// Run the `Bastion` controller until its watch streams end.
///
/// A change to a `WorkloadCluster` re-triggers every bastion referencing it.
///
/// # Errors
///
/// Returns an error if the controller fails to start.
pub async fn run_bastion_controller(context: Arc<Context>) -> Result<()> {
    info!("Starting {} controller", KIND_BASTION);

    let client = context.client.clone();
    let api = Api::<Bastion>::all(client.clone());
    let cluster_api = Api::<WorkloadCluster>::all(client);

    let controller = Controller::new(api, WatcherConfig::default());
    let bastions = controller.store();

    controller
        .watches(cluster_api, WatcherConfig::default(), move |cluster| {
            bastions_for_cluster(&bastions.state(), &cluster.name_any())
        })
        .run(reconcile_wrapper, error_policy, context)
        .for_each(|_| futures::future::ready(()))
        .await;

    Ok(())
}

/// Reconcile wrapper for `Bastion`: runs one pass and records metrics.
async fn reconcile_wrapper(
    bastion: Arc<Bastion>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let start = Instant::now();
    debug!(
        bastion = %bastion.name_any(),
        namespace = ?bastion.namespace(),
        "Reconcile wrapper called for Bastion"
    );

    match reconcile_bastion(ctx.clone(), bastion.clone()).await {
        Ok(outcome) => {
            match &outcome {
                ReconcileOutcome::Ready(_) => {
                    info!("Successfully reconciled Bastion: {}", bastion.name_any());
                    metrics::record_reconciliation_success(KIND_BASTION, start.elapsed());
                }
                ReconcileOutcome::Retry(retry) => {
                    info!("Bastion {} not ready: {}", bastion.name_any(), retry);
                    metrics::record_reconciliation_retry(
                        KIND_BASTION,
                        retry.reason,
                        start.elapsed(),
                    );
                }
            }
            Ok(outcome_action(&outcome, &ctx.requeue))
        }
        Err(e) => {
            metrics::record_reconciliation_error(KIND_BASTION, e.kind(), start.elapsed());
            if e.is_configuration_error() {
                error!(
                    "Bastion {} cannot be provisioned until its configuration is fixed: {}",
                    bastion.name_any(),
                    e
                );
            } else {
                error!("Failed to reconcile Bastion {}: {}", bastion.name_any(), e);
            }
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[path = "bastion_controller_tests.rs"]
mod bastion_controller_tests;
