// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pass-scoped types of `Bastion` reconciliation.

use std::fmt;
use std::time::Duration;

use super::endpoints::BastionEndpoints;
use crate::options::Options;

/// Input of one reconcile pass. Read-only for the whole pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileRequest {
    /// `namespace/name` of the `Bastion`, used for logging
    pub bastion: String,
    /// Name of the workload cluster the bastion belongs to
    pub cluster: String,
    pub options: Options,
    /// Machine types declared for the workload, in order of preference
    pub machine_types: Vec<String>,
}

/// Network placement of the bastion, resolved once per pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkContext {
    pub vpc_id: String,
    pub subnet_id: String,
    pub zone_id: String,
}

/// Request to run the pass again later. Not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryAfter {
    pub after: Duration,
    /// Short slug used as the requeue metric label
    pub reason: &'static str,
    /// Human-readable explanation for logs
    pub cause: String,
}

impl RetryAfter {
    pub fn new(after: Duration, reason: &'static str, cause: impl Into<String>) -> Self {
        Self {
            after,
            reason,
            cause: cause.into(),
        }
    }
}

impl fmt::Display for RetryAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (retry in {}s)", self.cause, self.after.as_secs())
    }
}

/// Non-error result of a reconcile pass.
///
/// Terminal failures are the `Err` side of the pass result.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileOutcome {
    /// Endpoints were published
    Ready(BastionEndpoints),
    /// Something is not ready yet; run the pass again after the delay
    Retry(RetryAfter),
}

#[cfg(test)]
impl ReconcileOutcome {
    pub(crate) fn retry(after: Duration, reason: &'static str, cause: impl Into<String>) -> Self {
        Self::Retry(RetryAfter::new(after, reason, cause))
    }
}
