// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider credentials read from a Kubernetes `Secret`.
//!
//! The secret referenced by a `WorkloadCluster` must carry the keys
//! `accessKeyID` and `accessKeySecret`. Values are never logged.

use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::debug;

use crate::constants::{SECRET_KEY_ACCESS_KEY_ID, SECRET_KEY_ACCESS_KEY_SECRET};
use crate::crd::SecretReference;
use crate::errors::BastionError;
use crate::provider::Credentials;

/// Fetch the secret behind `secret_ref` and extract the provider credentials.
///
/// # Errors
///
/// Returns [`BastionError::Kube`] if the secret cannot be read, or
/// [`BastionError::Credentials`] if a key is missing or malformed.
pub async fn read_credentials(
    client: &Client,
    secret_ref: &SecretReference,
) -> Result<Credentials, BastionError> {
    let api: Api<Secret> = Api::namespaced(client.clone(), &secret_ref.namespace);
    let secret = api
        .get(&secret_ref.name)
        .await
        .map_err(|source| BastionError::Kube {
            operation: "read provider credentials secret",
            source,
        })?;

    debug!(
        secret = %secret_ref.name,
        namespace = %secret_ref.namespace,
        "Read provider credentials secret"
    );

    credentials_from_secret(secret_ref, &secret)
}

/// Extract provider credentials from secret data.
///
/// # Errors
///
/// Returns [`BastionError::Credentials`] naming the secret and key when the
/// secret has no data, or a key is missing, empty, or not UTF-8.
pub fn credentials_from_secret(
    secret_ref: &SecretReference,
    secret: &Secret,
) -> Result<Credentials, BastionError> {
    let data = secret.data.as_ref().ok_or_else(|| {
        BastionError::Credentials(format!(
            "secret {}/{} has no data",
            secret_ref.namespace, secret_ref.name
        ))
    })?;

    let read_key = |key: &str| -> Result<String, BastionError> {
        let value = data.get(key).ok_or_else(|| {
            BastionError::Credentials(format!(
                "secret {}/{} is missing key '{key}'",
                secret_ref.namespace, secret_ref.name
            ))
        })?;

        let value = String::from_utf8(value.0.clone()).map_err(|_| {
            BastionError::Credentials(format!(
                "secret {}/{} key '{key}' is not valid UTF-8",
                secret_ref.namespace, secret_ref.name
            ))
        })?;

        if value.is_empty() {
            return Err(BastionError::Credentials(format!(
                "secret {}/{} key '{key}' is empty",
                secret_ref.namespace, secret_ref.name
            )));
        }

        Ok(value)
    };

    Ok(Credentials {
        access_key_id: read_key(SECRET_KEY_ACCESS_KEY_ID)?,
        access_key_secret: read_key(SECRET_KEY_ACCESS_KEY_SECRET)?,
    })
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
