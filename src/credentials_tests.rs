// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `credentials.rs`

#[cfg(test)]
mod tests {
    use crate::credentials::credentials_from_secret;
    use crate::crd::SecretReference;
    use crate::errors::BastionError;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    fn secret_ref() -> SecretReference {
        SecretReference {
            name: "cloud-credentials".to_string(),
            namespace: "ops".to_string(),
        }
    }

    fn secret(entries: &[(&str, &[u8])]) -> Secret {
        let data: BTreeMap<String, ByteString> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), ByteString(v.to_vec())))
            .collect();
        Secret {
            data: Some(data),
            ..Secret::default()
        }
    }

    #[test]
    fn test_reads_both_keys() {
        let secret = secret(&[("accessKeyID", b"AKID"), ("accessKeySecret", b"s3cret")]);

        let credentials = credentials_from_secret(&secret_ref(), &secret).unwrap();
        assert_eq!(credentials.access_key_id, "AKID");
        assert_eq!(credentials.access_key_secret, "s3cret");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secret = secret(&[("accessKeyID", b"AKID"), ("accessKeySecret", b"s3cret")]);

        let credentials = credentials_from_secret(&secret_ref(), &secret).unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_missing_key_is_named() {
        let secret = secret(&[("accessKeyID", b"AKID")]);

        let err = credentials_from_secret(&secret_ref(), &secret).unwrap_err();
        assert!(matches!(err, BastionError::Credentials(_)));
        assert!(err.to_string().contains("accessKeySecret"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let secret = secret(&[("accessKeyID", b""), ("accessKeySecret", b"s3cret")]);

        let err = credentials_from_secret(&secret_ref(), &secret).unwrap_err();
        assert!(err.to_string().contains("accessKeyID"));
    }

    #[test]
    fn test_secret_without_data() {
        let err = credentials_from_secret(&secret_ref(), &Secret::default()).unwrap_err();
        assert!(err.to_string().contains("ops/cloud-credentials"));
    }
}
