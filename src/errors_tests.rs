// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `errors.rs`

#[cfg(test)]
mod tests {
    use crate::errors::{BastionError, ProviderError};

    fn api_error() -> ProviderError {
        ProviderError::Api {
            status: 500,
            message: "InternalError".to_string(),
        }
    }

    #[test]
    fn test_provider_error_carries_operation_and_resource() {
        let err = BastionError::provider("create security group", "bastion-sg")(api_error());

        let message = err.to_string();
        assert!(message.contains("create security group"));
        assert!(message.contains("bastion-sg"));
        assert!(message.contains("HTTP 500"));
        assert!(!err.is_configuration_error());
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn test_rule_error_names_the_rule() {
        let err = BastionError::Rule {
            action: "add",
            direction: "egress",
            description: "Bastion egress deny all".to_string(),
            source: api_error(),
        };

        assert_eq!(
            err.to_string(),
            "failed to add security group egress rule 'Bastion egress deny all': provider API returned HTTP 500: InternalError"
        );
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        let errors = [
            BastionError::MissingMachineTypes {
                cluster: "prod".to_string(),
            },
            BastionError::WorkloadSecurityGroupNotFound {
                name: "prod-sg".to_string(),
            },
            BastionError::MissingPrivateIp {
                name: "bastion".to_string(),
            },
            BastionError::EmptyResponse {
                operation: "create instance",
                resource: "bastion".to_string(),
            },
        ];

        for err in &errors {
            assert!(err.is_configuration_error(), "{err} should be a configuration error");
            assert_eq!(err.kind(), "configuration_error");
        }
    }

    #[test]
    fn test_state_regression_is_not_configuration_error() {
        let err = BastionError::InstanceNotFound {
            name: "bastion".to_string(),
        };

        assert!(!err.is_configuration_error());
        assert_eq!(err.kind(), "state_error");
    }
}
