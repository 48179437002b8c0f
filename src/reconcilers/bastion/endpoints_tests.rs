// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `endpoints.rs`

#[cfg(test)]
mod tests {
    use crate::reconcilers::bastion::endpoints::{
        address_to_ingress, ingress_ready, BastionEndpoints,
    };

    #[test]
    fn test_address_to_ingress_absent_only_without_inputs() {
        assert!(address_to_ingress(None, None).is_none());

        let ip_only = address_to_ingress(None, Some("1.2.3.4")).unwrap();
        assert_eq!(ip_only.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(ip_only.hostname, None);

        let host_only = address_to_ingress(Some("bastion.example.com"), None).unwrap();
        assert_eq!(host_only.hostname.as_deref(), Some("bastion.example.com"));
        assert_eq!(host_only.ip, None);
    }

    #[test]
    fn test_empty_address_is_present_but_not_ready() {
        let ingress = address_to_ingress(None, Some(""));
        assert!(ingress.is_some());
        assert!(!ingress_ready(ingress.as_ref()));
    }

    #[test]
    fn test_both_sides_absent_not_ready() {
        assert!(!BastionEndpoints::default().ready());
    }

    #[test]
    fn test_one_side_populated_not_ready() {
        let endpoints = BastionEndpoints {
            private: None,
            public: address_to_ingress(None, Some("1.2.3.4")),
        };
        assert!(!endpoints.ready());

        let endpoints = BastionEndpoints {
            private: address_to_ingress(None, Some("10.0.0.5")),
            public: None,
        };
        assert!(!endpoints.ready());
    }

    #[test]
    fn test_both_sides_populated_ready() {
        let endpoints = BastionEndpoints {
            private: address_to_ingress(None, Some("10.0.0.5")),
            public: address_to_ingress(None, Some("1.2.3.4")),
        };
        assert!(endpoints.ready());

        let endpoints = BastionEndpoints {
            private: address_to_ingress(Some("bastion.internal"), None),
            public: address_to_ingress(Some("bastion.example.com"), None),
        };
        assert!(endpoints.ready());
    }
}
