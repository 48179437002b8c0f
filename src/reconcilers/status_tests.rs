// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status.rs`

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::LoadBalancerIngress;
    use serde_json::json;

    use crate::reconcilers::status::status_patch;

    fn ingress(ip: &str) -> LoadBalancerIngress {
        LoadBalancerIngress {
            ip: Some(ip.to_string()),
            ..LoadBalancerIngress::default()
        }
    }

    #[test]
    fn test_patch_carries_ingress_and_generation() {
        let patch = status_patch(Some(&ingress("198.51.100.9")), Some(3));

        assert_eq!(
            patch,
            json!({
                "status": {
                    "ingress": { "ip": "198.51.100.9" },
                    "observedGeneration": 3,
                }
            })
        );
    }

    #[test]
    fn test_patch_clears_absent_ingress() {
        let patch = status_patch(None, Some(1));

        assert_eq!(patch["status"]["ingress"], serde_json::Value::Null);
    }

    #[test]
    fn test_patch_touches_only_owned_fields() {
        let patch = status_patch(Some(&ingress("198.51.100.9")), None);

        let status = patch["status"].as_object().unwrap();
        let mut keys: Vec<&str> = status.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["ingress", "observedGeneration"]);
    }
}
