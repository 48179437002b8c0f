// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `ensure.rs`

#[cfg(test)]
mod tests {
    use crate::crd::SecretReference;
    use crate::options::Options;
    use crate::provider::fake::FakeProvider;
    use crate::provider::{CreateInstanceRequest, Instance, InstanceStatus};
    use crate::reconcilers::bastion::ensure::{ensure_compute_instance, ensure_security_group};
    use crate::reconcilers::bastion::types::NetworkContext;

    fn options() -> Options {
        Options {
            bastion_instance_name: "shoot--prod--eu-debug-session-bastion-6fe46".to_string(),
            security_group_name: "shoot--prod--eu-debug-session-bastion-6fe46-sg".to_string(),
            workload_security_group_name: "shoot--prod--eu-sg".to_string(),
            network_name: "shoot--prod--eu-vpc".to_string(),
            region: "eu-central-1".to_string(),
            image_id: "m-0001".to_string(),
            user_data: "IyEvYmluL2Jhc2gKZWNobyBoZWxsbw==".to_string(),
            ingress: Vec::new(),
            secret_ref: SecretReference {
                name: "cloud-credentials".to_string(),
                namespace: "ops".to_string(),
            },
        }
    }

    fn network() -> NetworkContext {
        NetworkContext {
            vpc_id: "vpc-1".to_string(),
            subnet_id: "vsw-1".to_string(),
            zone_id: "zone-a".to_string(),
        }
    }

    #[tokio::test]
    async fn test_security_group_created_once() {
        let fake = FakeProvider::default();

        let first = ensure_security_group(&fake, "bastion-sg", "vpc-1")
            .await
            .unwrap();
        let second = ensure_security_group(&fake, "bastion-sg", "vpc-1")
            .await
            .unwrap();

        assert_eq!(first, "sg-1");
        assert_eq!(second, first);
        assert_eq!(fake.calls().create_security_group, 1);
    }

    #[tokio::test]
    async fn test_existing_security_group_is_returned() {
        let fake = FakeProvider::default();
        fake.add_security_group("sg-existing", "bastion-sg");

        let id = ensure_security_group(&fake, "bastion-sg", "vpc-1")
            .await
            .unwrap();

        assert_eq!(id, "sg-existing");
        assert_eq!(fake.calls().create_security_group, 0);
    }

    #[tokio::test]
    async fn test_instance_created_with_request_fields() {
        let fake = FakeProvider::default();
        let options = options();

        let id = ensure_compute_instance(&fake, &options, "sg-1", &network(), "ecs.t5-lc1m1.small")
            .await
            .unwrap();

        assert_eq!(id, "i-1");
        assert_eq!(
            fake.created_instances(),
            vec![CreateInstanceRequest {
                instance_name: options.bastion_instance_name.clone(),
                security_group_id: "sg-1".to_string(),
                image_id: "m-0001".to_string(),
                subnet_id: "vsw-1".to_string(),
                zone_id: "zone-a".to_string(),
                instance_type: "ecs.t5-lc1m1.small".to_string(),
                user_data: "IyEvYmluL2Jhc2gKZWNobyBoZWxsbw==".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_instance_created_once() {
        let fake = FakeProvider::default();
        let options = options();

        let first = ensure_compute_instance(&fake, &options, "sg-1", &network(), "small")
            .await
            .unwrap();
        let second = ensure_compute_instance(&fake, &options, "sg-1", &network(), "large")
            .await
            .unwrap();

        assert_eq!(second, first);
        assert_eq!(fake.calls().create_instance, 1);
    }

    #[tokio::test]
    async fn test_existing_instance_is_not_modified() {
        let fake = FakeProvider::default();
        let options = options();
        fake.add_instance(Instance {
            instance_id: "i-existing".to_string(),
            instance_name: options.bastion_instance_name.clone(),
            status: InstanceStatus::Stopped,
            private_ip_addresses: Vec::new(),
        });

        let id = ensure_compute_instance(&fake, &options, "sg-1", &network(), "small")
            .await
            .unwrap();

        assert_eq!(id, "i-existing");
        assert!(fake.created_instances().is_empty());
    }
}
