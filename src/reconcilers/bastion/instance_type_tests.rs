// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `instance_type.rs`

#[cfg(test)]
mod tests {
    use crate::errors::BastionError;
    use crate::provider::fake::FakeProvider;
    use crate::reconcilers::bastion::instance_type::select_instance_type;

    fn machine_types(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[tokio::test]
    async fn test_single_core_type_preferred() {
        let fake = FakeProvider::default();
        fake.set_available(1, "ecs.t5-lc1m1.small", "Available");
        fake.set_available(2, "ecs.t5-lc1m2.large", "Available");

        let selected = select_instance_type(&fake, "zone-a", "prod-eu", &machine_types(&["m"]))
            .await
            .unwrap();

        assert_eq!(selected, "ecs.t5-lc1m1.small");
        assert_eq!(fake.probed_cores(), vec![1]);
    }

    #[tokio::test]
    async fn test_sold_out_single_core_falls_through_to_two_cores() {
        let fake = FakeProvider::default();
        fake.set_available(1, "ecs.t5-lc1m1.small", "SoldOut");
        fake.set_available(2, "ecs.t5-lc1m2.large", "Available");

        let selected = select_instance_type(&fake, "zone-a", "prod-eu", &[])
            .await
            .unwrap();

        assert_eq!(selected, "ecs.t5-lc1m2.large");
        assert_eq!(fake.probed_cores(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_falls_back_to_first_machine_type() {
        let fake = FakeProvider::default();

        let selected = select_instance_type(
            &fake,
            "zone-a",
            "prod-eu",
            &machine_types(&["m.small", "m.large"]),
        )
        .await
        .unwrap();

        assert_eq!(selected, "m.small");
        assert_eq!(fake.probed_cores(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_no_machine_types_is_error() {
        let fake = FakeProvider::default();

        let err = select_instance_type(&fake, "zone-a", "prod-eu", &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BastionError::MissingMachineTypes { ref cluster } if cluster == "prod-eu"
        ));
        assert!(err.is_configuration_error());
    }
}
