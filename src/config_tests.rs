// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::time::Duration;

    use crate::config::Config;
    use crate::context::RequeuePolicy;

    #[test]
    fn test_defaults() {
        let config =
            Config::try_parse_from(["bastion", "--provider-endpoint", "https://gw.example.com"])
                .unwrap();

        assert_eq!(config.provider_endpoint, "https://gw.example.com");
        assert_eq!(config.provider_timeout(), Duration::from_secs(30));
        assert_eq!(config.metrics_port, 8080);
        assert_eq!(config.requeue_policy(), RequeuePolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "bastion",
            "--provider-endpoint",
            "https://gw.example.com",
            "--provider-timeout-secs",
            "5",
            "--metrics-port",
            "9090",
            "--error-requeue-secs",
            "15",
            "--ready-requeue-secs",
            "60",
        ])
        .unwrap();

        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(
            config.requeue_policy(),
            RequeuePolicy {
                ready: Duration::from_secs(60),
                error: Duration::from_secs(15),
            }
        );
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        let result = Config::try_parse_from([
            "bastion",
            "--provider-endpoint",
            "https://gw.example.com",
            "--provider-timeout-secs",
            "soon",
        ]);

        assert!(result.is_err());
    }
}
