// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! JSON gateway binding of the [`CloudProvider`] trait.
//!
//! Talks to a cloud gateway exposing the provider operations as region-scoped
//! REST resources under `{endpoint}/api/v1/regions/{region}/`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | lookup security group | `GET security-groups?name=` |
//! | create security group | `POST security-groups` |
//! | describe rules | `GET security-groups/{id}/rules?direction=` |
//! | create rule | `POST security-groups/{id}/{direction}-rules` |
//! | revoke rule | `POST security-groups/{id}/{direction}-rules/revoke` |
//! | lookup instance | `GET instances?name=` |
//! | create instance | `POST instances` |
//! | allocate public address | `POST instances/{id}/public-address` |
//! | instance type availability | `GET instance-types/availability?cores=&zoneId=` |
//! | lookup network | `GET networks?name=` |
//! | lookup subnet | `GET subnets/{id}` |
//!
//! Requests authenticate with HTTP basic auth built from the credentials.
//! There is no retry at this layer: a failed call fails the reconcile pass and
//! the controller re-runs the whole pass later.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::{
    AvailabilityInfo, CloudProvider, CreateInstanceRequest, Credentials, EgressRule, IngressRule,
    Instance, NetworkInfo, Permission, ProviderFactory, ProviderResult, PublicAddress,
    RuleDirection, RuleMatch, SecurityGroup, SubnetInfo,
};
use crate::errors::ProviderError;

/// Provider handle bound to one region of a cloud gateway.
#[derive(Clone, Debug)]
pub struct HttpCloudProvider {
    client: HttpClient,
    base_url: Url,
    region: String,
    credentials: Credentials,
}

impl HttpCloudProvider {
    /// Create a provider handle.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Url`] if `endpoint` is not a valid base URL.
    pub fn new(
        client: HttpClient,
        endpoint: &str,
        region: &str,
        credentials: Credentials,
    ) -> ProviderResult<Self> {
        let base_url = Url::parse(&format!("{}/", endpoint.trim_end_matches('/')))?;
        Ok(Self {
            client,
            base_url,
            region: region.to_string(),
            credentials,
        })
    }

    /// Build a region-scoped URL.
    pub(crate) fn url(&self, path: &str) -> ProviderResult<Url> {
        Ok(self
            .base_url
            .join(&format!("api/v1/regions/{}/{}", self.region, path))?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            &self.credentials.access_key_id,
            Some(&self.credentials.access_key_secret),
        )
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> ProviderResult<String> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                url = %url,
                status = %status,
                error = %body,
                "Provider API request failed"
            );
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(
            url = %url,
            status = %status,
            response_len = body.len(),
            "Provider API request successful"
        );
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ProviderResult<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a list filtered by `name` and return the first exact name match.
    async fn find_by_name<T: DeserializeOwned>(
        &self,
        path: &str,
        name: &str,
        name_of: impl Fn(&T) -> &str,
    ) -> ProviderResult<Option<T>> {
        let mut url = self.url(path)?;
        url.query_pairs_mut().append_pair("name", name);

        let items: Vec<T> = self.fetch(self.client.get(url)).await?;
        Ok(items.into_iter().find(|item| name_of(item) == name))
    }
}

#[async_trait]
impl CloudProvider for HttpCloudProvider {
    async fn lookup_security_group(&self, name: &str) -> ProviderResult<Option<SecurityGroup>> {
        self.find_by_name("security-groups", name, |sg: &SecurityGroup| {
            sg.security_group_name.as_str()
        })
        .await
    }

    async fn create_security_group(
        &self,
        network_id: &str,
        name: &str,
    ) -> ProviderResult<SecurityGroup> {
        let url = self.url("security-groups")?;
        let body = serde_json::json!({ "vpcId": network_id, "securityGroupName": name });
        self.fetch(self.client.post(url).json(&body)).await
    }

    async fn lookup_instance(&self, name: &str) -> ProviderResult<Option<Instance>> {
        self.find_by_name("instances", name, |instance: &Instance| {
            instance.instance_name.as_str()
        })
        .await
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> ProviderResult<Instance> {
        let url = self.url("instances")?;
        self.fetch(self.client.post(url).json(request)).await
    }

    async fn list_instance_type_availability(
        &self,
        core_count: u32,
        zone_id: &str,
    ) -> ProviderResult<AvailabilityInfo> {
        let mut url = self.url("instance-types/availability")?;
        url.query_pairs_mut()
            .append_pair("cores", &core_count.to_string())
            .append_pair("zoneId", zone_id);
        self.fetch(self.client.get(url)).await
    }

    async fn describe_rules(
        &self,
        security_group_id: &str,
        direction: RuleDirection,
    ) -> ProviderResult<Vec<Permission>> {
        let mut url = self.url(&format!("security-groups/{security_group_id}/rules"))?;
        url.query_pairs_mut()
            .append_pair("direction", direction.as_str());
        self.fetch(self.client.get(url)).await
    }

    async fn create_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &IngressRule,
    ) -> ProviderResult<()> {
        let url = self.url(&format!("security-groups/{security_group_id}/ingress-rules"))?;
        self.execute(self.client.post(url).json(rule)).await?;
        Ok(())
    }

    async fn revoke_ingress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()> {
        let url = self.url(&format!(
            "security-groups/{security_group_id}/ingress-rules/revoke"
        ))?;
        self.execute(self.client.post(url).json(rule)).await?;
        Ok(())
    }

    async fn create_egress_rule(
        &self,
        security_group_id: &str,
        rule: &EgressRule,
    ) -> ProviderResult<()> {
        let url = self.url(&format!("security-groups/{security_group_id}/egress-rules"))?;
        self.execute(self.client.post(url).json(rule)).await?;
        Ok(())
    }

    async fn revoke_egress_rule(
        &self,
        security_group_id: &str,
        rule: &RuleMatch,
    ) -> ProviderResult<()> {
        let url = self.url(&format!(
            "security-groups/{security_group_id}/egress-rules/revoke"
        ))?;
        self.execute(self.client.post(url).json(rule)).await?;
        Ok(())
    }

    async fn allocate_public_address(&self, instance_id: &str) -> ProviderResult<PublicAddress> {
        let url = self.url(&format!("instances/{instance_id}/public-address"))?;
        self.fetch(self.client.post(url)).await
    }

    async fn lookup_network(&self, name: &str) -> ProviderResult<Option<NetworkInfo>> {
        self.find_by_name("networks", name, |network: &NetworkInfo| {
            network.name.as_str()
        })
        .await
    }

    async fn lookup_subnet(&self, subnet_id: &str) -> ProviderResult<Option<SubnetInfo>> {
        let url = self.url(&format!("subnets/{subnet_id}"))?;
        match self.fetch(self.client.get(url)).await {
            Ok(subnet) => Ok(Some(subnet)),
            Err(ProviderError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Factory producing [`HttpCloudProvider`] handles that share one HTTP client.
#[derive(Clone, Debug)]
pub struct HttpProviderFactory {
    client: HttpClient,
    endpoint: String,
}

impl HttpProviderFactory {
    /// Create a factory for the gateway at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> ProviderResult<Self> {
        Url::parse(endpoint)?;
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn new_provider(
        &self,
        region: &str,
        credentials: &Credentials,
    ) -> ProviderResult<Arc<dyn CloudProvider>> {
        let provider = HttpCloudProvider::new(
            self.client.clone(),
            &self.endpoint,
            region,
            credentials.clone(),
        )?;
        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
