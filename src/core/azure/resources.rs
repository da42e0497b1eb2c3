//! Instance discovery through Azure Resource Manager

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::auth::AzureCredential;
use super::error::check_response;
use super::types::{ServerListPage, ServerResource};
use crate::config::{AccountAccessConfig, AzureConfig, SharedSource};
use crate::core::traits::InstanceSource;
use crate::core::types::InstanceName;
use crate::utils::error::Result;

/// Tag that opts a server into monitoring
pub const MONITORING_TAG: &str = "EnableMonitoring";

const SERVICE: &str = "Azure Resource Manager";

/// True only for an exact string value of `"true"`
pub fn is_monitoring_enabled(tags: Option<&HashMap<String, serde_json::Value>>) -> bool {
    matches!(
        tags.and_then(|tags| tags.get(MONITORING_TAG)),
        Some(serde_json::Value::String(value)) if value == "true"
    )
}

/// Lists PostgreSQL servers in the configured resource group
#[derive(Clone)]
pub struct AzureInstanceDiscoverer {
    source: SharedSource,
    credential: AzureCredential,
    resource_manager_endpoint: String,
    api_version: String,
    http_client: reqwest::Client,
}

impl AzureInstanceDiscoverer {
    pub fn new(
        config: &AzureConfig,
        source: SharedSource,
        credential: AzureCredential,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            source,
            credential,
            resource_manager_endpoint: config
                .resource_manager_endpoint
                .trim_end_matches('/')
                .to_string(),
            api_version: config.servers_api_version.clone(),
            http_client,
        })
    }

    /// Discover monitored instances, propagating failures
    pub async fn try_discover(&self) -> Result<Vec<InstanceName>> {
        let account = AccountAccessConfig::resolve(self.source.as_ref())?;
        let token = self.credential.get_token(&account).await?;

        let servers = self.list_servers(&account, &token).await?;
        info!("Checking {} server(s) one by one", servers.len());

        let mut instances = Vec::new();
        for server in servers {
            if is_monitoring_enabled(server.tags.as_ref()) {
                info!("Monitoring is enabled for ===> {}", server.name);
                instances.push(server.name);
            }
        }

        Ok(instances)
    }

    /// List every server in the resource group, following `nextLink`
    async fn list_servers(
        &self,
        account: &AccountAccessConfig,
        token: &str,
    ) -> Result<Vec<ServerResource>> {
        let first_page = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.DBforPostgreSQL/servers?api-version={}",
            self.resource_manager_endpoint,
            account.subscription_id,
            account.resource_group_name,
            self.api_version
        );

        let mut servers = Vec::new();
        let mut next = Some(first_page);

        while let Some(url) = next.take() {
            debug!("Listing servers: {}", url);
            let response = self.http_client.get(&url).bearer_auth(token).send().await?;
            let body = check_response(SERVICE, response).await?;
            let page: ServerListPage = serde_json::from_str(&body)?;

            servers.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        Ok(servers)
    }
}

#[async_trait]
impl InstanceSource for AzureInstanceDiscoverer {
    async fn discover(&self) -> Vec<InstanceName> {
        info!("Finding all the instances ..");
        match self.try_discover().await {
            Ok(instances) => instances,
            Err(e) => {
                warn!("Error in finding monitored instance(s): {}", e);
                if e.is_auth_error() {
                    self.credential.invalidate().await;
                }
                Vec::new()
            }
        }
    }
}
