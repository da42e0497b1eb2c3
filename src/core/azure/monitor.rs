//! Azure Monitor metrics queries

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::auth::AzureCredential;
use super::error::check_response;
use super::types::MetricsResponse;
use crate::config::{AccountAccessConfig, AzureConfig, SharedSource};
use crate::core::traits::MetricsSource;
use crate::core::types::{METRIC_NAMES, MetricSeries};
use crate::utils::error::{RelayError, Result};

const SERVICE: &str = "Azure Monitor";

/// `start/end` ISO-8601 interval ending at `now`
pub fn timespan(now: DateTime<Utc>, window: Duration) -> Result<String> {
    let window = chrono::Duration::from_std(window)
        .map_err(|e| RelayError::config(format!("Invalid metrics window: {}", e)))?;
    let start = now - window;
    Ok(format!(
        "{}/{}",
        start.to_rfc3339_opts(SecondsFormat::Millis, true),
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    ))
}

/// Fetches the trailing window of utilization metrics per server
#[derive(Clone)]
pub struct AzureMetricsFetcher {
    source: SharedSource,
    credential: AzureCredential,
    resource_manager_endpoint: String,
    api_version: String,
    window: Duration,
    http_client: reqwest::Client,
}

impl AzureMetricsFetcher {
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
            api_version: config.metrics_api_version.clone(),
            window: config.metrics_window(),
            http_client,
        })
    }

    /// Fetch the series list for `instance_name`, propagating failures
    pub async fn try_fetch(&self, instance_name: &str) -> Result<MetricSeries> {
        let account = AccountAccessConfig::resolve(self.source.as_ref())?;
        let token = self.credential.get_token(&account).await?;

        let url = format!(
            "{}{}/providers/Microsoft.Insights/metrics",
            self.resource_manager_endpoint,
            account.server_resource_id(instance_name)
        );
        let timespan = timespan(Utc::now(), self.window)?;
        debug!("Querying metrics for {} over {}", instance_name, timespan);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("api-version", self.api_version.as_str()),
                ("metricnames", METRIC_NAMES),
                ("aggregation", "Average"),
                ("timespan", timespan.as_str()),
            ])
            .send()
            .await?;

        let body = check_response(SERVICE, response).await?;
        let metrics: MetricsResponse = serde_json::from_str(&body)?;

        info!(
            "Received {} metric series for {}",
            metrics.value.len(),
            instance_name
        );
        Ok(metrics.value)
    }
}

#[async_trait]
impl MetricsSource for AzureMetricsFetcher {
    async fn fetch_metrics(&self, instance_name: &str) -> Option<MetricSeries> {
        match self.try_fetch(instance_name).await {
            Ok(series) => Some(series),
            Err(e) => {
                warn!("Error fetching metrics for {}: {}", instance_name, e);
                if e.is_auth_error() {
                    self.credential.invalidate().await;
                }
                None
            }
        }
    }
}
