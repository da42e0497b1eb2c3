//! Dynatrace metric publishing
//!
//! One best-effort POST per instance to the custom-device endpoint. The
//! outcome is reported back for the tick summary and never raised.

pub mod payload;

pub use payload::{CustomDevicePayload, DataPoint, PointValue, Series};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::config::{DynatraceConfig, DynatraceTarget, SharedSource};
use crate::core::traits::MetricsSink;
use crate::core::types::{Availability, MetricSnapshot};
use crate::utils::current_timestamp_millis;
use crate::utils::error::Result;

/// Result of one publish attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 2xx from Dynatrace
    Delivered { status: u16 },
    /// Dynatrace answered with a non-success status
    Rejected { status: u16, body: String },
    /// The request could not be built or sent
    Failed(String),
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Posts custom-device payloads to Dynatrace
#[derive(Clone)]
pub struct DynatracePublisher {
    source: SharedSource,
    http_client: reqwest::Client,
}

impl DynatracePublisher {
    pub fn new(config: &DynatraceConfig, source: SharedSource) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            source,
            http_client,
        })
    }

    async fn send(
        &self,
        instance_name: &str,
        payload: &CustomDevicePayload,
    ) -> Result<PublishOutcome> {
        let target = DynatraceTarget::resolve(self.source.as_ref())?;
        let url = target.custom_device_url(instance_name);
        let body = serde_json::to_string(payload)?;
        debug!("Posting to {}: {}", url, body);

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, target.authorization())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = format!("{:?}", response.headers());
        let text = response.text().await?;

        info!("STATUS: {}", status.as_u16());
        info!("HEADERS: {}", headers);
        info!("BODY: {}", text);

        if status.is_success() {
            Ok(PublishOutcome::Delivered {
                status: status.as_u16(),
            })
        } else {
            Ok(PublishOutcome::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

#[async_trait]
impl MetricsSink for DynatracePublisher {
    async fn publish(
        &self,
        instance_name: &str,
        snapshot: &MetricSnapshot,
        availability: Availability,
    ) -> PublishOutcome {
        let payload =
            CustomDevicePayload::build(snapshot, availability, current_timestamp_millis());

        match self.send(instance_name, &payload).await {
            Ok(outcome) => {
                if let PublishOutcome::Rejected { status, .. } = &outcome {
                    warn!("Dynatrace rejected metrics for {} ({})", instance_name, status);
                }
                outcome
            }
            Err(e) => {
                warn!("problem with request for {}: {}", instance_name, e);
                PublishOutcome::Failed(e.to_string())
            }
        }
    }
}
