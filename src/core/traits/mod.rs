//! Core traits module
//!
//! One trait per pipeline stage. The orchestrator only sees these, so each
//! stage can be replaced by a fake in tests.

use async_trait::async_trait;

use crate::core::publisher::PublishOutcome;
use crate::core::types::{Availability, InstanceName, MetricSeries, MetricSnapshot};

/// Finds the instances to monitor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// Names of instances tagged for monitoring. Never fails; errors yield an empty list.
    async fn discover(&self) -> Vec<InstanceName>;
}

/// Determines whether an instance is primary/writable
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn probe(&self, instance_name: &str) -> Availability;
}

/// Pulls recent utilization metrics for an instance
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// `None` when the metrics could not be fetched
    async fn fetch_metrics(&self, instance_name: &str) -> Option<MetricSeries>;
}

/// Delivers one instance's values to the monitoring vendor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn publish(
        &self,
        instance_name: &str,
        snapshot: &MetricSnapshot,
        availability: Availability,
    ) -> PublishOutcome;
}
