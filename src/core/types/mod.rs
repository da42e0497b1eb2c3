//! Core data types shared across the pipeline

pub mod availability;
pub mod metrics;

pub use availability::Availability;
pub use metrics::{METRIC_NAMES, MetricSeries, MetricSnapshot};

/// Server name; identifies the Azure resource and its `_db_creds` key
pub type InstanceName = String;
