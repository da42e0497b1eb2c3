//! Name-resolved metric snapshot

use crate::core::azure::types::Metric;
use crate::utils::error::{RelayError, Result};
use serde::Serialize;

pub const ACTIVE_CONNECTIONS: &str = "active_connections";
pub const STORAGE_USED: &str = "storage_used";
pub const CPU_PERCENT: &str = "cpu_percent";

/// Metric names requested from Azure Monitor, comma separated
pub const METRIC_NAMES: &str = "active_connections,storage_used,cpu_percent";

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Raw series list exactly as Azure Monitor returned it
pub type MetricSeries = Vec<Metric>;

/// The three values published per instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub active_connections: f64,
    pub storage_used_bytes: f64,
    pub cpu_percent: f64,
}

impl MetricSnapshot {
    /// Resolve the snapshot by metric name; order of `series` is irrelevant
    pub fn from_series(series: &[Metric]) -> Result<Self> {
        let lookup = |name: &str| -> Result<f64> {
            series
                .iter()
                .find(|metric| metric.id() == name)
                .ok_or_else(|| RelayError::metrics_unavailable(format!("{} not returned", name)))?
                .first_average()
                .ok_or_else(|| RelayError::metrics_unavailable(format!("{} has no data", name)))
        };

        Ok(Self {
            active_connections: lookup(ACTIVE_CONNECTIONS)?,
            storage_used_bytes: lookup(STORAGE_USED)?,
            cpu_percent: lookup(CPU_PERCENT)?,
        })
    }

    /// Used storage in GiB
    pub fn storage_used_gib(&self) -> f64 {
        self.storage_used_bytes / BYTES_PER_GIB
    }
}
