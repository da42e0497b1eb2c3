//! Dynatrace custom-device payload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{Availability, MetricSnapshot};

pub const DEVICE_TAG: &str = "Azure HyperScalar Instance";
pub const DEVICE_TYPE: &str = "HyperScalar-Azure-Postgresql";
pub const INSTANCE_TYPE_PROPERTY: &str = "InstanceType";
pub const INSTANCE_TYPE: &str = "PostgreSQL on Microsoft Azure";

pub const CPU_SERIES: &str = "custom:postgresql.cpu.utilization";
pub const CONNECTIONS_SERIES: &str = "custom:postgresql.Instance.DBConnections";
pub const STORAGE_SERIES: &str = "custom:postgresql.Instance.UsedSpace";
pub const AVAILABILITY_SERIES: &str = "custom:postgresql.Instance.Availability";

/// Body of `POST /api/v1/entity/infrastructure/custom/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDevicePayload {
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub device_type: String,
    pub properties: BTreeMap<String, String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub timeseries_id: String,
    pub dimensions: BTreeMap<String, String>,
    pub data_points: Vec<DataPoint>,
}

/// `[timestampMillis, value]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint(pub i64, pub Option<PointValue>);

/// Integers stay integers on the wire (`1`, not `1.0`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointValue {
    Integer(i64),
    Float(f64),
}

impl Series {
    /// One dimension and two identical points, as the custom-device API expects
    fn new(
        timeseries_id: &str,
        dimension: (&str, &str),
        value: Option<PointValue>,
        timestamp_millis: i64,
    ) -> Self {
        let point = DataPoint(timestamp_millis, value);
        Self {
            timeseries_id: timeseries_id.to_string(),
            dimensions: BTreeMap::from([(dimension.0.to_string(), dimension.1.to_string())]),
            data_points: vec![point, point],
        }
    }
}

impl CustomDevicePayload {
    pub fn build(
        snapshot: &MetricSnapshot,
        availability: Availability,
        timestamp_millis: i64,
    ) -> Self {
        let float = |v: f64| Some(PointValue::Float(v));

        Self {
            tags: vec![DEVICE_TAG.to_string()],
            device_type: DEVICE_TYPE.to_string(),
            properties: BTreeMap::from([(
                INSTANCE_TYPE_PROPERTY.to_string(),
                INSTANCE_TYPE.to_string(),
            )]),
            series: vec![
                Series::new(
                    CPU_SERIES,
                    ("usedcpu", "currentCPUUsage"),
                    float(snapshot.cpu_percent),
                    timestamp_millis,
                ),
                Series::new(
                    CONNECTIONS_SERIES,
                    ("dbconnections", "Current Database Connections"),
                    float(snapshot.active_connections),
                    timestamp_millis,
                ),
                Series::new(
                    STORAGE_SERIES,
                    ("usedstoragespace", "Current Usage of Disk Space"),
                    float(snapshot.storage_used_gib()),
                    timestamp_millis,
                ),
                Series::new(
                    AVAILABILITY_SERIES,
                    ("availability", "Current Availability"),
                    availability.as_value().map(PointValue::Integer),
                    timestamp_millis,
                ),
            ],
        }
    }

    /// Series by its `timeseriesId`
    pub fn series(&self, timeseries_id: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.timeseries_id == timeseries_id)
    }
}
