//! Azure Resource Manager and Azure Monitor wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page of `Microsoft.DBforPostgreSQL/servers`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerListPage {
    #[serde(default)]
    pub value: Vec<ServerResource>,
    #[serde(rename = "nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

/// A PostgreSQL server resource; only the fields the relay reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerResource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, serde_json::Value>>,
}

/// Response of a metrics query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsResponse {
    #[serde(default)]
    pub timespan: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub value: Vec<Metric>,
}

/// One named metric series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub name: LocalizableString,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub timeseries: Vec<TimeSeriesElement>,
}

impl Metric {
    /// Metric identifier, e.g. `cpu_percent`
    pub fn id(&self) -> &str {
        &self.name.value
    }

    /// Average of the earliest data point that carries one.
    ///
    /// Points without an average are skipped, so a null leading point does not
    /// blank the value. Reading only `data[0]` would send `null` for a series
    /// whose first bucket is still being aggregated.
    pub fn first_average(&self) -> Option<f64> {
        self.timeseries
            .first()
            .and_then(|series| series.data.iter().find_map(|point| point.average))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizableString {
    pub value: String,
    #[serde(rename = "localizedValue", default)]
    pub localized_value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeriesElement {
    #[serde(default)]
    pub data: Vec<MetricValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricValue {
    #[serde(rename = "timeStamp")]
    pub time_stamp: DateTime<Utc>,
    #[serde(default)]
    pub average: Option<f64>,
}

/// Azure AD token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: ExpiresIn,
}

/// `expires_in` arrives as a number from the v2 endpoint and as a string from v1
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    Seconds(i64),
    Text(String),
}

impl ExpiresIn {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Self::Seconds(s) => Some(*s),
            Self::Text(s) => s.parse().ok(),
        }
    }
}

/// Azure AD error body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
