//! Test fixtures and data factories

use pg_dynatrace_relay::config::{
    CLIENT_ID_KEY, CLIENT_SECRET_KEY, DYNATRACE_ENDPOINT_KEY, DYNATRACE_ENVIRONMENT_KEY,
    DYNATRACE_TOKEN_KEY, RESOURCE_GROUP_KEY, SUBSCRIPTION_ID_KEY, TENANT_ID_KEY,
};
use pg_dynatrace_relay::MapSource;
use serde_json::{Value, json};

pub const TENANT: &str = "tenant-1";
pub const CLIENT: &str = "client-1";
pub const SUBSCRIPTION: &str = "sub-1";
pub const RESOURCE_GROUP: &str = "rg-db";
pub const ACCESS_TOKEN: &str = "arm-token-1";
pub const DYNATRACE_TOKEN: &str = "dt0c01.test";
pub const ENVIRONMENT: &str = "env-1";

/// Source with every account and Dynatrace key set
pub fn full_source(dynatrace_endpoint: &str) -> MapSource {
    MapSource::new()
        .with(CLIENT_ID_KEY, CLIENT)
        .with(CLIENT_SECRET_KEY, "client-secret")
        .with(TENANT_ID_KEY, TENANT)
        .with(SUBSCRIPTION_ID_KEY, SUBSCRIPTION)
        .with(RESOURCE_GROUP_KEY, RESOURCE_GROUP)
        .with(DYNATRACE_TOKEN_KEY, DYNATRACE_TOKEN)
        .with(DYNATRACE_ENDPOINT_KEY, dynatrace_endpoint)
        .with(DYNATRACE_ENVIRONMENT_KEY, ENVIRONMENT)
}

/// Resource path of the servers collection
pub fn servers_path() -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.DBforPostgreSQL/servers",
        SUBSCRIPTION, RESOURCE_GROUP
    )
}

/// Resource path of one server's metrics
pub fn metrics_path(instance: &str) -> String {
    format!(
        "{}/{}/providers/Microsoft.Insights/metrics",
        servers_path(),
        instance
    )
}

pub fn custom_device_path(instance: &str) -> String {
    format!(
        "/e/{}/api/v1/entity/infrastructure/custom/{}",
        ENVIRONMENT, instance
    )
}

pub fn token_body() -> Value {
    json!({
        "token_type": "Bearer",
        "expires_in": 3599,
        "ext_expires_in": 3599,
        "access_token": ACCESS_TOKEN
    })
}

/// A server entry as Resource Manager lists it
pub fn server(name: &str, tags: Option<Value>) -> Value {
    let mut server = json!({
        "id": format!("{}/{}", servers_path(), name),
        "name": name,
        "type": "Microsoft.DBforPostgreSQL/servers",
        "location": "westeurope"
    });
    if let Some(tags) = tags {
        server["tags"] = tags;
    }
    server
}

pub fn monitored(name: &str) -> Value {
    server(name, Some(json!({"EnableMonitoring": "true"})))
}

pub fn server_page(servers: Vec<Value>, next_link: Option<String>) -> Value {
    let mut page = json!({ "value": servers });
    if let Some(link) = next_link {
        page["nextLink"] = Value::String(link);
    }
    page
}

/// Metrics response in request order
pub fn metrics_body(connections: f64, storage_bytes: f64, cpu: f64) -> Value {
    let metric = |name: &str, unit: &str, avg: f64| {
        json!({
            "id": format!("/metrics/{}", name),
            "type": "Microsoft.Insights/metrics",
            "name": {"value": name, "localizedValue": name},
            "unit": unit,
            "timeseries": [{
                "metadatavalues": [],
                "data": [{"timeStamp": "2024-05-01T09:55:00Z", "average": avg}]
            }]
        })
    };

    json!({
        "cost": 0,
        "timespan": "2024-05-01T09:55:00Z/2024-05-01T10:00:00Z",
        "interval": "PT1M",
        "value": [
            metric("active_connections", "Count", connections),
            metric("storage_used", "Bytes", storage_bytes),
            metric("cpu_percent", "Percent", cpu),
        ]
    })
}
