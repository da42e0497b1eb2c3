//! Metrics queries against a mock Azure Monitor

use pg_dynatrace_relay::MetricSnapshot;
use pg_dynatrace_relay::core::azure::{AzureCredential, AzureMetricsFetcher};
use pg_dynatrace_relay::core::traits::MetricsSource;
use std::sync::Arc;

use crate::assert_approx_eq;
use crate::common::MockCloud;
use crate::common::fixtures::{self, metrics_body};

fn fetcher(cloud: &MockCloud) -> AzureMetricsFetcher {
    let config = cloud.azure_config();
    let credential = AzureCredential::new(&config).unwrap();
    AzureMetricsFetcher::new(&config, Arc::new(cloud.source()), credential).unwrap()
}

#[tokio::test]
async fn test_fetch_returns_series_verbatim() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud
        .mount_metrics("pg-1", metrics_body(5.0, 2_147_483_648.0, 12.5))
        .await;

    let series = fetcher(&cloud).fetch_metrics("pg-1").await.unwrap();
    let names: Vec<&str> = series.iter().map(|m| m.id()).collect();
    assert_eq!(names, vec!["active_connections", "storage_used", "cpu_percent"]);

    let snapshot = MetricSnapshot::from_series(&series).unwrap();
    assert_approx_eq!(snapshot.active_connections, 5.0);
    assert_approx_eq!(snapshot.storage_used_gib(), 2.0);
    assert_approx_eq!(snapshot.cpu_percent, 12.5);
}

#[tokio::test]
async fn test_fetch_sends_five_minute_timespan() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud
        .mount_metrics("pg-1", metrics_body(1.0, 1.0, 1.0))
        .await;

    fetcher(&cloud).fetch_metrics("pg-1").await.unwrap();

    let requests = cloud.server.received_requests().await.unwrap();
    let query = requests
        .iter()
        .find(|r| r.url.path() == fixtures::metrics_path("pg-1"))
        .unwrap();
    let timespan = query
        .url
        .query_pairs()
        .find(|(k, _)| k == "timespan")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let (start, end) = timespan.split_once('/').unwrap();
    let start = chrono::DateTime::parse_from_rfc3339(start).unwrap();
    let end = chrono::DateTime::parse_from_rfc3339(end).unwrap();
    assert_eq!((end - start).num_seconds(), 300);
}

#[tokio::test]
async fn test_fetch_error_is_none() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud.mount_metrics_error("pg-1", 500).await;

    assert!(fetcher(&cloud).fetch_metrics("pg-1").await.is_none());
}

#[tokio::test]
async fn test_fetch_with_rejected_login_is_none() {
    let cloud = MockCloud::start().await;
    cloud.mount_token_rejected().await;
    cloud
        .mount_metrics("pg-1", metrics_body(1.0, 1.0, 1.0))
        .await;

    assert!(fetcher(&cloud).fetch_metrics("pg-1").await.is_none());
    assert_eq!(cloud.requests_to(&fixtures::metrics_path("pg-1")).await, 0);
}

#[tokio::test]
async fn test_unauthorized_fetch_forces_new_login() {
    let cloud = MockCloud::start().await;
    // Dropping the cached token means the second query logs in again
    cloud.mount_token(2).await;
    cloud.mount_metrics_error("pg-1", 401).await;

    let fetcher = fetcher(&cloud);
    assert!(fetcher.fetch_metrics("pg-1").await.is_none());
    assert!(fetcher.fetch_metrics("pg-1").await.is_none());
    assert_eq!(cloud.requests_to(&fixtures::metrics_path("pg-1")).await, 2);
}

#[tokio::test]
async fn test_server_error_keeps_cached_token() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud.mount_metrics_error("pg-1", 500).await;

    let fetcher = fetcher(&cloud);
    assert!(fetcher.fetch_metrics("pg-1").await.is_none());
    assert!(fetcher.fetch_metrics("pg-1").await.is_none());
    assert_eq!(cloud.requests_to(&fixtures::metrics_path("pg-1")).await, 2);
}
