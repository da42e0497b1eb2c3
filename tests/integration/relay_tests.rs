//! Full ticks from discovery to publish

use async_trait::async_trait;
use pg_dynatrace_relay::core::azure::{
    AzureCredential, AzureInstanceDiscoverer, AzureMetricsFetcher,
};
use pg_dynatrace_relay::core::probe::PostgresProber;
use pg_dynatrace_relay::core::publisher::payload::STORAGE_SERIES;
use pg_dynatrace_relay::core::publisher::{DynatracePublisher, PointValue};
use pg_dynatrace_relay::core::traits::AvailabilityProbe;
use pg_dynatrace_relay::{Availability, MapSource, Relay, SharedSource};
use std::collections::HashMap;
use std::sync::Arc;

use crate::assert_approx_eq;
use crate::common::MockCloud;
use crate::common::assertions::{PayloadAssertions, float_value};
use crate::common::fixtures::{metrics_body, monitored, server_page};

/// Answers from a fixed table instead of connecting
struct TableProbe(HashMap<&'static str, Availability>);

#[async_trait]
impl AvailabilityProbe for TableProbe {
    async fn probe(&self, instance_name: &str) -> Availability {
        self.0
            .get(instance_name)
            .copied()
            .unwrap_or(Availability::Unavailable)
    }
}

fn relay(cloud: &MockCloud, source: MapSource, prober: Arc<dyn AvailabilityProbe>) -> Relay {
    let config = cloud.relay_config();
    let source: SharedSource = Arc::new(source);
    let credential = AzureCredential::new(&config.azure).unwrap();

    Relay::new(
        Arc::new(
            AzureInstanceDiscoverer::new(&config.azure, source.clone(), credential.clone())
                .unwrap(),
        ),
        prober,
        Arc::new(AzureMetricsFetcher::new(&config.azure, source.clone(), credential).unwrap()),
        Arc::new(DynatracePublisher::new(&config.dynatrace, source).unwrap()),
        config.schedule.max_concurrency,
    )
}

fn primary_and_standby() -> Arc<dyn AvailabilityProbe> {
    Arc::new(TableProbe(HashMap::from([
        ("pg-1", Availability::Available),
        ("pg-2", Availability::Unavailable),
    ])))
}

#[tokio::test]
async fn test_tick_publishes_primary_and_standby() {
    let cloud = MockCloud::start().await;
    // One login serves discovery and both metric queries
    cloud.mount_token(1).await;
    cloud
        .mount_servers(server_page(vec![monitored("pg-1"), monitored("pg-2")], None))
        .await;
    for instance in ["pg-1", "pg-2"] {
        cloud
            .mount_metrics(instance, metrics_body(5.0, 2_147_483_648.0, 12.5))
            .await;
    }
    cloud.mount_dynatrace(204).await;

    let report = relay(&cloud, cloud.source(), primary_and_standby())
        .run_tick()
        .await;
    assert_eq!(report.discovered, 2);
    assert_eq!(report.published, 2);
    assert_eq!(report.failed, 0);

    let mut posts = cloud.dynatrace_posts().await;
    posts.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(posts.len(), 2);

    let (name, pg1) = &posts[0];
    assert_eq!(name, "pg-1");
    pg1.assert_well_formed();
    assert_eq!(pg1.availability(), Some(PointValue::Integer(1)));
    assert_approx_eq!(float_value(pg1.value_of(STORAGE_SERIES)), 2.0);

    let (name, pg2) = &posts[1];
    assert_eq!(name, "pg-2");
    pg2.assert_well_formed();
    assert_eq!(pg2.availability(), Some(PointValue::Integer(0)));
    assert_approx_eq!(float_value(pg2.value_of(STORAGE_SERIES)), 2.0);
}

#[tokio::test]
async fn test_tick_skips_instance_without_metrics() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud
        .mount_servers(server_page(vec![monitored("pg-1"), monitored("pg-2")], None))
        .await;
    cloud.mount_metrics_error("pg-1", 503).await;
    cloud
        .mount_metrics("pg-2", metrics_body(3.0, 1_073_741_824.0, 40.0))
        .await;
    cloud.mount_dynatrace(200).await;

    let report = relay(&cloud, cloud.source(), primary_and_standby())
        .run_tick()
        .await;
    assert_eq!(report.published, 1);
    assert_eq!(report.skipped, 1);

    let posts = cloud.dynatrace_posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "pg-2");
    assert_approx_eq!(float_value(posts[0].1.value_of(STORAGE_SERIES)), 1.0);
}

#[tokio::test]
async fn test_ingestion_errors_do_not_abort_tick() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud
        .mount_servers(server_page(vec![monitored("pg-1"), monitored("pg-2")], None))
        .await;
    for instance in ["pg-1", "pg-2"] {
        cloud
            .mount_metrics(instance, metrics_body(1.0, 1.0, 1.0))
            .await;
    }
    cloud.mount_dynatrace(500).await;

    let report = relay(&cloud, cloud.source(), primary_and_standby())
        .run_tick()
        .await;
    assert_eq!(report.discovered, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(cloud.dynatrace_posts().await.len(), 2);
}

#[tokio::test]
async fn test_missing_db_credentials_publish_zero_availability() {
    let cloud = MockCloud::start().await;
    cloud.mount_token(1).await;
    cloud
        .mount_servers(server_page(vec![monitored("pg-1")], None))
        .await;
    cloud
        .mount_metrics("pg-1", metrics_body(2.0, 1.0, 5.0))
        .await;
    cloud.mount_dynatrace(204).await;

    // Real prober; no pg-1_db_creds, so it never connects
    let config = cloud.relay_config();
    let source: SharedSource = Arc::new(cloud.source());
    let prober = Arc::new(PostgresProber::new(source, &config.database));

    let report = relay(&cloud, cloud.source(), prober).run_tick().await;
    assert_eq!(report.published, 1);

    let posts = cloud.dynatrace_posts().await;
    assert_eq!(posts[0].1.availability(), Some(PointValue::Integer(0)));
}

#[tokio::test]
async fn test_relay_wiring_from_config() {
    let cloud = MockCloud::start().await;
    cloud.mount_token_rejected().await;

    // Login fails, so the tick discovers nothing and sends nothing
    let relay = Relay::azure(&cloud.relay_config(), Arc::new(cloud.source())).unwrap();
    let report = relay.run_tick().await;
    assert_eq!(report.discovered, 0);
    assert!(cloud.dynatrace_posts().await.is_empty());
}
