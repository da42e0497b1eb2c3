//! Tick orchestration
//!
//! A tick discovers the monitored instances once, then handles every
//! instance as its own task: probe and metrics fetch run side by side, and
//! the publish follows only when metrics came back complete.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::{RelayConfig, SharedSource};
use crate::core::azure::{AzureCredential, AzureInstanceDiscoverer, AzureMetricsFetcher};
use crate::core::probe::PostgresProber;
use crate::core::publisher::{DynatracePublisher, PublishOutcome};
use crate::core::traits::{AvailabilityProbe, InstanceSource, MetricsSink, MetricsSource};
use crate::core::types::{InstanceName, MetricSnapshot};
use crate::utils::error::Result;

/// What happened to one instance during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceOutcome {
    Published(PublishOutcome),
    /// Metrics were missing or incomplete; nothing was sent
    NoMetrics,
    /// The instance task panicked
    Aborted(String),
}

/// Summary of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub discovered: usize,
    pub published: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl TickReport {
    fn record(&mut self, outcome: &InstanceOutcome) {
        match outcome {
            InstanceOutcome::Published(p) if p.is_delivered() => self.published += 1,
            InstanceOutcome::Published(_) | InstanceOutcome::Aborted(_) => self.failed += 1,
            InstanceOutcome::NoMetrics => self.skipped += 1,
        }
    }
}

/// Pipeline stages shared by every instance task
#[derive(Clone)]
pub struct Relay {
    discoverer: Arc<dyn InstanceSource>,
    prober: Arc<dyn AvailabilityProbe>,
    fetcher: Arc<dyn MetricsSource>,
    publisher: Arc<dyn MetricsSink>,
    max_concurrency: usize,
}

impl Relay {
    pub fn new(
        discoverer: Arc<dyn InstanceSource>,
        prober: Arc<dyn AvailabilityProbe>,
        fetcher: Arc<dyn MetricsSource>,
        publisher: Arc<dyn MetricsSink>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            discoverer,
            prober,
            fetcher,
            publisher,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Wire the Azure, PostgreSQL and Dynatrace implementations.
    ///
    /// The discoverer and the fetcher share one credential.
    pub fn azure(config: &RelayConfig, source: SharedSource) -> Result<Self> {
        let credential = AzureCredential::new(&config.azure)?;
        let discoverer =
            AzureInstanceDiscoverer::new(&config.azure, source.clone(), credential.clone())?;
        let fetcher = AzureMetricsFetcher::new(&config.azure, source.clone(), credential)?;
        let prober = PostgresProber::new(source.clone(), &config.database);
        let publisher = DynatracePublisher::new(&config.dynatrace, source)?;

        Ok(Self::new(
            Arc::new(discoverer),
            Arc::new(prober),
            Arc::new(fetcher),
            Arc::new(publisher),
            config.schedule.max_concurrency,
        ))
    }

    /// Run one discover/probe/fetch/publish cycle
    pub async fn run_tick(&self) -> TickReport {
        let started = Instant::now();
        let instances = self.discoverer.discover().await;
        info!("Monitored instances: {:?}", instances);

        let mut report = TickReport {
            discovered: instances.len(),
            ..TickReport::default()
        };

        let outcomes: Vec<InstanceOutcome> = stream::iter(instances)
            .map(|instance| {
                let relay = self.clone();
                async move {
                    let name = instance.clone();
                    match tokio::spawn(async move { relay.process_instance(instance).await })
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            error!("Processing of {} aborted: {}", name, e);
                            InstanceOutcome::Aborted(e.to_string())
                        }
                    }
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        for outcome in &outcomes {
            report.record(outcome);
        }
        report.elapsed = started.elapsed();

        info!(
            "Tick finished: discovered={} published={} skipped={} failed={} elapsed={:?}",
            report.discovered, report.published, report.skipped, report.failed, report.elapsed
        );
        report
    }

    async fn process_instance(&self, instance: InstanceName) -> InstanceOutcome {
        let (availability, series) = tokio::join!(
            self.prober.probe(&instance),
            self.fetcher.fetch_metrics(&instance)
        );

        let snapshot = match series.as_deref().map(MetricSnapshot::from_series) {
            Some(Ok(snapshot)) => snapshot,
            Some(Err(e)) => {
                warn!("no metrics available for {}: {}", instance, e);
                return InstanceOutcome::NoMetrics;
            }
            None => {
                warn!("no metrics available for {}", instance);
                return InstanceOutcome::NoMetrics;
            }
        };

        info!(
            "Publishing {}: availability={} cpu={} connections={} storage_gib={:.3}",
            instance,
            availability,
            snapshot.cpu_percent,
            snapshot.active_connections,
            snapshot.storage_used_gib()
        );
        InstanceOutcome::Published(
            self.publisher
                .publish(&instance, &snapshot, availability)
                .await,
        )
    }
}
