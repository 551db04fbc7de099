//! Collectors and the registry that drives them on each scrape.
//!
//! A [`Collector`] owns a fixed set of metric descriptors and, when asked,
//! fetches its upstream document and translates it into measurements. The
//! [`MetricRegistry`] runs every registered collector concurrently per scrape
//! and encodes the combined result in the Prometheus text format.

mod energy;
mod status;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::{CollectError, Result};
use crate::filter::MetricFilter;
use crate::mapping::{Measurement, MetricDesc, encode_family};

pub use energy::EnergyCollector;
pub use status::StatusCollector;

/// A source of measurements, invoked once per scrape.
///
/// Implementations hold no mutable state; concurrent scrapes each run an
/// independent pass.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Short name used in logs and in the exporter's own metrics.
    fn name(&self) -> &'static str;

    /// Every metric family this collector can emit.
    fn describe(&self) -> Vec<&MetricDesc>;

    /// Fetch upstream data and translate it.
    async fn scrape(&self) -> Result<Vec<Measurement>>;

    /// Run one timed pass. A failed pass is logged and yields no
    /// measurements.
    async fn pass(&self) -> CollectorOutcome {
        let started = Instant::now();
        let result = self.scrape().await;
        let duration_secs = started.elapsed().as_secs_f64();

        let (success, measurements) = match result {
            Ok(measurements) => {
                debug!(
                    collector = self.name(),
                    measurements = measurements.len(),
                    duration_secs,
                    "Collection finished"
                );
                (true, measurements)
            }
            Err(e) => {
                report_failure(self.name(), &e);
                (false, Vec::new())
            }
        };

        CollectorOutcome {
            collector: self.name(),
            success,
            duration_secs,
            measurements,
        }
    }

    /// Like [`Collector::scrape`], but a failed pass is logged and yields
    /// no measurements.
    async fn collect(&self) -> Vec<Measurement> {
        self.pass().await.measurements
    }
}

fn report_failure(collector: &str, error: &CollectError) {
    warn!(
        collector,
        timeout = error.is_timeout(),
        error = %error,
        "Collection failed, no data this scrape"
    );
}

/// Result of one collector's pass within a scrape.
#[derive(Debug)]
pub struct CollectorOutcome {
    pub collector: &'static str,
    pub success: bool,
    pub duration_secs: f64,
    pub measurements: Vec<Measurement>,
}

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total scrapes served.
    pub scrapes: u64,
    /// Collector passes that ended in a fetch or decode error.
    pub collection_failures: u64,
}

/// Descriptors for the exporter's own metrics.
struct SelfMetrics {
    success: MetricDesc,
    duration: MetricDesc,
    scrapes: MetricDesc,
    failures: MetricDesc,
}

impl SelfMetrics {
    fn new() -> Self {
        Self {
            success: MetricDesc::gauge(
                "infinitude_exporter_collector_success",
                "Whether the collector's last pass succeeded",
                &["collector"],
            ),
            duration: MetricDesc::gauge(
                "infinitude_exporter_collector_duration_seconds",
                "Duration of the collector's last pass",
                &["collector"],
            ),
            scrapes: MetricDesc::counter(
                "infinitude_exporter_scrapes_total",
                "Total scrapes served",
                &[],
            ),
            failures: MetricDesc::counter(
                "infinitude_exporter_collection_failures_total",
                "Total collector passes that failed to fetch or decode",
                &[],
            ),
        }
    }
}

/// Process-wide registry of collectors.
pub struct MetricRegistry {
    collectors: Vec<Arc<dyn Collector>>,
    filter: MetricFilter,
    self_metrics: SelfMetrics,
    stats: RwLock<RegistryStats>,
}

/// Create a shareable registry handle.
pub type SharedRegistry = Arc<MetricRegistry>;

impl MetricRegistry {
    /// Create an empty registry.
    pub fn new(filter: MetricFilter) -> Self {
        Self {
            collectors: Vec::new(),
            filter,
            self_metrics: SelfMetrics::new(),
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Register a collector. Registration order is output order.
    pub fn register(&mut self, collector: Arc<dyn Collector>) {
        debug!(
            collector = collector.name(),
            families = collector.describe().len(),
            "Registered collector"
        );
        self.collectors.push(collector);
    }

    /// Builder-style [`MetricRegistry::register`].
    pub fn with_collector(mut self, collector: Arc<dyn Collector>) -> Self {
        self.register(collector);
        self
    }

    /// Names of the registered collectors.
    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Every metric family the registry can emit.
    pub fn describe(&self) -> Vec<&MetricDesc> {
        let mut descs: Vec<&MetricDesc> = self
            .collectors
            .iter()
            .flat_map(|c| c.describe())
            .collect();
        descs.extend([
            &self.self_metrics.success,
            &self.self_metrics.duration,
            &self.self_metrics.scrapes,
            &self.self_metrics.failures,
        ]);
        descs
    }

    /// Run every collector concurrently.
    pub async fn gather(&self) -> Vec<CollectorOutcome> {
        let outcomes = join_all(self.collectors.iter().map(|c| c.pass())).await;

        let failures = outcomes.iter().filter(|o| !o.success).count() as u64;
        let mut stats = self.stats.write();
        stats.scrapes += 1;
        stats.collection_failures += failures;

        outcomes
    }

    /// Scrape every collector and render the Prometheus exposition text.
    pub async fn render(&self) -> String {
        let outcomes = self.gather().await;
        let mut output = String::new();

        for (collector, outcome) in self.collectors.iter().zip(&outcomes) {
            for desc in collector.describe() {
                self.encode(&mut output, desc, outcome.measurements.iter());
            }
        }

        let self_samples: Vec<Measurement> = outcomes
            .iter()
            .flat_map(|o| {
                [
                    self.self_metrics
                        .success
                        .measure(if o.success { 1.0 } else { 0.0 }, &[o.collector]),
                    self.self_metrics
                        .duration
                        .measure(o.duration_secs, &[o.collector]),
                ]
            })
            .collect();

        let stats = self.stats();
        let counters = [
            self.self_metrics.scrapes.measure(stats.scrapes as f64, &[]),
            self.self_metrics
                .failures
                .measure(stats.collection_failures as f64, &[]),
        ];

        for desc in [&self.self_metrics.success, &self.self_metrics.duration] {
            self.encode(&mut output, desc, self_samples.iter());
        }
        for desc in [&self.self_metrics.scrapes, &self.self_metrics.failures] {
            self.encode(&mut output, desc, counters.iter());
        }

        output
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    fn encode<'a>(
        &self,
        output: &mut String,
        desc: &MetricDesc,
        measurements: impl Iterator<Item = &'a Measurement>,
    ) {
        if !self.filter.should_include(desc.name()) {
            return;
        }

        let samples: Vec<&Measurement> = measurements.filter(|m| m.name() == desc.name()).collect();
        encode_family(output, desc, &samples);
    }
}
