//! Prometheus metrics exporter for Infinitude.
//!
//! [Infinitude] exposes the state of a Carrier/Bryant communicating
//! thermostat as JSON. This crate polls its `status.json` and `energy.json`
//! documents on every Prometheus scrape and republishes the readings as
//! gauges. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │   Infinitude    │<────│   Collectors    │<────│   HTTP Server   │
//! │ (status/energy) │     │ (status/energy) │     │   (/metrics)    │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Metrics
//!
//! * `infinitude_status_oat`, `infinitude_status_filtrlvl`
//! * `infinitude_status_{rt,rh,htsp,clsp}{zone_id}` for enabled zones
//! * `infinitude_energy_{usage,cost}_{eheat,fangas,reheat,fan,cooling,looppump,hpheat,gas}{period_id}`
//!
//! # Usage
//!
//! ```bash
//! INFINITUDE_BASE_URL=http://thermostat.lan:3000 infinitude-exporter
//! infinitude-exporter --config config.json5
//! ```
//!
//! See [`config::ExporterConfig`] for configuration options.
//!
//! [Infinitude]: https://github.com/nebulous/infinitude

pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod http;
pub mod mapping;
pub mod payload;

pub use collector::{Collector, EnergyCollector, MetricRegistry, SharedRegistry, StatusCollector};
pub use config::ExporterConfig;
pub use error::CollectError;
pub use fetch::JsonFetcher;
pub use http::HttpServer;
pub use mapping::{Measurement, MetricDesc, parse_or_zero};

use std::sync::Arc;

use filter::MetricFilter;

/// Build the registry with the status and energy collectors wired to the
/// configured controller.
pub fn build_registry(config: &ExporterConfig) -> reqwest::Result<SharedRegistry> {
    let fetcher = JsonFetcher::new(config.infinitude.timeout())?;

    let registry = MetricRegistry::new(MetricFilter::new(&config.filters))
        .with_collector(Arc::new(StatusCollector::new(
            fetcher.clone(),
            config.infinitude.status_url(),
        )))
        .with_collector(Arc::new(EnergyCollector::new(
            fetcher,
            config.infinitude.energy_url(),
        )));

    Ok(Arc::new(registry))
}
