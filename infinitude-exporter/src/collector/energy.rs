//! Energy history collector (`energy.json`).

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::fetch::JsonFetcher;
use crate::mapping::{Measurement, MetricDesc};
use crate::payload::{EnergyResponse, EnergySeries, LoadCategory};

use super::Collector;

const PERIOD_LABELS: &[&str] = &["period_id"];

/// Translates usage and cost history into per-period gauges, one family per
/// series and load category.
pub struct EnergyCollector {
    fetcher: JsonFetcher,
    url: String,
    /// Indexed by `[EnergySeries][LoadCategory]`.
    descs: [[MetricDesc; 8]; 2],
}

impl EnergyCollector {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        let descs = EnergySeries::ALL.map(|series| {
            LoadCategory::ALL.map(|category| {
                MetricDesc::gauge(
                    format!(
                        "infinitude_energy_{}_{}",
                        series.as_str(),
                        category.as_str()
                    ),
                    format!("Energy {} for {}", series.as_str(), category.description()),
                    PERIOD_LABELS,
                )
            })
        });

        Self {
            fetcher,
            url: url.into(),
            descs,
        }
    }

    fn desc(&self, series: EnergySeries, category: LoadCategory) -> &MetricDesc {
        &self.descs[series as usize][category as usize]
    }

    /// Translate a decoded energy document.
    ///
    /// An empty envelope is normal before the controller has any history and
    /// yields no measurements.
    pub fn translate(&self, response: &EnergyResponse) -> Vec<Measurement> {
        let Some(energy) = response.document() else {
            info!(url = %self.url, "No energy data returned");
            return Vec::new();
        };

        let mut measurements = Vec::new();
        for series in EnergySeries::ALL {
            for period in energy.periods(series) {
                let id = [period.id.as_str()];
                for category in LoadCategory::ALL {
                    let value = period.reading(category).value();
                    measurements.push(self.desc(series, category).measure(value, &id));
                }
            }
        }

        measurements
    }
}

#[async_trait]
impl Collector for EnergyCollector {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn describe(&self) -> Vec<&MetricDesc> {
        self.descs.iter().flatten().collect()
    }

    async fn scrape(&self) -> Result<Vec<Measurement>> {
        let response: EnergyResponse = self.fetcher.get_json(&self.url).await?;
        Ok(self.translate(&response))
    }
}
