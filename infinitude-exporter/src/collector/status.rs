//! Live status collector (`status.json`).

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::fetch::JsonFetcher;
use crate::mapping::{Measurement, MetricDesc};
use crate::payload::{Slot, StatusResponse, Zone};

use super::Collector;

const ZONE_LABELS: &[&str] = &["zone_id"];

/// Translates the controller's live status into per-zone gauges.
pub struct StatusCollector {
    fetcher: JsonFetcher,
    url: String,
    oat: MetricDesc,
    filter_level: MetricDesc,
    rt: MetricDesc,
    rh: MetricDesc,
    htsp: MetricDesc,
    clsp: MetricDesc,
}

impl StatusCollector {
    pub fn new(fetcher: JsonFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            oat: MetricDesc::gauge("infinitude_status_oat", "Outside Air Temperature", &[]),
            filter_level: MetricDesc::gauge("infinitude_status_filtrlvl", "Filter Level", &[]),
            rt: MetricDesc::gauge("infinitude_status_rt", "Zone Temperature", ZONE_LABELS),
            rh: MetricDesc::gauge("infinitude_status_rh", "Relative Humidity", ZONE_LABELS),
            htsp: MetricDesc::gauge("infinitude_status_htsp", "Heat Setpoint", ZONE_LABELS),
            clsp: MetricDesc::gauge("infinitude_status_clsp", "Cool Setpoint", ZONE_LABELS),
        }
    }

    /// Translate a decoded status document.
    ///
    /// Disabled zones are skipped entirely. Unparseable or missing readings
    /// are reported as zero.
    pub fn translate(&self, response: &StatusResponse) -> Vec<Measurement> {
        let Some(status) = response.document() else {
            info!(url = %self.url, "No status data returned");
            return Vec::new();
        };

        let mut measurements = vec![
            self.oat.measure(status.oat.value(), &[]),
            self.filter_level.measure(status.filtrlvl.value(), &[]),
        ];

        for zone in status.zones() {
            if !zone.is_enabled() {
                debug!(zone_id = %zone.id, "Skipping disabled zone");
                continue;
            }

            let id = [zone.id.as_str()];
            measurements.push(self.rh.measure(zone.rh.value(), &id));
            measurements.push(self.rt.measure(current_temperature(zone), &id));
            measurements.push(self.htsp.measure(zone.htsp.value(), &id));
            measurements.push(self.clsp.measure(zone.clsp.value(), &id));
        }

        measurements
    }
}

/// The zone's current temperature.
///
/// `rt` holds an empty object instead of a string while the zone is
/// inactive; that reads as zero.
fn current_temperature(zone: &Zone) -> f64 {
    match zone.rt.first() {
        Some(Slot::Text(_)) => zone.rt.value(),
        Some(Slot::Placeholder) | None => 0.0,
    }
}

#[async_trait]
impl Collector for StatusCollector {
    fn name(&self) -> &'static str {
        "status"
    }

    fn describe(&self) -> Vec<&MetricDesc> {
        vec![
            &self.oat,
            &self.filter_level,
            &self.rt,
            &self.rh,
            &self.htsp,
            &self.clsp,
        ]
    }

    async fn scrape(&self) -> Result<Vec<Measurement>> {
        let response: StatusResponse = self.fetcher.get_json(&self.url).await?;
        Ok(self.translate(&response))
    }
}
