//! `status.json` document.

use serde::Deserialize;

use super::{Field, identifier, list};

/// Top-level `status.json` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    #[serde(deserialize_with = "list")]
    pub status: Vec<Status>,
}

impl StatusResponse {
    /// The status document; Infinitude always sends exactly one.
    pub fn document(&self) -> Option<&Status> {
        self.status.first()
    }
}

/// Live system status.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(deserialize_with = "identifier")]
    pub version: String,
    /// Outdoor air temperature.
    pub oat: Field,
    pub cfgtype: Field,
    pub uvlvl: Field,
    pub humid: Field,
    pub oprstsmsg: Field,
    #[serde(rename = "localTime")]
    pub local_time: Field,
    pub cfgem: Field,
    pub humlvl: Field,
    #[serde(deserialize_with = "list")]
    pub zones: Vec<ZoneGroup>,
    pub vacatrunning: Field,
    pub mode: Field,
    /// Filter wear level, in percent.
    pub filtrlvl: Field,
    pub ventlvl: Field,
}

impl Status {
    /// All zones across every zone group.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().flat_map(|group| group.zone.iter())
    }
}

/// Wrapper object around the zone list (`"zones": [{"zone": [...]}]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZoneGroup {
    #[serde(deserialize_with = "list")]
    pub zone: Vec<Zone>,
}

/// A single climate zone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Zone {
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    /// `on` / `off`.
    pub enabled: Field,
    pub name: Field,
    /// e.g. `home`, `away`, `manual`.
    #[serde(rename = "currentActivity")]
    pub current_activity: Field,
    /// Heat setpoint.
    pub htsp: Field,
    /// Cool setpoint.
    pub clsp: Field,
    /// Current temperature; `[{}]` while the zone is inactive.
    pub rt: Field,
    /// Relative humidity.
    pub rh: Field,
    pub fan: Field,
    pub hold: Field,
    pub damperposition: Field,
    /// e.g. `active_heat`, `idle`.
    pub zoneconditioning: Field,
    /// Override timer; same placeholder convention as `rt`.
    pub otmr: Field,
}

impl Zone {
    pub fn is_enabled(&self) -> bool {
        self.enabled.is("on")
    }
}
