//! `energy.json` document.

use serde::Deserialize;

use super::{Field, identifier, list};

/// Top-level `energy.json` envelope.
///
/// The list is empty until the controller has accumulated any history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnergyResponse {
    #[serde(deserialize_with = "list")]
    pub energy: Vec<Energy>,
}

impl EnergyResponse {
    pub fn document(&self) -> Option<&Energy> {
        self.energy.first()
    }
}

/// Energy history, split into a usage and a cost series.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Energy {
    #[serde(deserialize_with = "identifier")]
    pub version: String,
    /// Heating Seasonal Performance Factor.
    pub hspf: Field,
    /// Seasonal Energy Efficiency Ratio.
    pub seer: Field,
    #[serde(deserialize_with = "list")]
    pub usage: Vec<PeriodList>,
    #[serde(deserialize_with = "list")]
    pub cost: Vec<PeriodList>,
}

impl Energy {
    /// Every period bucket of the given series.
    pub fn periods(&self, series: EnergySeries) -> impl Iterator<Item = &Period> {
        let lists = match series {
            EnergySeries::Usage => &self.usage,
            EnergySeries::Cost => &self.cost,
        };
        lists.iter().flat_map(|list| list.period.iter())
    }
}

/// Wrapper object around a period list (`"usage": [{"period": [...]}]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeriodList {
    #[serde(deserialize_with = "list")]
    pub period: Vec<Period>,
}

/// One time bucket of energy history, e.g. `day1`, `month2`, `year1`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Period {
    #[serde(deserialize_with = "identifier")]
    pub id: String,
    pub eheat: Field,
    pub fangas: Field,
    pub reheat: Field,
    pub fan: Field,
    pub cooling: Field,
    pub looppump: Field,
    pub hpheat: Field,
    pub gas: Field,
}

impl Period {
    /// The reading for a load category.
    pub fn reading(&self, category: LoadCategory) -> &Field {
        match category {
            LoadCategory::EmergencyHeat => &self.eheat,
            LoadCategory::FanGas => &self.fangas,
            LoadCategory::Reheat => &self.reheat,
            LoadCategory::Fan => &self.fan,
            LoadCategory::Cooling => &self.cooling,
            LoadCategory::LoopPump => &self.looppump,
            LoadCategory::HeatPumpHeat => &self.hpheat,
            LoadCategory::Gas => &self.gas,
        }
    }
}

/// Which half of the energy document a period belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergySeries {
    Usage,
    Cost,
}

impl EnergySeries {
    pub const ALL: [EnergySeries; 2] = [EnergySeries::Usage, EnergySeries::Cost];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergySeries::Usage => "usage",
            EnergySeries::Cost => "cost",
        }
    }
}

/// Load categories reported for every period bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadCategory {
    EmergencyHeat,
    FanGas,
    Reheat,
    Fan,
    Cooling,
    LoopPump,
    HeatPumpHeat,
    Gas,
}

impl LoadCategory {
    pub const ALL: [LoadCategory; 8] = [
        LoadCategory::EmergencyHeat,
        LoadCategory::FanGas,
        LoadCategory::Reheat,
        LoadCategory::Fan,
        LoadCategory::Cooling,
        LoadCategory::LoopPump,
        LoadCategory::HeatPumpHeat,
        LoadCategory::Gas,
    ];

    /// Upstream field name, also used as the metric name suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadCategory::EmergencyHeat => "eheat",
            LoadCategory::FanGas => "fangas",
            LoadCategory::Reheat => "reheat",
            LoadCategory::Fan => "fan",
            LoadCategory::Cooling => "cooling",
            LoadCategory::LoopPump => "looppump",
            LoadCategory::HeatPumpHeat => "hpheat",
            LoadCategory::Gas => "gas",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadCategory::EmergencyHeat => "emergency heat",
            LoadCategory::FanGas => "fan with gas heat",
            LoadCategory::Reheat => "reheat",
            LoadCategory::Fan => "fan",
            LoadCategory::Cooling => "cooling",
            LoadCategory::LoopPump => "loop pump",
            LoadCategory::HeatPumpHeat => "heat pump heat",
            LoadCategory::Gas => "gas",
        }
    }
}
