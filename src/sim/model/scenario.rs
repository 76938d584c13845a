use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::config::Configuration;
use super::result::SimulationOutput;
use super::simulation::HeatBudgetModel;
use super::weather::MeteorologicalRecord;

/// Named management change applied on top of a base configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub effective_shade: Option<f64>,
    pub water_depth: Option<f64>,
    pub groundwater_temperature: Option<f64>,
    pub groundwater_inflow: Option<f64>,
    pub wind_shelter_factor: Option<f64>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Base configuration with this scenario's overrides.
    pub fn apply(&self, base: &Configuration) -> Configuration {
        let mut cfg = base.clone();
        if let Some(v) = self.effective_shade {
            cfg.effective_shade = v;
        }
        if let Some(v) = self.water_depth {
            cfg.water_depth = v;
        }
        if let Some(v) = self.groundwater_temperature {
            cfg.groundwater_temperature = v;
        }
        if let Some(v) = self.groundwater_inflow {
            cfg.groundwater_inflow = v;
        }
        if let Some(v) = self.wind_shelter_factor {
            cfg.wind_shelter_factor = v;
        }
        cfg
    }
}

/// Runs every scenario over the same records in parallel.
///
/// Results keep the scenario order. A failing scenario does not stop the others.
pub fn run_scenarios(
    base: &Configuration,
    scenarios: &[Scenario],
    records: &[MeteorologicalRecord],
) -> Vec<(String, Result<SimulationOutput>)> {
    scenarios
        .par_iter()
        .map(|scenario| {
            let result = HeatBudgetModel::new(&scenario.apply(base)).and_then(|m| m.run(records));
            if let Err(e) = &result {
                log::warn!("Scenario '{}' failed: {e}", scenario.name);
            }
            (scenario.name.clone(), result)
        })
        .collect()
}
