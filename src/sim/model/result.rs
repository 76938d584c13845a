use chrono::NaiveDateTime;
use serde::Serialize;

/// Intermediate values of one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    /// Saturation vapor pressure at the water temperature [mmHg].
    pub vapor_pressure_water: f64,
    /// Vapor pressure of the air from the dewpoint [mmHg].
    pub vapor_pressure_air: f64,
    /// Clear-sky atmospheric emissivity.
    pub atmospheric_emissivity: f64,
    /// m/s, after the shelter factor.
    pub wind_speed_2m: f64,
    /// m/s, after the shelter factor.
    pub wind_speed_7m: f64,
    /// cal/(cm²·day·mmHg)
    pub wind_function: f64,
    /// °C/day
    pub water_temp_change_rate: f64,
    /// °C/day
    pub sediment_temp_change_rate: f64,
}

/// Output of one timestep. Fluxes are in W/m², positive into the water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRecord {
    pub datetime: NaiveDateTime,
    /// Degrees from north.
    pub solar_azimuth: f64,
    /// Degrees above the horizon.
    pub solar_elevation: f64,
    /// Absorbed solar radiation after cloud, shade and albedo.
    pub solar_radiation: f64,
    pub longwave_atmospheric: f64,
    /// Always negative.
    pub longwave_back: f64,
    pub evaporation: f64,
    pub convection: f64,
    pub sediment_conduction: f64,
    pub hyporheic_exchange: f64,
    pub groundwater: f64,
    pub net_flux: f64,
    pub water_temperature: f64,
    pub sediment_temperature: f64,
    pub air_temperature: f64,
    pub dewpoint_temperature: f64,
    #[serde(skip)]
    pub diagnostics: Option<DiagnosticRecord>,
}

/// Aggregate statistics of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub min_water_temperature: f64,
    pub max_water_temperature: f64,
    pub mean_water_temperature: f64,
    pub min_sediment_temperature: f64,
    pub max_sediment_temperature: f64,
    /// W/m²
    pub mean_net_flux: f64,
    /// Absorbed solar energy over the run [MJ/m²].
    pub total_solar_energy: f64,
}

/// Ordered result of a heat-budget run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOutput {
    pub records: Vec<ResultRecord>,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn water_temperatures(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.water_temperature).collect()
    }

    pub fn has_diagnostics(&self) -> bool {
        self.records.iter().any(|r| r.diagnostics.is_some())
    }

    /// Returns `None` for an empty run.
    ///
    /// Solar energy holds each record's radiation until the next record,
    /// so the last record contributes nothing.
    pub fn summary(&self) -> Option<RunSummary> {
        let first = self.records.first()?;
        let n = self.records.len();

        let mut min_water = first.water_temperature;
        let mut max_water = first.water_temperature;
        let mut min_sed = first.sediment_temperature;
        let mut max_sed = first.sediment_temperature;
        let mut sum_water = 0.0;
        let mut sum_net = 0.0;
        for r in &self.records {
            min_water = min_water.min(r.water_temperature);
            max_water = max_water.max(r.water_temperature);
            min_sed = min_sed.min(r.sediment_temperature);
            max_sed = max_sed.max(r.sediment_temperature);
            sum_water += r.water_temperature;
            sum_net += r.net_flux;
        }

        let solar_joules: f64 = self
            .records
            .windows(2)
            .map(|w| w[0].solar_radiation * (w[1].datetime - w[0].datetime).num_seconds() as f64)
            .sum();

        Some(RunSummary {
            records: n,
            min_water_temperature: min_water,
            max_water_temperature: max_water,
            mean_water_temperature: sum_water / n as f64,
            min_sediment_temperature: min_sed,
            max_sediment_temperature: max_sed,
            mean_net_flux: sum_net / n as f64,
            total_solar_energy: solar_joules / 1.0e6,
        })
    }
}
