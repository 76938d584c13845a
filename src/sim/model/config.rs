use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RTempError, Result};
use crate::sim::longwave::{LongwaveCloudMethod, LongwaveMethod};
use crate::sim::solar::{SiteLocation, SolarMethod};
use crate::sim::wind::WindFunctionMethod;

/// Diffusivity of water, used when the sediment value is missing [cm²/s].
const WATER_THERMAL_DIFFUSIVITY: f64 = 0.0014;
/// Sediment thickness used when the configured value is not positive [cm].
const DEFAULT_SEDIMENT_THICKNESS: f64 = 10.0;

/// What to do with a record whose timestamp equals the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateTimestepPolicy {
    /// Emit a row repeating the previous state; one output row per input row.
    #[default]
    EmitUnchanged,
    /// Drop the record without emitting a row.
    Skip,
}

/// Site, water body and method configuration for a heat-budget run.
///
/// Deserializes from partial documents: any missing field takes its default.
/// Method selectors are kept as strings and resolved when a model is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    // Site
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// Metres above sea level.
    pub elevation: f64,
    /// Hours from UTC, negative west.
    pub timezone: f64,
    pub daylight_savings: bool,

    // Initial conditions [°C]
    pub initial_water_temperature: f64,
    pub initial_sediment_temperature: f64,
    /// Floor applied to water and sediment temperatures.
    pub minimum_temperature: f64,

    // Water body
    /// Metres.
    pub water_depth: f64,
    /// Fraction of solar radiation blocked, [0, 1].
    pub effective_shade: f64,
    /// Height of the wind measurement [m].
    pub wind_height: f64,
    /// Multiplier on measured wind, 1 = fully exposed.
    #[serde(alias = "effective_wind_factor")]
    pub wind_shelter_factor: f64,

    // Sediment
    /// W/(m·°C).
    pub sediment_thermal_conductivity: f64,
    /// cm²/s.
    pub sediment_thermal_diffusivity: f64,
    /// cm.
    pub sediment_thickness: f64,
    /// cm/day.
    pub hyporheic_exchange_rate: f64,

    // Groundwater
    /// °C.
    pub groundwater_temperature: f64,
    /// cm/day.
    pub groundwater_inflow: f64,

    // Methods
    pub solar_method: String,
    pub longwave_method: String,
    pub wind_function_method: String,

    // Coefficients
    /// Bras turbidity factor (2-5).
    pub atmospheric_turbidity: f64,
    /// Ryan-Stolzenbach transmission coefficient (0.70-0.91).
    pub atmospheric_transmission_coeff: f64,
    pub brutsaert_coefficient: f64,
    pub solar_cloud_kcl1: f64,
    pub solar_cloud_kcl2: f64,
    pub longwave_cloud_method: String,
    pub longwave_cloud_kcl3: f64,
    pub longwave_cloud_kcl4: f64,

    // Numerics
    /// Largest allowed change in water temperature per step [°C].
    pub stability_criteria: f64,
    /// Gaps longer than this are logged [h].
    pub large_timestep_warning_hours: f64,
    /// Gaps longer than this reset temperatures to the air/dewpoint mean [h].
    pub large_timestep_reset_hours: f64,
    pub duplicate_timestep_policy: DuplicateTimestepPolicy,

    pub enable_diagnostics: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
            timezone: 0.0,
            daylight_savings: false,
            initial_water_temperature: 20.0,
            initial_sediment_temperature: 20.0,
            minimum_temperature: 0.0,
            water_depth: 1.0,
            effective_shade: 0.0,
            wind_height: 2.0,
            wind_shelter_factor: 1.0,
            sediment_thermal_conductivity: 0.0,
            sediment_thermal_diffusivity: 0.0,
            sediment_thickness: DEFAULT_SEDIMENT_THICKNESS,
            hyporheic_exchange_rate: 0.0,
            groundwater_temperature: 15.0,
            groundwater_inflow: 0.0,
            solar_method: SolarMethod::default().name().to_string(),
            longwave_method: LongwaveMethod::default().name().to_string(),
            wind_function_method: WindFunctionMethod::default().name().to_string(),
            atmospheric_turbidity: 2.0,
            atmospheric_transmission_coeff: 0.8,
            brutsaert_coefficient: 1.24,
            solar_cloud_kcl1: 1.0,
            solar_cloud_kcl2: 2.0,
            longwave_cloud_method: LongwaveCloudMethod::default().name().to_string(),
            longwave_cloud_kcl3: 1.0,
            longwave_cloud_kcl4: 2.0,
            stability_criteria: 5.0,
            large_timestep_warning_hours: 2.0,
            large_timestep_reset_hours: 4.0,
            duplicate_timestep_policy: DuplicateTimestepPolicy::default(),
            enable_diagnostics: false,
        }
    }
}

impl Configuration {
    /// Default configuration at a site.
    pub fn at_site(latitude: f64, longitude: f64, elevation: f64, timezone: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timezone,
            ..Self::default()
        }
    }

    pub fn site(&self) -> SiteLocation {
        SiteLocation::new(
            self.latitude,
            self.longitude,
            self.timezone,
            self.daylight_savings,
        )
    }

    pub fn solar_method(&self) -> Result<SolarMethod> {
        self.solar_method.parse()
    }

    pub fn longwave_method(&self) -> Result<LongwaveMethod> {
        self.longwave_method.parse()
    }

    pub fn wind_function_method(&self) -> Result<WindFunctionMethod> {
        self.wind_function_method.parse()
    }

    pub fn longwave_cloud_method(&self) -> Result<LongwaveCloudMethod> {
        self.longwave_cloud_method.parse()
    }

    fn numeric_fields(&self) -> [(&'static str, f64); 27] {
        [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("elevation", self.elevation),
            ("timezone", self.timezone),
            ("initial_water_temperature", self.initial_water_temperature),
            ("initial_sediment_temperature", self.initial_sediment_temperature),
            ("minimum_temperature", self.minimum_temperature),
            ("water_depth", self.water_depth),
            ("effective_shade", self.effective_shade),
            ("wind_height", self.wind_height),
            ("wind_shelter_factor", self.wind_shelter_factor),
            ("sediment_thermal_conductivity", self.sediment_thermal_conductivity),
            ("sediment_thermal_diffusivity", self.sediment_thermal_diffusivity),
            ("sediment_thickness", self.sediment_thickness),
            ("hyporheic_exchange_rate", self.hyporheic_exchange_rate),
            ("groundwater_temperature", self.groundwater_temperature),
            ("groundwater_inflow", self.groundwater_inflow),
            ("atmospheric_turbidity", self.atmospheric_turbidity),
            ("atmospheric_transmission_coeff", self.atmospheric_transmission_coeff),
            ("brutsaert_coefficient", self.brutsaert_coefficient),
            ("solar_cloud_kcl1", self.solar_cloud_kcl1),
            ("solar_cloud_kcl2", self.solar_cloud_kcl2),
            ("longwave_cloud_kcl3", self.longwave_cloud_kcl3),
            ("longwave_cloud_kcl4", self.longwave_cloud_kcl4),
            ("stability_criteria", self.stability_criteria),
            ("large_timestep_warning_hours", self.large_timestep_warning_hours),
            ("large_timestep_reset_hours", self.large_timestep_reset_hours),
        ]
    }

    /// Checks site parameters and returns a repaired copy.
    ///
    /// Values that cannot be repaired are errors, including any NaN or
    /// infinite number. Negative rates and conductivity, and non-positive
    /// sediment diffusivity or thickness, are replaced with defaults and
    /// logged.
    pub fn validated(&self) -> Result<Configuration> {
        let invalid =
            |name: &'static str, value: f64, reason: &'static str| -> Result<Configuration> {
                Err(RTempError::InvalidParameter {
                    name,
                    value,
                    reason,
                })
            };

        let non_finite = self.numeric_fields().into_iter().find(|(_, v)| !v.is_finite());
        if let Some((name, value)) = non_finite {
            return invalid(name, value, "must be finite");
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return invalid("latitude", self.latitude, "must be within [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return invalid("longitude", self.longitude, "must be within [-180, 180]");
        }
        if !(self.water_depth > 0.0) {
            return invalid("water_depth", self.water_depth, "must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.effective_shade) {
            return invalid("effective_shade", self.effective_shade, "must be within [0, 1]");
        }
        if !(self.wind_height > 0.0) {
            return invalid("wind_height", self.wind_height, "must be greater than zero");
        }
        if !(self.wind_shelter_factor >= 0.0) {
            return invalid(
                "wind_shelter_factor",
                self.wind_shelter_factor,
                "must be non-negative",
            );
        }
        if !(self.groundwater_temperature >= 0.0) {
            return invalid(
                "groundwater_temperature",
                self.groundwater_temperature,
                "must be non-negative",
            );
        }
        if !(self.stability_criteria > 0.0) {
            return invalid(
                "stability_criteria",
                self.stability_criteria,
                "must be greater than zero",
            );
        }
        if !(self.large_timestep_warning_hours > 0.0) {
            return invalid(
                "large_timestep_warning_hours",
                self.large_timestep_warning_hours,
                "must be greater than zero",
            );
        }
        if !(self.large_timestep_reset_hours >= self.large_timestep_warning_hours) {
            return invalid(
                "large_timestep_reset_hours",
                self.large_timestep_reset_hours,
                "must not be below large_timestep_warning_hours",
            );
        }

        let mut cfg = self.clone();
        if cfg.groundwater_inflow < 0.0 {
            warn!("Groundwater inflow was negative ({}), set to zero", cfg.groundwater_inflow);
            cfg.groundwater_inflow = 0.0;
        }
        if cfg.sediment_thermal_conductivity < 0.0 {
            warn!(
                "Sediment thermal conductivity was negative ({}), set to zero",
                cfg.sediment_thermal_conductivity
            );
            cfg.sediment_thermal_conductivity = 0.0;
        }
        if cfg.sediment_thermal_diffusivity <= 0.0 {
            warn!(
                "Sediment thermal diffusivity was not positive ({}), set to {} cm²/s (water)",
                cfg.sediment_thermal_diffusivity,
                WATER_THERMAL_DIFFUSIVITY
            );
            cfg.sediment_thermal_diffusivity = WATER_THERMAL_DIFFUSIVITY;
        }
        if cfg.sediment_thickness <= 0.0 {
            warn!(
                "Sediment thickness was not positive ({}), set to {DEFAULT_SEDIMENT_THICKNESS} cm",
                cfg.sediment_thickness
            );
            cfg.sediment_thickness = DEFAULT_SEDIMENT_THICKNESS;
        }
        if cfg.hyporheic_exchange_rate < 0.0 {
            warn!(
                "Hyporheic exchange rate was negative ({}), set to zero",
                cfg.hyporheic_exchange_rate
            );
            cfg.hyporheic_exchange_rate = 0.0;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Configuration::default();
        assert_eq!(cfg.solar_method, "Bras");
        assert_eq!(cfg.longwave_method, "Brunt");
        assert_eq!(cfg.wind_function_method, "Brady-Graves-Geyer");
        assert_eq!(cfg.longwave_cloud_method, "Eqn 1");
        assert_eq!(cfg.stability_criteria, 5.0);
        assert_eq!(cfg.duplicate_timestep_policy, DuplicateTimestepPolicy::EmitUnchanged);
        assert!(!cfg.enable_diagnostics);
    }

    #[test]
    fn test_method_enum_defaults() {
        assert_eq!(SolarMethod::default(), SolarMethod::Bras);
        assert_eq!(LongwaveMethod::default(), LongwaveMethod::Brunt);
        assert_eq!(WindFunctionMethod::default(), WindFunctionMethod::BradyGravesGeyer);
        assert_eq!(LongwaveCloudMethod::default(), LongwaveCloudMethod::Eqn1);
        assert_eq!(DuplicateTimestepPolicy::default(), DuplicateTimestepPolicy::EmitUnchanged);
    }

    #[test]
    fn test_method_resolution() {
        let mut cfg = Configuration::default();
        assert_eq!(cfg.solar_method(), Ok(SolarMethod::Bras));
        cfg.wind_function_method = "Helfrich".to_string();
        assert_eq!(cfg.wind_function_method(), Ok(WindFunctionMethod::Helfrich));
        cfg.longwave_method = "Unknown".to_string();
        assert!(matches!(
            cfg.longwave_method(),
            Err(RTempError::UnknownMethod { kind: "longwave", .. })
        ));
    }

    fn assert_rejected(field: &str, mutate: impl FnOnce(&mut Configuration)) {
        let mut cfg = Configuration::at_site(45.0, -120.0, 100.0, -8.0);
        mutate(&mut cfg);
        match cfg.validated() {
            Err(RTempError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("{field}: expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors() {
        assert!(Configuration::at_site(45.0, -120.0, 100.0, -8.0).validated().is_ok());

        assert_rejected("water_depth", |c| c.water_depth = 0.0);
        assert_rejected("effective_shade", |c| c.effective_shade = 1.2);
        assert_rejected("wind_height", |c| c.wind_height = -1.0);
        assert_rejected("wind_shelter_factor", |c| c.wind_shelter_factor = -0.5);
        assert_rejected("groundwater_temperature", |c| c.groundwater_temperature = -1.0);
        assert_rejected("latitude", |c| c.latitude = 95.0);
        assert_rejected("longitude", |c| c.longitude = -181.0);
        assert_rejected("stability_criteria", |c| c.stability_criteria = 0.0);
        assert_rejected("large_timestep_reset_hours", |c| c.large_timestep_reset_hours = 1.0);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert_rejected("initial_water_temperature", |c| c.initial_water_temperature = f64::NAN);
        assert_rejected("longwave_cloud_kcl3", |c| c.longwave_cloud_kcl3 = f64::INFINITY);
        assert_rejected("minimum_temperature", |c| c.minimum_temperature = f64::NEG_INFINITY);
        assert_rejected("solar_cloud_kcl1", |c| c.solar_cloud_kcl1 = f64::NAN);
        assert_rejected("groundwater_inflow", |c| c.groundwater_inflow = f64::NAN);
        assert_rejected("large_timestep_reset_hours", |c| {
            c.large_timestep_reset_hours = f64::INFINITY
        });

        let mut cfg = Configuration::at_site(45.0, -120.0, 100.0, -8.0);
        cfg.elevation = f64::NAN;
        match cfg.validated() {
            Err(RTempError::InvalidParameter { reason, .. }) => {
                assert_eq!(reason, "must be finite")
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_repairs() -> Result<()> {
        let cfg = Configuration {
            groundwater_inflow: -2.0,
            sediment_thermal_conductivity: -1.0,
            sediment_thermal_diffusivity: 0.0,
            sediment_thickness: -3.0,
            hyporheic_exchange_rate: -0.1,
            ..Configuration::default()
        };
        let fixed = cfg.validated()?;
        assert_eq!(fixed.groundwater_inflow, 0.0);
        assert_eq!(fixed.sediment_thermal_conductivity, 0.0);
        assert_eq!(fixed.sediment_thermal_diffusivity, 0.0014);
        assert_eq!(fixed.sediment_thickness, 10.0);
        assert_eq!(fixed.hyporheic_exchange_rate, 0.0);
        Ok(())
    }

    #[test]
    fn test_partial_json_fills_defaults() -> serde_json::Result<()> {
        let cfg: Configuration = serde_json::from_str(
            r#"{"latitude": 45.0, "longitude": -120.0, "effective_wind_factor": 0.7,
                "duplicate_timestep_policy": "skip"}"#,
        )?;
        assert_eq!(cfg.latitude, 45.0);
        assert_eq!(cfg.wind_shelter_factor, 0.7);
        assert_eq!(cfg.water_depth, 1.0);
        assert_eq!(cfg.duplicate_timestep_policy, DuplicateTimestepPolicy::Skip);
        Ok(())
    }
}
