use std::f64::consts::PI;

use chrono::{Duration, NaiveDateTime, Timelike};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{RTempError, Result};
use crate::sim::solar::AtmosphericParameters;

/// Values at or below this are treated as missing data.
pub const MISSING_VALUE: f64 = -999.0;

const DEFAULT_AIR_TEMPERATURE: f64 = 20.0;
const DEFAULT_DEWPOINT_TEMPERATURE: f64 = 10.0;

/// Optional per-record atmospheric values for the Bird and Iqbal models.
///
/// Unset fields fall back to [`AtmosphericParameters::for_elevation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericOverrides {
    pub pressure_mb: Option<f64>,
    pub ozone_cm: Option<f64>,
    pub water_vapor_cm: Option<f64>,
    pub aod_500nm: Option<f64>,
    pub aod_380nm: Option<f64>,
    pub forward_scatter: Option<f64>,
    pub ground_albedo: Option<f64>,
    pub visibility_km: Option<f64>,
}

impl AtmosphericOverrides {
    /// Fills unset values from the defaults for a site elevation [m].
    pub fn resolve(&self, site_elevation: f64) -> AtmosphericParameters {
        let d = AtmosphericParameters::for_elevation(site_elevation);
        AtmosphericParameters {
            pressure_mb: self.pressure_mb.unwrap_or(d.pressure_mb),
            ozone_cm: self.ozone_cm.unwrap_or(d.ozone_cm),
            water_vapor_cm: self.water_vapor_cm.unwrap_or(d.water_vapor_cm),
            aod_500nm: self.aod_500nm.unwrap_or(d.aod_500nm),
            aod_380nm: self.aod_380nm.unwrap_or(d.aod_380nm),
            forward_scatter: self.forward_scatter.unwrap_or(d.forward_scatter),
            ground_albedo: self.ground_albedo.unwrap_or(d.ground_albedo),
            visibility_km: self.visibility_km.unwrap_or(d.visibility_km),
        }
    }

    /// Drops or clamps values the transmittance models cannot use, logging
    /// one warning per repair. `at` is the record time, used in messages.
    pub fn validated(&self, at: NaiveDateTime) -> AtmosphericOverrides {
        AtmosphericOverrides {
            pressure_mb: positive(self.pressure_mb, "Pressure", at),
            ozone_cm: non_negative(self.ozone_cm, "Ozone", at),
            water_vapor_cm: non_negative(self.water_vapor_cm, "Water vapor", at),
            aod_500nm: non_negative(self.aod_500nm, "AOD 500 nm", at),
            aod_380nm: non_negative(self.aod_380nm, "AOD 380 nm", at),
            forward_scatter: fraction(self.forward_scatter, "Forward scatter", at),
            ground_albedo: fraction(self.ground_albedo, "Ground albedo", at),
            visibility_km: positive(self.visibility_km, "Visibility", at),
        }
    }
}

fn positive(value: Option<f64>, name: &str, at: NaiveDateTime) -> Option<f64> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            warn!("{name} override was {v} at {at}, site default used");
            None
        }
        other => other,
    }
}

fn non_negative(value: Option<f64>, name: &str, at: NaiveDateTime) -> Option<f64> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => {
            warn!("{name} override was {v} at {at}, site default used");
            None
        }
        other => other,
    }
}

fn fraction(value: Option<f64>, name: &str, at: NaiveDateTime) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            warn!("{name} override was {v} at {at}, site default used");
            None
        }
        Some(v) if !(0.0..=1.0).contains(&v) => {
            let clamped = v.clamp(0.0, 1.0);
            warn!("{name} override was {v} at {at}, set to {clamped}");
            Some(clamped)
        }
        other => other,
    }
}

/// Meteorological forcing for one timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteorologicalRecord {
    /// Local standard time at the site.
    pub datetime: NaiveDateTime,
    /// °C
    pub air_temperature: f64,
    /// °C
    pub dewpoint_temperature: f64,
    /// Measured at the configured wind height [m/s].
    pub wind_speed: f64,
    /// Fraction of sky covered [0, 1].
    pub cloud_cover: f64,
    /// Measured global horizontal irradiance [W/m²]; replaces the clear-sky model.
    #[serde(default)]
    pub solar_radiation: Option<f64>,
    /// Metres.
    #[serde(default)]
    pub water_depth_override: Option<f64>,
    #[serde(default)]
    pub effective_shade_override: Option<f64>,
    #[serde(default, flatten)]
    pub atmosphere: AtmosphericOverrides,
}

impl MeteorologicalRecord {
    pub fn new(
        datetime: NaiveDateTime,
        air_temperature: f64,
        dewpoint_temperature: f64,
        wind_speed: f64,
        cloud_cover: f64,
    ) -> Self {
        Self {
            datetime,
            air_temperature,
            dewpoint_temperature,
            wind_speed,
            cloud_cover,
            solar_radiation: None,
            water_depth_override: None,
            effective_shade_override: None,
            atmosphere: AtmosphericOverrides::default(),
        }
    }

    /// Repairs out-of-range values, logging one warning per repair.
    ///
    /// `index` is the record's position in the input, used in messages.
    /// A non-positive depth override cannot be repaired and is an error.
    pub fn validated(&self, index: usize) -> Result<MeteorologicalRecord> {
        let mut r = self.clone();
        let at = r.datetime;

        if !r.air_temperature.is_finite() || r.air_temperature <= MISSING_VALUE {
            warn!("Air temperature missing at {at}, set to {DEFAULT_AIR_TEMPERATURE} °C");
            r.air_temperature = DEFAULT_AIR_TEMPERATURE;
        }
        if !r.dewpoint_temperature.is_finite() || r.dewpoint_temperature <= MISSING_VALUE {
            warn!(
                "Dewpoint temperature missing at {at}, set to {DEFAULT_DEWPOINT_TEMPERATURE} °C"
            );
            r.dewpoint_temperature = DEFAULT_DEWPOINT_TEMPERATURE;
        }
        if !r.wind_speed.is_finite() || r.wind_speed < 0.0 {
            warn!("Wind speed was invalid ({}) at {at}, set to zero", r.wind_speed);
            r.wind_speed = 0.0;
        }
        if !r.cloud_cover.is_finite() {
            warn!("Cloud cover missing at {at}, set to zero");
            r.cloud_cover = 0.0;
        } else if !(0.0..=1.0).contains(&r.cloud_cover) {
            let clamped = r.cloud_cover.clamp(0.0, 1.0);
            warn!("Cloud cover was {} at {at}, set to {clamped}", r.cloud_cover);
            r.cloud_cover = clamped;
        }
        if let Some(shade) = r.effective_shade_override
            && !(0.0..=1.0).contains(&shade)
        {
            let clamped = if shade.is_finite() { shade.clamp(0.0, 1.0) } else { 0.0 };
            warn!("Shade override was {shade} at {at}, set to {clamped}");
            r.effective_shade_override = Some(clamped);
        }
        if let Some(solar) = r.solar_radiation {
            if !solar.is_finite() {
                warn!("Measured solar radiation was {solar} at {at}, ignored");
                r.solar_radiation = None;
            } else if solar < 0.0 {
                warn!("Measured solar radiation was negative ({solar}) at {at}, set to zero");
                r.solar_radiation = Some(0.0);
            }
        }
        r.atmosphere = r.atmosphere.validated(at);
        if let Some(depth) = r.water_depth_override
            && !(depth > 0.0 && depth.is_finite())
        {
            return Err(RTempError::InvalidRecord {
                index,
                reason: format!("water depth override must be a positive depth, got {depth}"),
            });
        }
        Ok(r)
    }
}

/// Synthetic hourly forcing with a diurnal air-temperature cycle.
///
/// Air temperature is a sinusoid of 24 h period about `base_temp`, peaking
/// at `base_temp + amplitude` at 15:00 and bottoming at 03:00. The dewpoint
/// is 5 °C below the air, with a 2 m/s wind and 30% cloud cover.
pub fn diurnal_series(
    start: NaiveDateTime,
    hours: usize,
    base_temp: f64,
    amplitude: f64,
) -> Vec<MeteorologicalRecord> {
    (0..hours)
        .map(|i| {
            let datetime = start + Duration::hours(i as i64);
            let hour = f64::from(datetime.hour());
            let air = base_temp + amplitude * (PI * (hour - 9.0) / 12.0).sin();
            MeteorologicalRecord::new(datetime, air, air - 5.0, 2.0, 0.3)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn t0() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-07-15 00:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp")
    }

    #[test]
    fn test_missing_values_replaced() -> Result<()> {
        let rec = MeteorologicalRecord::new(t0(), -999.0, -9999.0, -1.0, 1.7);
        let v = rec.validated(0)?;
        assert_eq!(v.air_temperature, 20.0);
        assert_eq!(v.dewpoint_temperature, 10.0);
        assert_eq!(v.wind_speed, 0.0);
        assert_eq!(v.cloud_cover, 1.0);

        let rec = MeteorologicalRecord::new(t0(), f64::NAN, 5.0, f64::INFINITY, -0.3);
        let v = rec.validated(0)?;
        assert_eq!(v.air_temperature, 20.0);
        assert_eq!(v.wind_speed, 0.0);
        assert_eq!(v.cloud_cover, 0.0);
        Ok(())
    }

    #[test]
    fn test_valid_record_unchanged() -> Result<()> {
        let rec = MeteorologicalRecord::new(t0(), 18.0, 9.0, 3.0, 0.4);
        assert_eq!(rec.validated(3)?, rec);
        Ok(())
    }

    #[test]
    fn test_override_repairs() -> Result<()> {
        let mut rec = MeteorologicalRecord::new(t0(), 18.0, 9.0, 3.0, 0.4);
        rec.effective_shade_override = Some(1.4);
        rec.solar_radiation = Some(-12.0);
        let v = rec.validated(0)?;
        assert_eq!(v.effective_shade_override, Some(1.0));
        assert_eq!(v.solar_radiation, Some(0.0));

        rec.solar_radiation = Some(f64::NAN);
        assert_eq!(rec.validated(0)?.solar_radiation, None);
        Ok(())
    }

    #[test]
    fn test_atmospheric_override_repairs() -> Result<()> {
        let mut rec = MeteorologicalRecord::new(t0(), 18.0, 9.0, 3.0, 0.4);
        rec.atmosphere = AtmosphericOverrides {
            pressure_mb: Some(-5.0),
            ozone_cm: Some(f64::NAN),
            water_vapor_cm: Some(-0.1),
            aod_500nm: Some(0.0),
            aod_380nm: Some(f64::INFINITY),
            forward_scatter: Some(1.3),
            ground_albedo: Some(-0.2),
            visibility_km: Some(0.0),
        };
        let a = rec.validated(0)?.atmosphere;
        assert_eq!(a.pressure_mb, None);
        assert_eq!(a.ozone_cm, None);
        assert_eq!(a.water_vapor_cm, None);
        assert_eq!(a.aod_500nm, Some(0.0));
        assert_eq!(a.aod_380nm, None);
        assert_eq!(a.forward_scatter, Some(1.0));
        assert_eq!(a.ground_albedo, Some(0.0));
        assert_eq!(a.visibility_km, None);

        rec.atmosphere = AtmosphericOverrides {
            pressure_mb: Some(850.0),
            visibility_km: Some(40.0),
            forward_scatter: Some(f64::NAN),
            ..Default::default()
        };
        let a = rec.validated(0)?.atmosphere;
        assert_eq!(a.pressure_mb, Some(850.0));
        assert_eq!(a.visibility_km, Some(40.0));
        assert_eq!(a.forward_scatter, None);
        Ok(())
    }

    #[test]
    fn test_zero_depth_override_rejected() {
        let mut rec = MeteorologicalRecord::new(t0(), 18.0, 9.0, 3.0, 0.4);
        rec.water_depth_override = Some(0.0);
        match rec.validated(7) {
            Err(RTempError::InvalidRecord { index, .. }) => assert_eq!(index, 7),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_atmospheric_overrides_resolve() {
        let o = AtmosphericOverrides {
            ozone_cm: Some(0.3),
            ..Default::default()
        };
        let p = o.resolve(1500.0);
        assert_eq!(p.ozone_cm, 0.3);
        assert_eq!(p.water_vapor_cm, 1.5);
        assert!(p.pressure_mb < 900.0, "got {}", p.pressure_mb);
    }

    #[test]
    fn test_diurnal_series_shape() {
        let recs = diurnal_series(t0(), 24, 15.0, 10.0);
        assert_eq!(recs.len(), 24);
        assert_relative_eq!(recs[15].air_temperature, 25.0, epsilon = 1e-12);
        assert_relative_eq!(recs[3].air_temperature, 5.0, epsilon = 1e-12);
        assert_relative_eq!(recs[9].air_temperature, 15.0, epsilon = 1e-12);
        assert_relative_eq!(recs[15].dewpoint_temperature, 20.0, epsilon = 1e-12);
        let mean = recs.iter().map(|r| r.air_temperature).sum::<f64>() / 24.0;
        assert_relative_eq!(mean, 15.0, epsilon = 1e-9);
        assert!(recs.windows(2).all(|w| w[1].datetime > w[0].datetime));
    }
}
