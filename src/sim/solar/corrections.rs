//! Cloud, shade and surface-reflection corrections to solar irradiance.
//!
//! Applied in that order to either a modelled clear-sky value or a measured
//! one. Inputs are clamped to their valid ranges and results never go below 0.

/// Water albedo under a fully overcast sky.
const OVERCAST_ALBEDO: f64 = 0.06;
/// Water albedo for a clear sky with the sun higher than 30°.
const HIGH_SUN_ALBEDO: f64 = 0.03;

/// Reduces radiation for cloud cover: `base · max(0, 1 − kcl1·cloud^kcl2)`.
pub fn cloud_correction(radiation: f64, cloud_cover: f64, kcl1: f64, kcl2: f64) -> f64 {
    let cloud = cloud_cover.clamp(0.0, 1.0);
    let factor = (1.0 - kcl1 * cloud.powf(kcl2)).max(0.0);
    (radiation * factor).max(0.0)
}

/// Reduces radiation linearly by the shaded fraction of the water surface.
pub fn shade_correction(radiation: f64, effective_shade: f64) -> f64 {
    let shade = effective_shade.clamp(0.0, 1.0);
    (radiation * (1.0 - shade)).max(0.0)
}

/// Water-surface albedo after Anderson (1954).
///
/// Zero with the sun at or below the horizon. The clear-sky value rises
/// from 0.03 towards 0.40 as the sun drops below 30° and is blended with the
/// overcast value in proportion to cloud cover.
pub fn anderson_albedo(cloud_cover: f64, solar_elevation: f64) -> f64 {
    if solar_elevation <= 0.0 {
        return 0.0;
    }
    let cloud = cloud_cover.clamp(0.0, 1.0);
    let clear = if solar_elevation >= 30.0 {
        HIGH_SUN_ALBEDO
    } else {
        let sin_el = solar_elevation.to_radians().sin().max(0.01);
        HIGH_SUN_ALBEDO + 0.37 * (1.0 - sin_el).powi(2)
    };
    (clear * (1.0 - cloud) + OVERCAST_ALBEDO * cloud).clamp(0.0, 1.0)
}

/// Removes the reflected fraction of radiation.
pub fn albedo_correction(radiation: f64, albedo: f64) -> f64 {
    (radiation * (1.0 - albedo.clamp(0.0, 1.0))).max(0.0)
}

/// Cloud-correction coefficients for the whole correction pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCorrections {
    pub kcl1: f64,
    pub kcl2: f64,
}

impl SolarCorrections {
    pub fn new(kcl1: f64, kcl2: f64) -> Self {
        Self { kcl1, kcl2 }
    }

    /// Cloud, then shade, then albedo.
    pub fn apply(&self, radiation: f64, cloud_cover: f64, shade: f64, solar_elevation: f64) -> f64 {
        let r = cloud_correction(radiation, cloud_cover, self.kcl1, self.kcl2);
        let r = shade_correction(r, shade);
        albedo_correction(r, anderson_albedo(cloud_cover, solar_elevation))
    }
}

impl Default for SolarCorrections {
    fn default() -> Self {
        Self::new(1.0, 2.0)
    }
}
