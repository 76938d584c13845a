//! Atmospheric and water-surface longwave radiation [W/m²].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RTempError;
use crate::units::{ATMOSPHERIC_REFLECTION, STEFAN_BOLTZMANN, WATER_EMISSIVITY, celsius_to_kelvin};

/// How cloud cover raises the clear-sky emissivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongwaveCloudMethod {
    /// `ε·(1 + kcl3·C^kcl4)`
    #[default]
    Eqn1,
    /// `(ε·(1 − C) + C)·(1 + kcl3·C^kcl4)`
    Eqn2,
}

impl LongwaveCloudMethod {
    pub const ALL: [LongwaveCloudMethod; 2] = [Self::Eqn1, Self::Eqn2];

    pub fn name(self) -> &'static str {
        match self {
            Self::Eqn1 => "Eqn 1",
            Self::Eqn2 => "Eqn 2",
        }
    }
}

impl fmt::Display for LongwaveCloudMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LongwaveCloudMethod {
    type Err = RTempError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| RTempError::UnknownMethod {
                kind: "longwave cloud correction",
                name: s.to_string(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Longwave radiation with a configured cloud correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongwaveRadiation {
    pub cloud_method: LongwaveCloudMethod,
    pub kcl3: f64,
    pub kcl4: f64,
}

impl LongwaveRadiation {
    pub fn new(cloud_method: LongwaveCloudMethod, kcl3: f64, kcl4: f64) -> Self {
        Self {
            cloud_method,
            kcl3,
            kcl4,
        }
    }

    /// Cloud-corrected emissivity clamped to [0, 1].
    pub fn cloudy_emissivity(&self, clear_sky_emissivity: f64, cloud_cover: f64) -> f64 {
        let c = cloud_cover.clamp(0.0, 1.0);
        let boost = 1.0 + self.kcl3 * c.powf(self.kcl4);
        let eps = match self.cloud_method {
            LongwaveCloudMethod::Eqn1 => clear_sky_emissivity * boost,
            LongwaveCloudMethod::Eqn2 => (clear_sky_emissivity * (1.0 - c) + c) * boost,
        };
        eps.clamp(0.0, 1.0)
    }

    /// Downward atmospheric longwave absorbed by the water [W/m²].
    ///
    /// Stefan-Boltzmann at air temperature with the cloud-corrected
    /// emissivity, less the 3% reflected at the surface.
    pub fn atmospheric(&self, clear_sky_emissivity: f64, air_temp: f64, cloud_cover: f64) -> f64 {
        let eps = self.cloudy_emissivity(clear_sky_emissivity, cloud_cover);
        eps * STEFAN_BOLTZMANN
            * celsius_to_kelvin(air_temp).powi(4)
            * (1.0 - ATMOSPHERIC_REFLECTION)
    }
}

impl Default for LongwaveRadiation {
    fn default() -> Self {
        Self::new(LongwaveCloudMethod::Eqn1, 1.0, 2.0)
    }
}

/// Longwave emitted by the water surface [W/m²], as a positive magnitude.
pub fn back_radiation(water_temp: f64) -> f64 {
    WATER_EMISSIVITY * STEFAN_BOLTZMANN * celsius_to_kelvin(water_temp).powi(4)
}
