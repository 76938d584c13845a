//! Clear-sky atmospheric emissivity models.
//!
//! All models take air temperature [°C] and air vapor pressure [mmHg] and
//! return an emissivity clamped to [0, 1]. Cloud cover is only read by
//! Koberg; the other models leave the cloud adjustment to
//! [`radiation`](super::radiation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RTempError;
use crate::sim::atmosphere::koberg_coefficient;
use crate::units::{celsius_to_kelvin, mmhg_to_mb};

/// Trait for atmospheric emissivity models.
pub trait EmissivityModel: Send + Sync {
    /// Returns the clear-sky atmospheric emissivity in [0, 1].
    ///
    /// - `air_temp`: air temperature [°C]
    /// - `vapor_pressure`: air vapor pressure [mmHg]
    /// - `cloud_cover`: fraction of sky covered [0, 1]
    fn emissivity(&self, air_temp: f64, vapor_pressure: f64, cloud_cover: f64) -> f64;
}

/// Brunt (1932): `0.52 + 0.065·√e`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brunt;

impl EmissivityModel for Brunt {
    fn emissivity(&self, _air_temp: f64, vapor_pressure: f64, _cloud_cover: f64) -> f64 {
        (0.52 + 0.065 * vapor_pressure.max(0.0).sqrt()).clamp(0.0, 1.0)
    }
}

/// Brutsaert (1975): `coef·(e/T)^(1/7)` with `e` in mb and `T` in kelvin.
#[derive(Debug, Clone, Copy)]
pub struct Brutsaert {
    pub coefficient: f64,
}

impl Brutsaert {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }
}

impl Default for Brutsaert {
    fn default() -> Self {
        Self::new(1.24)
    }
}

impl EmissivityModel for Brutsaert {
    fn emissivity(&self, air_temp: f64, vapor_pressure: f64, _cloud_cover: f64) -> f64 {
        let e_mb = mmhg_to_mb(vapor_pressure.max(0.0));
        let t_k = celsius_to_kelvin(air_temp);
        (self.coefficient * (e_mb / t_k).powf(1.0 / 7.0)).clamp(0.0, 1.0)
    }
}

/// Satterlund (1979): `1.08·(1 − exp(−e^(T/2016)))`, `e` in mb.
#[derive(Debug, Clone, Copy, Default)]
pub struct Satterlund;

impl EmissivityModel for Satterlund {
    fn emissivity(&self, air_temp: f64, vapor_pressure: f64, _cloud_cover: f64) -> f64 {
        let e_mb = mmhg_to_mb(vapor_pressure.max(0.0));
        let t_k = celsius_to_kelvin(air_temp);
        (1.08 * (1.0 - (-e_mb.powf(t_k / 2016.0)).exp())).clamp(0.0, 1.0)
    }
}

/// Idso & Jackson (1969), temperature only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdsoJackson;

impl EmissivityModel for IdsoJackson {
    fn emissivity(&self, air_temp: f64, _vapor_pressure: f64, _cloud_cover: f64) -> f64 {
        (1.0 - 0.261 * (-0.000777 * air_temp * air_temp).exp()).clamp(0.0, 1.0)
    }
}

/// Swinbank (1963), temperature only: `0.92e-5·T²` with `T` in kelvin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swinbank;

impl EmissivityModel for Swinbank {
    fn emissivity(&self, air_temp: f64, _vapor_pressure: f64, _cloud_cover: f64) -> f64 {
        (0.92e-5 * celsius_to_kelvin(air_temp).powi(2)).clamp(0.0, 1.0)
    }
}

/// Koberg (1964): Brunt form with a coefficient read from temperature and clearness.
#[derive(Debug, Clone, Copy, Default)]
pub struct Koberg;

impl EmissivityModel for Koberg {
    fn emissivity(&self, air_temp: f64, vapor_pressure: f64, cloud_cover: f64) -> f64 {
        let clearness = 1.0 - cloud_cover.clamp(0.0, 1.0);
        let coefficient = koberg_coefficient(air_temp, clearness);
        (0.52 + coefficient * vapor_pressure.max(0.0).sqrt()).clamp(0.0, 1.0)
    }
}

/// Atmospheric emissivity method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongwaveMethod {
    #[default]
    Brunt,
    Brutsaert,
    Satterlund,
    IdsoJackson,
    Swinbank,
    Koberg,
}

impl LongwaveMethod {
    pub const ALL: [LongwaveMethod; 6] = [
        Self::Brunt,
        Self::Brutsaert,
        Self::Satterlund,
        Self::IdsoJackson,
        Self::Swinbank,
        Self::Koberg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Brunt => "Brunt",
            Self::Brutsaert => "Brutsaert",
            Self::Satterlund => "Satterlund",
            Self::IdsoJackson => "Idso-Jackson",
            Self::Swinbank => "Swinbank",
            Self::Koberg => "Koberg",
        }
    }

    /// Instantiates the model; `brutsaert_coefficient` is only read by Brutsaert.
    pub fn build(self, brutsaert_coefficient: f64) -> Box<dyn EmissivityModel> {
        match self {
            Self::Brunt => Box::new(Brunt),
            Self::Brutsaert => Box::new(Brutsaert::new(brutsaert_coefficient)),
            Self::Satterlund => Box::new(Satterlund),
            Self::IdsoJackson => Box::new(IdsoJackson),
            Self::Swinbank => Box::new(Swinbank),
            Self::Koberg => Box::new(Koberg),
        }
    }
}

impl fmt::Display for LongwaveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LongwaveMethod {
    type Err = RTempError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| RTempError::UnknownMethod {
                kind: "longwave",
                name: s.to_string(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }
}
