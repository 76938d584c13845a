//! Clear-sky solar irradiance models.
//!
//! Every model maps the sun's position plus the atmospheric state of one
//! timestep to global horizontal irradiance [W/m²] under a cloudless sky.
//! Cloud, shade and albedo are applied afterwards by
//! [`corrections`](super::corrections).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::position::SolarPosition;
use crate::error::RTempError;
use crate::sim::atmosphere::pressure_from_altitude;
use crate::units::SOLAR_CONSTANT;

/// Atmospheric state consumed by the component models (Bird, Iqbal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericParameters {
    /// Station pressure [mb].
    pub pressure_mb: f64,
    /// Ozone column [cm-atm].
    pub ozone_cm: f64,
    /// Precipitable water [cm].
    pub water_vapor_cm: f64,
    /// Aerosol optical depth at 500 nm.
    pub aod_500nm: f64,
    /// Aerosol optical depth at 380 nm.
    pub aod_380nm: f64,
    /// Fraction of aerosol scattering directed forward.
    pub forward_scatter: f64,
    pub ground_albedo: f64,
    /// Horizontal visibility [km].
    pub visibility_km: f64,
}

impl AtmosphericParameters {
    /// Defaults for a site at `elevation_m`; pressure follows the standard atmosphere.
    pub fn for_elevation(elevation_m: f64) -> Self {
        Self {
            pressure_mb: pressure_from_altitude(elevation_m),
            ..Self::default()
        }
    }
}

impl Default for AtmosphericParameters {
    fn default() -> Self {
        Self {
            pressure_mb: pressure_from_altitude(0.0),
            ozone_cm: 0.35,
            water_vapor_cm: 1.5,
            aod_500nm: 0.1,
            aod_380nm: 0.15,
            forward_scatter: 0.84,
            ground_albedo: 0.2,
            visibility_km: 23.0,
        }
    }
}

/// Near-surface conditions for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct SkyConditions {
    /// °C
    pub air_temperature: f64,
    /// °C
    pub dewpoint_temperature: f64,
    pub atmosphere: AtmosphericParameters,
}

/// Trait for clear-sky solar irradiance models.
pub trait ClearSkyModel: Send + Sync {
    /// Returns global horizontal irradiance [W/m²] under a clear sky.
    fn irradiance(&self, sun: &SolarPosition, sky: &SkyConditions) -> f64;
}

/// Breakdown of clear-sky irradiance on a horizontal surface [W/m²].
///
/// `global` is always `direct_horizontal + diffuse`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IrradianceComponents {
    pub direct_beam: f64,
    pub direct_horizontal: f64,
    pub diffuse_rayleigh: f64,
    pub diffuse_aerosol: f64,
    pub diffuse_multiple: f64,
    pub diffuse: f64,
    pub global: f64,
}

impl IrradianceComponents {
    /// Builds the breakdown from the raw terms, flooring each at zero before summing.
    pub(crate) fn from_terms(
        direct_beam: f64,
        direct_horizontal: f64,
        diffuse_rayleigh: f64,
        diffuse_aerosol: f64,
        diffuse_multiple: f64,
    ) -> Self {
        let direct_horizontal = direct_horizontal.max(0.0);
        let diffuse_rayleigh = diffuse_rayleigh.max(0.0);
        let diffuse_aerosol = diffuse_aerosol.max(0.0);
        let diffuse_multiple = diffuse_multiple.max(0.0);
        let diffuse = diffuse_rayleigh + diffuse_aerosol + diffuse_multiple;
        Self {
            direct_beam: direct_beam.max(0.0),
            direct_horizontal,
            diffuse_rayleigh,
            diffuse_aerosol,
            diffuse_multiple,
            diffuse,
            global: direct_horizontal + diffuse,
        }
    }
}

/// Kasten-Young relative air mass from an elevation angle [deg].
pub(crate) fn kasten_young_air_mass(elevation_deg: f64) -> f64 {
    1.0 / (elevation_deg.to_radians().sin() + 0.15 * (elevation_deg + 3.885).powf(-1.253))
}

/// Extraterrestrial irradiance on a horizontal surface [W/m²].
fn extraterrestrial_horizontal(sun: &SolarPosition) -> f64 {
    SOLAR_CONSTANT / sun.earth_sun_distance.powi(2) * sun.elevation.to_radians().sin()
}

/// Bras (1990) clear-sky model driven by a Linke-type turbidity factor.
pub struct Bras {
    /// Typically 2 (clear) to 5 (smoggy).
    pub turbidity: f64,
}

impl Bras {
    pub fn new(turbidity: f64) -> Self {
        Self { turbidity }
    }
}

impl ClearSkyModel for Bras {
    fn irradiance(&self, sun: &SolarPosition, _sky: &SkyConditions) -> f64 {
        if sun.elevation <= 0.0 {
            return 0.0;
        }
        let i0 = extraterrestrial_horizontal(sun);
        let air_mass = kasten_young_air_mass(sun.elevation);
        let scattering = 0.128 - 0.054 * air_mass.log10();
        (i0 * (-self.turbidity * scattering * air_mass).exp()).max(0.0)
    }
}

/// Ryan & Stolzenbach (1972) model with an elevation-corrected air mass.
pub struct RyanStolzenbach {
    /// Atmospheric transmission coefficient (0.70-0.91).
    pub transmission: f64,
    /// Site elevation [m].
    pub site_elevation: f64,
}

impl RyanStolzenbach {
    pub fn new(transmission: f64, site_elevation: f64) -> Self {
        Self {
            transmission,
            site_elevation,
        }
    }
}

impl ClearSkyModel for RyanStolzenbach {
    fn irradiance(&self, sun: &SolarPosition, _sky: &SkyConditions) -> f64 {
        if sun.elevation <= 0.0 {
            return 0.0;
        }
        let i0 = extraterrestrial_horizontal(sun);
        let pressure_ratio = ((288.0 - 0.0065 * self.site_elevation) / 288.0).powf(5.256);
        let air_mass = pressure_ratio * kasten_young_air_mass(sun.elevation);
        (i0 * self.transmission.powf(air_mass)).max(0.0)
    }
}

/// Clear-sky solar radiation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolarMethod {
    #[default]
    Bras,
    Bird,
    RyanStolzenbach,
    Iqbal,
}

impl SolarMethod {
    pub const ALL: [SolarMethod; 4] = [Self::Bras, Self::Bird, Self::RyanStolzenbach, Self::Iqbal];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bras => "Bras",
            Self::Bird => "Bird",
            Self::RyanStolzenbach => "Ryan-Stolzenbach",
            Self::Iqbal => "Iqbal",
        }
    }
}

impl fmt::Display for SolarMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolarMethod {
    type Err = RTempError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s.trim())
            .ok_or_else(|| RTempError::UnknownMethod {
                kind: "solar",
                name: s.to_string(),
                valid: Self::ALL.map(Self::name).join(", "),
            })
    }
}
