//! Bird & Hulstrom (1981) broadband clear-sky model.

use super::clear_sky::{ClearSkyModel, IrradianceComponents, SkyConditions};
use super::position::SolarPosition;
use crate::units::{SOLAR_CONSTANT, STANDARD_PRESSURE_MB};

/// Zenith angles at or beyond this are treated as night [deg].
const HORIZON_ZENITH: f64 = 89.0;

/// Bird-Hulstrom clear-sky model.
///
/// Splits irradiance into direct beam and three diffuse terms using
/// Rayleigh, ozone, mixed-gas, water-vapor and aerosol transmittances.
#[derive(Debug, Clone, Copy, Default)]
pub struct BirdHulstrom;

impl BirdHulstrom {
    pub fn new() -> Self {
        Self
    }

    /// Full irradiance breakdown; all zeros when the zenith is ≥ 89°.
    pub fn components(&self, sun: &SolarPosition, sky: &SkyConditions) -> IrradianceComponents {
        if sun.zenith >= HORIZON_ZENITH {
            return IrradianceComponents::default();
        }
        let atm = &sky.atmosphere;
        let e0 = SOLAR_CONSTANT / sun.earth_sun_distance.powi(2);
        let cos_z = sun.zenith.to_radians().cos();

        let m = 1.0 / cos_z;
        let ma = m * atm.pressure_mb / STANDARD_PRESSURE_MB;

        let tr = rayleigh_transmittance(ma);
        let to = ozone_transmittance(atm.ozone_cm * m);
        let tg = (-0.0127 * ma.powf(0.26)).exp();
        let tw = water_vapor_transmittance(atm.water_vapor_cm * m);
        let ta = aerosol_transmittance(atm.aod_380nm, m);

        let direct_beam = 0.9662 * e0 * tr * to * tg * tw * ta;
        let direct_horizontal = direct_beam * cos_z;

        let path = 1.0 - ma + ma.powf(1.02);
        let diffuse_rayleigh = 0.79 * e0 * cos_z * to * tg * tw * ta * (1.0 - tr) / path;
        let taa = 1.0 - (1.0 - ta) * path;
        let diffuse_aerosol =
            0.79 * e0 * cos_z * to * tg * tw * atm.forward_scatter * (1.0 - taa) / path;

        let albedo = atm.ground_albedo;
        let diffuse_multiple = (direct_horizontal + diffuse_rayleigh + diffuse_aerosol)
            * albedo
            * (1.0 - tr)
            / (1.0 - albedo * (1.0 - tr));

        IrradianceComponents::from_terms(
            direct_beam,
            direct_horizontal,
            diffuse_rayleigh,
            diffuse_aerosol,
            diffuse_multiple,
        )
    }
}

impl ClearSkyModel for BirdHulstrom {
    fn irradiance(&self, sun: &SolarPosition, sky: &SkyConditions) -> f64 {
        self.components(sun, sky).global
    }
}

fn rayleigh_transmittance(ma: f64) -> f64 {
    (-0.0903 * ma.powf(0.84) * (1.0 + ma - ma.powf(1.01))).exp()
}

/// `x` is the ozone path length (column × air mass).
fn ozone_transmittance(x: f64) -> f64 {
    1.0 - 0.1611 * x * (1.0 + 139.48 * x).powf(-0.3035)
        - 0.002715 * x / (1.0 + 0.044 * x + 0.0003 * x * x)
}

/// `w` is the water path length (precipitable water × air mass).
pub(crate) fn water_vapor_transmittance(w: f64) -> f64 {
    1.0 - 2.4959 * w / ((1.0 + 79.034 * w).powf(0.6828) + 6.385 * w)
}

fn aerosol_transmittance(aod: f64, m: f64) -> f64 {
    (-aod.powf(0.873) * (1.0 + aod - aod.powf(0.7088)) * m.powf(0.9108)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::solar::clear_sky::AtmosphericParameters;
    use approx::assert_relative_eq;

    fn sun(zenith: f64) -> SolarPosition {
        SolarPosition {
            azimuth: 180.0,
            elevation: 90.0 - zenith,
            zenith,
            earth_sun_distance: 1.0,
        }
    }

    fn sky() -> SkyConditions {
        SkyConditions {
            air_temperature: 20.0,
            dewpoint_temperature: 10.0,
            atmosphere: AtmosphericParameters::default(),
        }
    }

    #[test]
    fn test_zero_near_horizon() {
        let c = BirdHulstrom::new().components(&sun(89.0), &sky());
        assert_eq!(c, IrradianceComponents::default());
        assert_eq!(BirdHulstrom::new().irradiance(&sun(120.0), &sky()), 0.0);
    }

    #[test]
    fn test_global_is_direct_plus_diffuse() {
        let model = BirdHulstrom::new();
        for z in [0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 85.0, 88.9] {
            let c = model.components(&sun(z), &sky());
            assert_relative_eq!(c.global, c.direct_horizontal + c.diffuse, epsilon = 1e-9);
            assert!(c.global >= 0.0 && c.global.is_finite(), "zenith {z}: {}", c.global);
        }
    }

    #[test]
    fn test_overhead_sun_magnitude() {
        let c = BirdHulstrom::new().components(&sun(0.0), &sky());
        assert!(c.global > 900.0 && c.global < 1150.0, "got {}", c.global);
        assert!(c.direct_horizontal > c.diffuse);
    }

    #[test]
    fn test_transmittances_in_unit_interval() {
        for x in [0.0, 0.1, 1.0, 5.0] {
            let t = ozone_transmittance(x);
            assert!((0.0..=1.0).contains(&t), "ozone {x}: {t}");
            let t = water_vapor_transmittance(x);
            assert!((0.0..=1.0).contains(&t), "water {x}: {t}");
        }
        let t = rayleigh_transmittance(1.0);
        assert!(t > 0.8 && t < 1.0, "got {t}");
    }

    #[test]
    fn test_more_aerosol_less_direct() {
        let model = BirdHulstrom::new();
        let clean = model.components(&sun(30.0), &sky());
        let mut hazy_sky = sky();
        hazy_sky.atmosphere.aod_380nm = 0.6;
        let hazy = model.components(&sun(30.0), &hazy_sky);
        assert!(hazy.direct_beam < clean.direct_beam);
    }
}
