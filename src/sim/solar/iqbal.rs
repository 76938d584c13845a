//! Iqbal (1983) model C clear-sky irradiance.
//!
//! Precipitable water comes from air temperature and humidity rather than a
//! measured column, and aerosol attenuation from horizontal visibility.

use super::bird::water_vapor_transmittance;
use super::clear_sky::{ClearSkyModel, IrradianceComponents, SkyConditions};
use super::position::SolarPosition;
use crate::sim::atmosphere::{lowe_saturation_vapor_pressure, relative_humidity_from_dewpoint};
use crate::units::{SOLAR_CONSTANT, STANDARD_PRESSURE_MB, celsius_to_kelvin};

const HORIZON_ZENITH: f64 = 89.0;
/// Aerosol single-scattering albedo.
const SINGLE_SCATTERING_ALBEDO: f64 = 0.9;
/// Ratio of forward-scattered to total aerosol scattering.
const FORWARD_SCATTER_RATIO: f64 = 0.84;
/// Direct-beam increase per metre of site elevation.
const ALTITUDE_CORRECTION_PER_M: f64 = 2.2e-5;
/// Elevation above which the correction stops growing [m].
const MAX_ALTITUDE_CORRECTION_M: f64 = 3000.0;

/// Iqbal clear-sky model for a site at a given elevation.
#[derive(Debug, Clone, Copy)]
pub struct Iqbal {
    /// Site elevation [m].
    pub site_elevation: f64,
}

impl Iqbal {
    pub fn new(site_elevation: f64) -> Self {
        Self { site_elevation }
    }

    /// Full irradiance breakdown; all zeros when the zenith is ≥ 89°.
    pub fn components(&self, sun: &SolarPosition, sky: &SkyConditions) -> IrradianceComponents {
        if sun.zenith >= HORIZON_ZENITH {
            return IrradianceComponents::default();
        }
        let atm = &sky.atmosphere;
        let cos_z = sun.zenith.to_radians().cos();

        let mr = 1.0 / (cos_z + 0.15 * (93.885 - sun.zenith).powf(-1.253));
        let ma = mr * atm.pressure_mb / STANDARD_PRESSURE_MB;

        let temp_k = celsius_to_kelvin(sky.air_temperature);
        let rh = relative_humidity_from_dewpoint(sky.air_temperature, sky.dewpoint_temperature);
        let saturation_hpa = lowe_saturation_vapor_pressure(temp_k, sky.air_temperature < 0.0);
        let precipitable_water = 46.5 * rh * saturation_hpa / temp_k;

        let rho2 = sun.earth_sun_distance.powi(-2);
        let tau_r = (-0.0903 * ma.powf(0.84) * (1.0 + ma - ma.powf(1.01))).exp();
        let tau_o = ozone_transmittance(atm.ozone_cm * mr);
        let tau_g = (-0.0127 * ma.powf(0.26)).exp();
        let tau_w = water_vapor_transmittance(precipitable_water * mr);
        let tau_a = visibility_transmittance(atm.visibility_km, ma);
        let b_z = ALTITUDE_CORRECTION_PER_M * self.site_elevation.min(MAX_ALTITUDE_CORRECTION_M);

        let tau_total = tau_r * tau_o * tau_g * tau_w * tau_a + b_z;
        let direct_beam = 0.9751 * rho2 * SOLAR_CONSTANT * tau_total;
        let direct_horizontal = direct_beam * cos_z;

        let tau_aa =
            1.0 - (1.0 - SINGLE_SCATTERING_ALBEDO) * (1.0 - ma + ma.powf(1.06)) * (1.0 - tau_a);
        let tau_as = tau_a / tau_aa;
        let path = 1.0 - ma + ma.powf(1.02);
        let common = 0.79 * rho2 * SOLAR_CONSTANT * cos_z * tau_o * tau_g * tau_w * tau_aa / path;

        let diffuse_rayleigh = common * 0.5 * (1.0 - tau_r);
        let diffuse_aerosol = common * FORWARD_SCATTER_RATIO * (1.0 - tau_as);

        let albedo = atm.ground_albedo;
        let alpha_atm = 0.0685 + (1.0 - FORWARD_SCATTER_RATIO) * (1.0 - tau_as);
        let diffuse_multiple = (direct_horizontal + diffuse_rayleigh + diffuse_aerosol) * albedo
            * alpha_atm
            / (1.0 - albedo * alpha_atm);

        IrradianceComponents::from_terms(
            direct_beam,
            direct_horizontal,
            diffuse_rayleigh,
            diffuse_aerosol,
            diffuse_multiple,
        )
    }
}

impl ClearSkyModel for Iqbal {
    fn irradiance(&self, sun: &SolarPosition, sky: &SkyConditions) -> f64 {
        self.components(sun, sky).global
    }
}

fn ozone_transmittance(x: f64) -> f64 {
    1.0 - (0.1611 * x * (1.0 + 139.48 * x).powf(-0.3035)
        - 0.002715 * x / (1.0 + 0.044 * x + 0.0003 * x * x))
}

/// Mächler visibility parameterization, clamped to [0, 1].
fn visibility_transmittance(visibility_km: f64, ma: f64) -> f64 {
    let base = 0.97 - 1.265 * visibility_km.powf(-0.66);
    let tau = if base <= 0.0 {
        0.01
    } else {
        base.powf(ma.powf(0.9))
    };
    tau.clamp(0.0, 1.0)
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

    fn sky(air: f64, dew: f64) -> SkyConditions {
        SkyConditions {
            air_temperature: air,
            dewpoint_temperature: dew,
            atmosphere: AtmosphericParameters::default(),
        }
    }

    #[test]
    fn test_zero_near_horizon() {
        let c = Iqbal::new(0.0).components(&sun(89.5), &sky(20.0, 10.0));
        assert_eq!(c.global, 0.0);
        assert_eq!(c.direct_beam, 0.0);
    }

    #[test]
    fn test_global_is_direct_plus_diffuse() {
        let model = Iqbal::new(250.0);
        for z in [0.0, 20.0, 40.0, 60.0, 80.0, 88.0] {
            for (air, dew) in [(25.0, 15.0), (-5.0, -12.0), (35.0, 30.0)] {
                let c = model.components(&sun(z), &sky(air, dew));
                assert_relative_eq!(c.global, c.direct_horizontal + c.diffuse, epsilon = 1e-9);
                assert!(c.global.is_finite(), "zenith {z} air {air}");
            }
        }
    }

    #[test]
    fn test_overhead_magnitude() {
        let g = Iqbal::new(0.0).irradiance(&sun(10.0), &sky(20.0, 10.0));
        assert!(g > 700.0 && g < 1150.0, "got {g}");
    }

    #[test]
    fn test_altitude_correction_capped() {
        let s = sun(30.0);
        let k = sky(15.0, 5.0);
        let low = Iqbal::new(0.0).components(&s, &k).direct_beam;
        let mid = Iqbal::new(3000.0).components(&s, &k).direct_beam;
        let high = Iqbal::new(4500.0).components(&s, &k).direct_beam;
        assert!(mid > low);
        assert_relative_eq!(mid, high, epsilon = 1e-9);
    }

    #[test]
    fn test_poor_visibility_floor() {
        assert_relative_eq!(visibility_transmittance(1.0, 1.0), 0.01);
        let clear = visibility_transmittance(50.0, 1.0);
        assert!(clear > 0.8 && clear <= 1.0, "got {clear}");
    }

    #[test]
    fn test_humid_air_absorbs_more() {
        let model = Iqbal::new(0.0);
        let dry = model.components(&sun(30.0), &sky(25.0, 0.0)).direct_beam;
        let wet = model.components(&sun(30.0), &sky(25.0, 24.0)).direct_beam;
        assert!(wet < dry, "wet {wet} dry {dry}");
    }
}
