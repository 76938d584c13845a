//! Atmospheric helper functions: vapor pressure, humidity and pressure.
//!
//! Vapor pressures are returned in mmHg unless stated otherwise, which is the
//! unit the evaporation and emissivity formulas expect.

use crate::units::{
    CELSIUS_TO_KELVIN, STANDARD_PRESSURE_MB, STANDARD_TEMPERATURE_K, hpa_to_mmhg,
};

/// Magnus formula coefficient `a`.
pub const MAGNUS_A: f64 = 17.27;
/// Magnus formula coefficient `b` [°C].
pub const MAGNUS_B: f64 = 237.7;

const MAGNUS_E0_HPA: f64 = 6.1094;

/// US Standard Atmosphere temperature lapse rate [K/m].
const LAPSE_RATE: f64 = -0.0065;
/// US Standard Atmosphere barometric exponent (g·M / R·L).
const BAROMETRIC_EXPONENT: f64 = 5.2559;

/// Lowe (1977) polynomial coefficients over liquid water (°C → hPa).
const LOWE_WATER: [f64; 7] = [
    6.107799961,
    4.436518521e-1,
    1.428945805e-2,
    2.650648471e-4,
    3.031240396e-6,
    2.034080948e-8,
    6.136820929e-11,
];

/// Lowe (1977) polynomial coefficients over ice (°C → hPa).
const LOWE_ICE: [f64; 7] = [
    6.109177956,
    5.034698970e-1,
    1.886013408e-2,
    4.176223716e-4,
    5.824720280e-6,
    4.838803174e-8,
    1.838826904e-10,
];

/// Saturation vapor pressure over water [mmHg] (Magnus formula).
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    let es_hpa = MAGNUS_E0_HPA * ((MAGNUS_A * temp_c) / (temp_c + MAGNUS_B)).exp();
    hpa_to_mmhg(es_hpa)
}

/// Dewpoint [°C] from air temperature [°C] and relative humidity (fraction).
///
/// Inverts the Magnus formula. Relative humidity is clamped to [0, 1]; a
/// humidity of zero returns a dewpoint 50 °C below the air temperature.
pub fn dewpoint_from_relative_humidity(air_temp_c: f64, relative_humidity: f64) -> f64 {
    let rh = relative_humidity.clamp(0.0, 1.0);
    if rh <= 0.0 {
        return air_temp_c - 50.0;
    }
    let gamma = rh.ln() + (MAGNUS_A * air_temp_c) / (MAGNUS_B + air_temp_c);
    MAGNUS_B * gamma / (MAGNUS_A - gamma)
}

/// Relative humidity (fraction, clamped to [0, 1]) from air and dewpoint temperatures.
pub fn relative_humidity_from_dewpoint(air_temp_c: f64, dewpoint_c: f64) -> f64 {
    let es_air = saturation_vapor_pressure(air_temp_c);
    let e_actual = saturation_vapor_pressure(dewpoint_c);
    (e_actual / es_air).clamp(0.0, 1.0)
}

/// Atmospheric pressure [mb] at an altitude [m] (US Standard Atmosphere).
pub fn pressure_from_altitude(altitude_m: f64) -> f64 {
    STANDARD_PRESSURE_MB
        * (1.0 + LAPSE_RATE * altitude_m / STANDARD_TEMPERATURE_K).powf(BAROMETRIC_EXPONENT)
}

/// Saturation vapor pressure [hPa] from the Lowe polynomials.
///
/// Takes the temperature in kelvin. The ice polynomial is used when `ice` is set.
pub fn lowe_saturation_vapor_pressure(temp_k: f64, ice: bool) -> f64 {
    let t = temp_k - CELSIUS_TO_KELVIN;
    let coeffs = if ice { &LOWE_ICE } else { &LOWE_WATER };
    // Horner
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Brunt-style coefficient interpolated from Koberg's chart.
///
/// The temperature part rises linearly from 0.04 at 0 °C to 0.08 at 30 °C
/// (held constant outside that range). Clearness (1 − cloud cover) scales it by
/// `0.5 + 0.5·clearness`.
pub fn koberg_coefficient(air_temp_c: f64, clearness: f64) -> f64 {
    let t = air_temp_c.clamp(0.0, 30.0);
    let temp_factor = 0.04 + 0.04 * t / 30.0;
    let clearness_factor = 0.5 + 0.5 * clearness.clamp(0.0, 1.0);
    temp_factor * clearness_factor
}
