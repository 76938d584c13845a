//! Physical constants and unit conversions.
//!
//! The heat budget works internally in cal/(cm²·day), centimetres and mmHg,
//! while inputs and outputs use W/m², metres and m/s. Every conversion here
//! has an exact inverse.

/// Stefan-Boltzmann constant [W/(m²·K⁴)].
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;
/// Solar constant [W/m²].
pub const SOLAR_CONSTANT: f64 = 1367.0;
/// Density of water [kg/m³].
pub const WATER_DENSITY: f64 = 1000.0;
/// Specific heat of water [J/(kg·°C)].
pub const WATER_SPECIFIC_HEAT: f64 = 4186.0;
/// Emissivity of a water surface.
pub const WATER_EMISSIVITY: f64 = 0.97;
/// Fraction of incoming atmospheric longwave reflected by the water surface.
pub const ATMOSPHERIC_REFLECTION: f64 = 0.03;
/// Bowen ratio coefficient [mmHg/°C].
pub const BOWEN_RATIO: f64 = 0.47;
/// Standard sea-level pressure [mb].
pub const STANDARD_PRESSURE_MB: f64 = 1013.25;
/// Standard sea-level pressure [mmHg].
pub const STANDARD_PRESSURE_MMHG: f64 = 760.0;
/// Standard sea-level temperature [K].
pub const STANDARD_TEMPERATURE_K: f64 = 288.15;
/// 0 °C in kelvin.
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const MINUTES_PER_DAY: f64 = 1440.0;
pub const HOURS_PER_DAY: f64 = 24.0;

/// Joules per thermochemical-ish calorie used by the flux conversion.
const JOULES_PER_CAL_FLUX: f64 = 4.183076;
/// Joules per calorie used for the specific heat of water.
pub const JOULES_PER_CAL: f64 = 4.184;

const W_M2_TO_CAL_CM2_DAY: f64 = SECONDS_PER_DAY / (JOULES_PER_CAL_FLUX * 10_000.0);
const W_M_C_TO_CAL_S_CM_C: f64 = 1.0 / (JOULES_PER_CAL_FLUX * 100.0);
const M_S_TO_MPH: f64 = 3600.0 / 1609.344;
const HPA_TO_MMHG: f64 = 0.750062;
const MMHG_TO_MB: f64 = 1.33322;

pub fn watts_m2_to_cal_cm2_day(watts_m2: f64) -> f64 {
    watts_m2 * W_M2_TO_CAL_CM2_DAY
}

pub fn cal_cm2_day_to_watts_m2(cal_cm2_day: f64) -> f64 {
    cal_cm2_day / W_M2_TO_CAL_CM2_DAY
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + CELSIUS_TO_KELVIN
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - CELSIUS_TO_KELVIN
}

pub fn meters_to_centimeters(meters: f64) -> f64 {
    meters * 100.0
}

pub fn centimeters_to_meters(centimeters: f64) -> f64 {
    centimeters / 100.0
}

pub fn m_s_to_mph(m_s: f64) -> f64 {
    m_s * M_S_TO_MPH
}

pub fn mph_to_m_s(mph: f64) -> f64 {
    mph / M_S_TO_MPH
}

/// Thermal conductivity W/(m·°C) → cal/(s·cm·°C).
pub fn w_m_c_to_cal_s_cm_c(w_m_c: f64) -> f64 {
    w_m_c * W_M_C_TO_CAL_S_CM_C
}

/// Thermal conductivity cal/(s·cm·°C) → W/(m·°C).
pub fn cal_s_cm_c_to_w_m_c(cal_s_cm_c: f64) -> f64 {
    cal_s_cm_c / W_M_C_TO_CAL_S_CM_C
}

pub fn hpa_to_mmhg(hpa: f64) -> f64 {
    hpa * HPA_TO_MMHG
}

pub fn mmhg_to_hpa(mmhg: f64) -> f64 {
    mmhg / HPA_TO_MMHG
}

/// Vapor pressure mmHg → mb, using the factor the emissivity formulas were fitted with.
pub fn mmhg_to_mb(mmhg: f64) -> f64 {
    mmhg * MMHG_TO_MB
}

pub fn mb_to_mmhg(mb: f64) -> f64 {
    mb / MMHG_TO_MB
}

/// Volumetric heat capacity of water [cal/(cm³·°C)].
pub fn water_heat_capacity_cal_cm3_c() -> f64 {
    let rho_g_cm3 = WATER_DENSITY / 1000.0;
    let cp_cal_g_c = WATER_SPECIFIC_HEAT / (JOULES_PER_CAL * 1000.0);
    rho_g_cm3 * cp_cal_g_c
}
