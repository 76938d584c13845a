//! Heat flux components of the water-surface and bed heat budget.
//!
//! All fluxes are in cal/(cm²·day). Positive means the water gains heat.
//! Each flux is proportional to its driving gradient.

use crate::units::{
    BOWEN_RATIO, JOULES_PER_CAL, SECONDS_PER_DAY, WATER_DENSITY, WATER_SPECIFIC_HEAT,
    meters_to_centimeters, w_m_c_to_cal_s_cm_c, watts_m2_to_cal_cm2_day,
};

use super::longwave::back_radiation;

/// Heat carried by exchanged water per unit rate, depth and temperature difference.
///
/// `ρ [g/cm³] · Cp [J/(kg·°C)] / (J/cal)`.
fn exchange_heat_factor() -> f64 {
    (WATER_DENSITY / 1000.0) * (WATER_SPECIFIC_HEAT / JOULES_PER_CAL)
}

/// Evaporative heat flux: `−f(W)·(e_water − e_air)`.
///
/// - `wind_function`: transfer coefficient [cal/(cm²·day·mmHg)]
/// - `vapor_pressure_water`, `vapor_pressure_air`: [mmHg]
pub fn evaporation(wind_function: f64, vapor_pressure_water: f64, vapor_pressure_air: f64) -> f64 {
    -wind_function * (vapor_pressure_water - vapor_pressure_air)
}

/// Sensible heat flux: `−Bowen·f(W)·(T_water − T_air)`.
pub fn convection(wind_function: f64, water_temp: f64, air_temp: f64) -> f64 {
    -BOWEN_RATIO * wind_function * (water_temp - air_temp)
}

/// Longwave emitted by the water surface, signed as a loss.
pub fn longwave_back(water_temp: f64) -> f64 {
    -watts_m2_to_cal_cm2_day(back_radiation(water_temp))
}

/// Conduction between bed sediment and water.
///
/// # Arguments
/// - `thermal_conductivity`: [W/(m·°C)]
/// - `sediment_thickness`: [cm]
///
/// Positive when the sediment is warmer than the water.
pub fn sediment_conduction(
    water_temp: f64,
    sediment_temp: f64,
    thermal_conductivity: f64,
    sediment_thickness: f64,
) -> f64 {
    let k = w_m_c_to_cal_s_cm_c(thermal_conductivity);
    k * (sediment_temp - water_temp) / sediment_thickness * SECONDS_PER_DAY
}

/// Heat exchanged with water flowing through the bed sediment.
///
/// `exchange_rate` is in cm/day and `water_depth` in metres.
pub fn hyporheic_exchange(
    water_temp: f64,
    sediment_temp: f64,
    exchange_rate: f64,
    water_depth: f64,
) -> f64 {
    exchange_heat_factor() * exchange_rate * (sediment_temp - water_temp)
        / meters_to_centimeters(water_depth)
}

/// Heat carried in by groundwater inflow.
///
/// `inflow_rate` is in cm/day and `water_depth` in metres.
pub fn groundwater(
    water_temp: f64,
    groundwater_temp: f64,
    inflow_rate: f64,
    water_depth: f64,
) -> f64 {
    exchange_heat_factor() * inflow_rate * (groundwater_temp - water_temp)
        / meters_to_centimeters(water_depth)
}
