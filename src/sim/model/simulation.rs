//! Explicit-Euler heat budget of a well-mixed water column over a sediment layer.

use log::{debug, info, warn};

use crate::error::{RTempError, Result};
use crate::sim::atmosphere::saturation_vapor_pressure;
use crate::sim::heat_flux;
use crate::sim::longwave::{EmissivityModel, LongwaveRadiation};
use crate::sim::solar::{
    ClearSkyModel, SiteLocation, SkyConditions, SolarCorrections, SolarPosition, clear_sky_model,
};
use crate::sim::wind::{WindConditions, WindFunction, adjust_for_height, apply_shelter_factor};
use crate::units::{
    cal_cm2_day_to_watts_m2, meters_to_centimeters, water_heat_capacity_cal_cm3_c,
    watts_m2_to_cal_cm2_day,
};

use super::config::{Configuration, DuplicateTimestepPolicy};
use super::recorder::Recorder;
use super::result::{DiagnosticRecord, ResultRecord, SimulationOutput};
use super::state::SimulationState;
use super::weather::MeteorologicalRecord;

/// Reference heights of the wind functions [m].
const WIND_HEIGHT_LOW: f64 = 2.0;
const WIND_HEIGHT_HIGH: f64 = 7.0;

/// Water temperature model driven by a sequence of meteorological records.
///
/// Method names in the configuration are resolved once here; the resolved
/// strategies are immutable, so one model can run any number of times and
/// from several threads.
pub struct HeatBudgetModel {
    config: Configuration,
    site: SiteLocation,
    solar: Box<dyn ClearSkyModel>,
    emissivity: Box<dyn EmissivityModel>,
    wind_function: Box<dyn WindFunction>,
    corrections: SolarCorrections,
    longwave: LongwaveRadiation,
}

impl std::fmt::Debug for HeatBudgetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeatBudgetModel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HeatBudgetModel {
    /// Validates the configuration and resolves its methods.
    pub fn new(config: &Configuration) -> Result<Self> {
        let config = config.validated()?;
        let solar_method = config.solar_method()?;
        let longwave_method = config.longwave_method()?;
        let wind_method = config.wind_function_method()?;
        let cloud_method = config.longwave_cloud_method()?;

        debug!("Methods: solar {solar_method}, longwave {longwave_method} ({cloud_method})");
        debug!("Wind function: {wind_method}");

        Ok(Self {
            site: config.site(),
            solar: clear_sky_model(
                solar_method,
                config.atmospheric_turbidity,
                config.atmospheric_transmission_coeff,
                config.elevation,
            ),
            emissivity: longwave_method.build(config.brutsaert_coefficient),
            wind_function: wind_method.build(),
            corrections: SolarCorrections::new(config.solar_cloud_kcl1, config.solar_cloud_kcl2),
            longwave: LongwaveRadiation::new(
                cloud_method,
                config.longwave_cloud_kcl3,
                config.longwave_cloud_kcl4,
            ),
            config,
        })
    }

    /// The validated configuration in use.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Runs the model over records ordered by time.
    ///
    /// Returns one row per record, except duplicates under
    /// [`DuplicateTimestepPolicy::Skip`]. Any error aborts the run and no
    /// partial output is returned.
    pub fn run(&self, records: &[MeteorologicalRecord]) -> Result<SimulationOutput> {
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            info!("No meteorological records, nothing to simulate");
            return Ok(SimulationOutput::default());
        };
        info!(
            "Running heat budget for {} records from {} to {}",
            records.len(),
            first.datetime,
            last.datetime
        );

        let cfg = &self.config;
        let mut state = SimulationState::initial(cfg);
        let mut recorder = Recorder::new(records.len(), cfg.enable_diagnostics);

        for (index, raw) in records.iter().enumerate() {
            let met = raw.validated(index)?;
            let hours = state.hours_until(met.datetime);

            let mut prev = state;
            if let Some(previous) = state.datetime {
                if hours < 0.0 {
                    return Err(RTempError::NonMonotonicTime {
                        index,
                        previous,
                        current: met.datetime,
                    });
                }
                if hours == 0.0 {
                    match cfg.duplicate_timestep_policy {
                        DuplicateTimestepPolicy::EmitUnchanged => {
                            warn!("Duplicate timestamp {}, state carried forward", met.datetime);
                            recorder.repeat_last(
                                met.datetime,
                                met.air_temperature,
                                met.dewpoint_temperature,
                            );
                        }
                        DuplicateTimestepPolicy::Skip => {
                            warn!("Duplicate timestamp {}, record skipped", met.datetime);
                        }
                    }
                    continue;
                }
                if hours > cfg.large_timestep_reset_hours {
                    let reset = 0.5 * (met.air_temperature + met.dewpoint_temperature);
                    warn!(
                        "Gap of {hours:.2} h before {}, temperatures reset to {reset:.2} °C",
                        met.datetime
                    );
                    prev.water_temperature = reset;
                    prev.sediment_temperature = reset;
                } else if hours > cfg.large_timestep_warning_hours {
                    warn!("Large timestep of {hours:.2} h before {}", met.datetime);
                }
            }

            let (next, row) = self.step(&prev, &met, hours / 24.0)?;

            let change = (next.water_temperature - prev.water_temperature).abs();
            let diverged =
                !next.water_temperature.is_finite() || !next.sediment_temperature.is_finite();
            if diverged || (!state.is_first_step() && !(change <= cfg.stability_criteria)) {
                return Err(RTempError::NumericalInstability {
                    timestamp: met.datetime,
                    change,
                    threshold: cfg.stability_criteria,
                });
            }

            recorder.push(row);
            state = next;
        }

        let output = recorder.finalize();
        if let Some(s) = output.summary() {
            info!(
                "Finished {} steps, water temperature {:.2} to {:.2} °C",
                s.records, s.min_water_temperature, s.max_water_temperature
            );
        }
        Ok(output)
    }

    /// Advances the state by `dt_days` using fluxes evaluated at `prev`.
    fn step(
        &self,
        prev: &SimulationState,
        met: &MeteorologicalRecord,
        dt_days: f64,
    ) -> Result<(SimulationState, ResultRecord)> {
        let cfg = &self.config;
        let depth = met.water_depth_override.unwrap_or(cfg.water_depth);
        let shade = met.effective_shade_override.unwrap_or(cfg.effective_shade);
        let air = met.air_temperature;
        let dew = met.dewpoint_temperature;
        let cloud = met.cloud_cover;

        // Shortwave [W/m²]
        let sun = SolarPosition::calculate(&self.site, met.datetime);
        let solar = if sun.is_above_horizon() {
            let incoming = match met.solar_radiation {
                Some(measured) => measured,
                None => {
                    let sky = SkyConditions {
                        air_temperature: air,
                        dewpoint_temperature: dew,
                        atmosphere: met.atmosphere.resolve(cfg.elevation),
                    };
                    self.solar.irradiance(&sun, &sky)
                }
            };
            self.corrections.apply(incoming, cloud, shade, sun.elevation)
        } else {
            0.0
        };

        // Longwave [W/m²]
        let vp_air = saturation_vapor_pressure(dew);
        let vp_water = saturation_vapor_pressure(prev.water_temperature);
        let emissivity = self.emissivity.emissivity(air, vp_air, cloud);
        let longwave_atm = self.longwave.atmospheric(emissivity, air, cloud);

        // Wind
        let wind_2m = apply_shelter_factor(
            adjust_for_height(met.wind_speed, cfg.wind_height, WIND_HEIGHT_LOW)?,
            cfg.wind_shelter_factor,
        )?;
        let wind_7m = apply_shelter_factor(
            adjust_for_height(met.wind_speed, cfg.wind_height, WIND_HEIGHT_HIGH)?,
            cfg.wind_shelter_factor,
        )?;
        let wind_speed = if self.wind_function.reference_height() >= WIND_HEIGHT_HIGH {
            wind_7m
        } else {
            wind_2m
        };
        let wind_function = self.wind_function.coefficient(&WindConditions {
            wind_speed,
            air_temp: air,
            water_temp: prev.water_temperature,
            vapor_pressure_air: vp_air,
            vapor_pressure_water: vp_water,
        });

        // Fluxes [cal/(cm²·day)]
        let t_w = prev.water_temperature;
        let t_s = prev.sediment_temperature;
        let evaporation = heat_flux::evaporation(wind_function, vp_water, vp_air);
        let convection = heat_flux::convection(wind_function, t_w, air);
        let longwave_back = heat_flux::longwave_back(t_w);
        let sediment = heat_flux::sediment_conduction(
            t_w,
            t_s,
            cfg.sediment_thermal_conductivity,
            cfg.sediment_thickness,
        );
        let hyporheic = heat_flux::hyporheic_exchange(t_w, t_s, cfg.hyporheic_exchange_rate, depth);
        let groundwater = heat_flux::groundwater(
            t_w,
            cfg.groundwater_temperature,
            cfg.groundwater_inflow,
            depth,
        );

        let net = watts_m2_to_cal_cm2_day(solar)
            + watts_m2_to_cal_cm2_day(longwave_atm)
            + longwave_back
            + evaporation
            + convection
            + sediment
            + hyporheic
            + groundwater;

        // °C/day
        let rho_cp = water_heat_capacity_cal_cm3_c();
        let water_rate = net / (rho_cp * meters_to_centimeters(depth));
        let sediment_rate = -sediment / (rho_cp * cfg.sediment_thickness);

        let water_temperature = floor(t_w + water_rate * dt_days, cfg.minimum_temperature);
        let sediment_temperature = floor(t_s + sediment_rate * dt_days, cfg.minimum_temperature);

        let next = SimulationState {
            datetime: Some(met.datetime),
            water_temperature,
            sediment_temperature,
            water_depth: depth,
            effective_shade: shade,
        };

        let row = ResultRecord {
            datetime: met.datetime,
            solar_azimuth: sun.azimuth,
            solar_elevation: sun.elevation,
            solar_radiation: solar,
            longwave_atmospheric: longwave_atm,
            longwave_back: cal_cm2_day_to_watts_m2(longwave_back),
            evaporation: cal_cm2_day_to_watts_m2(evaporation),
            convection: cal_cm2_day_to_watts_m2(convection),
            sediment_conduction: cal_cm2_day_to_watts_m2(sediment),
            hyporheic_exchange: cal_cm2_day_to_watts_m2(hyporheic),
            groundwater: cal_cm2_day_to_watts_m2(groundwater),
            net_flux: cal_cm2_day_to_watts_m2(net),
            water_temperature,
            sediment_temperature,
            air_temperature: air,
            dewpoint_temperature: dew,
            diagnostics: Some(DiagnosticRecord {
                vapor_pressure_water: vp_water,
                vapor_pressure_air: vp_air,
                atmospheric_emissivity: emissivity,
                wind_speed_2m: wind_2m,
                wind_speed_7m: wind_7m,
                wind_function,
                water_temp_change_rate: water_rate,
                sediment_temp_change_rate: sediment_rate,
            }),
        };

        Ok((next, row))
    }
}

/// Lower bound that lets NaN through so the stability check can see it.
fn floor(temperature: f64, minimum: f64) -> f64 {
    if temperature < minimum { minimum } else { temperature }
}
