//! Heat-budget water temperature model for streams, ponds and wetlands.
//!
//! A [`HeatBudgetModel`] is built from a [`Configuration`] and run once per
//! sequence of [`MeteorologicalRecord`]s. Each record advances the water and
//! sediment temperatures by an explicit Euler step driven by solar,
//! longwave, evaporative, convective, sediment and groundwater fluxes.

pub mod error;
pub mod io;
pub mod sim;
pub mod units;

// Prelude
pub use error::{RTempError, Result};
pub use sim::model::{
    Configuration, HeatBudgetModel, MeteorologicalRecord, ResultRecord, SimulationOutput,
};
pub use sim::solar::{SiteLocation, SolarPosition, SunTimes};
