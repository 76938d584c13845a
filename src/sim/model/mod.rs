pub mod config;
pub mod recorder;
pub mod result;
pub mod scenario;
pub mod simulation;
pub mod state;
pub mod weather;

pub use config::{Configuration, DuplicateTimestepPolicy};
pub use result::{DiagnosticRecord, ResultRecord, RunSummary, SimulationOutput};
pub use scenario::{Scenario, run_scenarios};
pub use simulation::HeatBudgetModel;
pub use state::SimulationState;
pub use weather::{AtmosphericOverrides, MeteorologicalRecord};
