//! File I/O for configurations, meteorological input and results.

pub mod config_json;
pub mod met_csv;
pub mod results_csv;

pub use config_json::{read_config, write_config};
pub use met_csv::{parse_met_csv, read_met_csv};
pub use results_csv::{write_results, write_results_csv};
