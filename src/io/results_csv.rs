//! Result table export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::sim::model::SimulationOutput;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const RESULT_COLUMNS: [&str; 16] = [
    "datetime",
    "solar_azimuth",
    "solar_elevation",
    "solar_radiation",
    "longwave_atmospheric",
    "longwave_back",
    "evaporation",
    "convection",
    "sediment_conduction",
    "hyporheic_exchange",
    "groundwater",
    "net_flux",
    "water_temperature",
    "sediment_temperature",
    "air_temperature",
    "dewpoint_temperature",
];

pub const DIAGNOSTIC_COLUMNS: [&str; 8] = [
    "vapor_pressure_water",
    "vapor_pressure_air",
    "atmospheric_emissivity",
    "wind_speed_2m",
    "wind_speed_7m",
    "wind_function",
    "water_temp_change_rate",
    "sediment_temp_change_rate",
];

/// Writes the result table to a CSV file.
pub fn write_results_csv(path: &Path, output: &SimulationOutput) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    write_results(file, output)
        .with_context(|| format!("Failed to write results to: {}", path.display()))
}

/// Writes the result table as CSV.
///
/// Diagnostic columns are appended when any record carries diagnostics;
/// rows without them leave those cells blank.
pub fn write_results<W: Write>(writer: W, output: &SimulationOutput) -> Result<()> {
    let with_diagnostics = output.has_diagnostics();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = RESULT_COLUMNS.to_vec();
    if with_diagnostics {
        header.extend(DIAGNOSTIC_COLUMNS);
    }
    wtr.write_record(&header)?;

    for r in &output.records {
        let mut row = vec![r.datetime.format(DATETIME_FORMAT).to_string()];
        row.extend(
            [
                r.solar_azimuth,
                r.solar_elevation,
                r.solar_radiation,
                r.longwave_atmospheric,
                r.longwave_back,
                r.evaporation,
                r.convection,
                r.sediment_conduction,
                r.hyporheic_exchange,
                r.groundwater,
                r.net_flux,
                r.water_temperature,
                r.sediment_temperature,
                r.air_temperature,
                r.dewpoint_temperature,
            ]
            .iter()
            .map(f64::to_string),
        );
        if with_diagnostics {
            match &r.diagnostics {
                Some(d) => row.extend(
                    [
                        d.vapor_pressure_water,
                        d.vapor_pressure_air,
                        d.atmospheric_emissivity,
                        d.wind_speed_2m,
                        d.wind_speed_7m,
                        d.wind_function,
                        d.water_temp_change_rate,
                        d.sediment_temp_change_rate,
                    ]
                    .iter()
                    .map(f64::to_string),
                ),
                None => row.extend(std::iter::repeat_n(String::new(), DIAGNOSTIC_COLUMNS.len())),
            }
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::model::weather::diurnal_series;
    use crate::sim::model::{Configuration, HeatBudgetModel};
    use chrono::NaiveDateTime;

    fn run(diagnostics: bool) -> anyhow::Result<SimulationOutput> {
        let t0 = NaiveDateTime::parse_from_str("2024-07-15 00:00", "%Y-%m-%d %H:%M")?;
        let cfg = Configuration {
            enable_diagnostics: diagnostics,
            ..Configuration::at_site(45.0, -120.0, 100.0, -8.0)
        };
        Ok(HeatBudgetModel::new(&cfg)?.run(&diurnal_series(t0, 3, 15.0, 10.0))?)
    }

    #[test]
    fn test_write_without_diagnostics() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_results(&mut buf, &run(false)?)?;
        let text = String::from_utf8(buf)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], RESULT_COLUMNS.join(","));
        assert!(lines[1].starts_with("2024-07-15 00:00:00,"), "got {}", lines[1]);
        assert_eq!(lines[1].split(',').count(), 16);
        Ok(())
    }

    #[test]
    fn test_write_with_diagnostics() -> anyhow::Result<()> {
        let mut buf = Vec::new();
        write_results(&mut buf, &run(true)?)?;
        let text = String::from_utf8(buf)?;
        let header = text.lines().next().unwrap_or_default();
        assert!(header.ends_with("sediment_temp_change_rate"), "got {header}");
        for line in text.lines() {
            assert_eq!(line.split(',').count(), 24, "got {line}");
        }
        Ok(())
    }
}
