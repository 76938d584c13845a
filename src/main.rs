//! rtemp - water temperature heat-budget model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

use rtemp::io::{read_config, read_met_csv, write_config, write_results_csv};
use rtemp::sim::model::{Configuration, HeatBudgetModel};
use rtemp::sim::solar::{SiteLocation, SunTimes};

#[derive(Parser)]
#[command(name = "rtemp", version, about = "Heat-budget water temperature model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the model over a meteorological CSV file
    Run {
        /// Site configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Meteorological input (CSV)
        #[arg(short, long)]
        met: PathBuf,

        /// Output path for the result table (CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Append diagnostic columns
        #[arg(long)]
        diagnostics: bool,
    },

    /// Print sunrise, solar noon and sunset for a date
    Sun {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// Hours from UTC, negative west
        #[arg(long, allow_hyphen_values = true)]
        timezone: f64,

        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        /// Daylight savings time in effect
        #[arg(long)]
        dst: bool,
    },

    /// Write the default configuration
    InitConfig {
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            met,
            output,
            diagnostics,
        } => {
            let mut cfg = read_config(&config)?;
            cfg.enable_diagnostics |= diagnostics;
            let model = HeatBudgetModel::new(&cfg).context("Invalid configuration")?;
            let records = read_met_csv(&met)?;
            let result = model.run(&records).context("Simulation failed")?;
            write_results_csv(&output, &result)?;
            if let Some(s) = result.summary() {
                info!("Wrote {} rows to {}", s.records, output.display());
                println!(
                    "{} steps: water {:.2} to {:.2} °C (mean {:.2}), absorbed solar {:.1} MJ/m²",
                    s.records,
                    s.min_water_temperature,
                    s.max_water_temperature,
                    s.mean_water_temperature,
                    s.total_solar_energy
                );
            }
            Ok(())
        }
        Command::Sun {
            latitude,
            longitude,
            timezone,
            date,
            dst,
        } => {
            let site = SiteLocation::new(latitude, longitude, timezone, dst);
            let times = SunTimes::calculate(&site, date);
            println!("sunrise     {}", clock_time(times.sunrise));
            println!("solar noon  {}", clock_time(times.solar_noon));
            println!("sunset      {}", clock_time(times.sunset));
            println!("photoperiod {:.2} h", times.photoperiod_hours());
            Ok(())
        }
        Command::InitConfig { output } => {
            write_config(&output, &Configuration::default())?;
            println!("Wrote default configuration to {}", output.display());
            Ok(())
        }
    }
}

/// Formats a fraction of a day as HH:MM.
fn clock_time(day_fraction: f64) -> String {
    let minutes = (day_fraction.rem_euclid(1.0) * 1440.0).round() as u32 % 1440;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
