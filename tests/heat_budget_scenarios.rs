use anyhow::Result;
use approx::assert_relative_eq;
use chrono::{Duration, NaiveDateTime, Timelike};

use rtemp::io::{read_config, read_met_csv, write_config, write_results_csv};
use rtemp::sim::model::weather::diurnal_series;
use rtemp::sim::model::{
    Configuration, HeatBudgetModel, MeteorologicalRecord, Scenario, run_scenarios,
};
use rtemp::sim::solar::{SiteLocation, SunTimes};
use rtemp::{RTempError, SimulationOutput};

fn start() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-07-15 00:00:00", "%Y-%m-%d %H:%M:%S")
        .expect("valid timestamp")
}

fn site() -> Configuration {
    Configuration {
        water_depth: 2.0,
        ..Configuration::at_site(45.0, -120.0, 100.0, -8.0)
    }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let cov: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let vx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let vy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();
    cov / (vx * vy).sqrt()
}

fn amplitude(out: &SimulationOutput) -> f64 {
    let s = out.summary().expect("non-empty output");
    s.max_water_temperature - s.min_water_temperature
}

#[test]
fn test_diurnal_day_with_default_methods() -> Result<()> {
    let cfg = site();
    let out = HeatBudgetModel::new(&cfg)?.run(&diurnal_series(start(), 24, 15.0, 10.0))?;

    assert_eq!(out.len(), 24);
    for r in &out.records {
        assert!(r.water_temperature.is_finite(), "got {}", r.water_temperature);
        assert!(r.sediment_temperature.is_finite(), "got {}", r.sediment_temperature);
        assert!(r.water_temperature >= cfg.minimum_temperature);
        assert!(r.sediment_temperature >= cfg.minimum_temperature);
        if r.datetime.hour() <= 4 {
            assert_eq!(r.solar_radiation, 0.0, "at {}", r.datetime);
        }
    }

    let summary = out.summary().expect("non-empty output");
    assert!(summary.total_solar_energy > 10.0, "got {}", summary.total_solar_energy);
    assert!(summary.total_solar_energy < 35.0, "got {}", summary.total_solar_energy);
    Ok(())
}

#[test]
fn test_every_method_combination_runs() -> Result<()> {
    let records = diurnal_series(start(), 24, 15.0, 10.0);
    for solar in ["Bras", "Bird", "Ryan-Stolzenbach", "Iqbal"] {
        for longwave in ["Brunt", "Brutsaert", "Satterlund", "Idso-Jackson", "Swinbank", "Koberg"] {
            for wind in [
                "Brady-Graves-Geyer",
                "Marciano-Harbeck",
                "Ryan-Harleman",
                "East Mesa",
                "Helfrich",
            ] {
                let cfg = Configuration {
                    solar_method: solar.to_string(),
                    longwave_method: longwave.to_string(),
                    wind_function_method: wind.to_string(),
                    ..site()
                };
                let out = HeatBudgetModel::new(&cfg)?.run(&records)?;
                assert_eq!(out.len(), 24);
                assert!(
                    out.records.iter().all(|r| r.water_temperature.is_finite()),
                    "{solar}/{longwave}/{wind}"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_deeper_water_dampens_changes() -> Result<()> {
    let records: Vec<MeteorologicalRecord> = diurnal_series(start(), 48, 15.0, 10.0)
        .into_iter()
        .enumerate()
        .map(|(i, mut r)| {
            r.water_depth_override = Some(if i % 2 == 0 { 2.5 } else { 1.5 });
            r
        })
        .collect();
    let out = HeatBudgetModel::new(&site())?.run(&records)?;
    assert_eq!(out.len(), 48);

    let depths: Vec<f64> = records[1..]
        .iter()
        .filter_map(|r| r.water_depth_override)
        .collect();
    let changes: Vec<f64> = out
        .records
        .windows(2)
        .map(|w| (w[1].water_temperature - w[0].water_temperature).abs())
        .collect();
    let r = pearson(&depths, &changes);
    assert!(r < 0.0, "got correlation {r}");

    let shallow = HeatBudgetModel::new(&Configuration {
        water_depth: 1.5,
        ..site()
    })?
    .run(&diurnal_series(start(), 48, 15.0, 10.0))?;
    let deep = HeatBudgetModel::new(&Configuration {
        water_depth: 2.5,
        ..site()
    })?
    .run(&diurnal_series(start(), 48, 15.0, 10.0))?;
    assert!(
        amplitude(&deep) < amplitude(&shallow),
        "deep {} shallow {}",
        amplitude(&deep),
        amplitude(&shallow)
    );
    Ok(())
}

#[test]
fn test_zero_depth_is_an_error() -> Result<()> {
    let bad = Configuration {
        water_depth: 0.0,
        ..site()
    };
    assert!(matches!(
        HeatBudgetModel::new(&bad),
        Err(RTempError::InvalidParameter { name: "water_depth", .. })
    ));

    let mut records = diurnal_series(start(), 5, 15.0, 10.0);
    records[3].water_depth_override = Some(0.0);
    assert!(matches!(
        HeatBudgetModel::new(&site())?.run(&records),
        Err(RTempError::InvalidRecord { index: 3, .. })
    ));
    Ok(())
}

#[test]
fn test_unknown_method_names_valid_options() {
    let cfg = Configuration {
        wind_function_method: "Breezy".to_string(),
        ..site()
    };
    let err = HeatBudgetModel::new(&cfg).expect_err("unknown wind function");
    let msg = err.to_string();
    assert!(msg.contains("Breezy"), "got {msg}");
    assert!(msg.contains("Helfrich"), "got {msg}");
}

#[test]
fn test_coarse_timestep_is_unstable() -> Result<()> {
    let cfg = Configuration {
        water_depth: 0.02,
        stability_criteria: 0.5,
        large_timestep_warning_hours: 4.0,
        large_timestep_reset_hours: 6.0,
        ..site()
    };
    let records: Vec<_> = (0..4)
        .map(|i| MeteorologicalRecord::new(start() + Duration::hours(3 * i), 5.0, 0.0, 6.0, 0.0))
        .collect();
    match HeatBudgetModel::new(&cfg)?.run(&records) {
        Err(RTempError::NumericalInstability { change, threshold, .. }) => {
            assert!(change > threshold, "change {change} threshold {threshold}");
        }
        other => panic!("expected NumericalInstability, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_scenario_batch_keeps_order() -> Result<()> {
    let scenarios: Vec<Scenario> = [0.0, 0.3, 0.6, 0.9]
        .iter()
        .map(|&shade| Scenario {
            effective_shade: Some(shade),
            ..Scenario::new(&format!("shade {shade}"))
        })
        .collect();
    let results = run_scenarios(&site(), &scenarios, &diurnal_series(start(), 24, 15.0, 10.0));
    assert_eq!(results.len(), 4);

    let mut prev_solar = f64::INFINITY;
    for ((name, result), scenario) in results.iter().zip(&scenarios) {
        assert_eq!(name, &scenario.name);
        let out = result.as_ref().map_err(|e| anyhow::anyhow!("{name}: {e}"))?;
        let solar = out.summary().expect("non-empty output").total_solar_energy;
        assert!(solar < prev_solar, "{name}: {solar} >= {prev_solar}");
        prev_solar = solar;
    }
    Ok(())
}

#[test]
fn test_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("site.json");
    let met_path = dir.path().join("met.csv");
    let out_path = dir.path().join("results.csv");

    let cfg = Configuration {
        enable_diagnostics: true,
        ..site()
    };
    write_config(&config_path, &cfg)?;

    let mut met = String::from(
        "datetime,air_temperature,dewpoint_temperature,wind_speed,cloud_cover,solar_radiation\n",
    );
    for r in diurnal_series(start(), 12, 15.0, 10.0) {
        met.push_str(&format!(
            "{},{},{},{},{},\n",
            r.datetime.format("%Y-%m-%d %H:%M"),
            r.air_temperature,
            r.dewpoint_temperature,
            r.wind_speed,
            r.cloud_cover
        ));
    }
    std::fs::write(&met_path, met)?;

    let model = HeatBudgetModel::new(&read_config(&config_path)?)?;
    let records = read_met_csv(&met_path)?;
    assert_eq!(records.len(), 12);
    let out = model.run(&records)?;
    write_results_csv(&out_path, &out)?;

    let mut rdr = csv::Reader::from_path(&out_path)?;
    assert_eq!(rdr.headers()?.len(), 24);
    let rows: Vec<csv::StringRecord> = rdr.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 12);
    let last_water: f64 = rows[11][12].parse()?;
    assert_relative_eq!(last_water, out.records[11].water_temperature, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_sun_times_match_solar_rows() -> Result<()> {
    let location = SiteLocation::new(45.0, -120.0, -8.0, false);
    let times = SunTimes::calculate(&location, start().date());
    let sunrise = start() + Duration::seconds((times.sunrise * 86400.0) as i64);

    let out = HeatBudgetModel::new(&site())?.run(&diurnal_series(start(), 24, 15.0, 10.0))?;
    for r in &out.records {
        if r.datetime + Duration::minutes(10) < sunrise {
            assert_eq!(r.solar_radiation, 0.0, "at {}", r.datetime);
        }
    }
    assert!(times.photoperiod_hours() > 15.0, "got {}", times.photoperiod_hours());
    Ok(())
}
