//! Meteorological input table.
//!
//! Columns are matched by header name, in any order. Required columns are
//! `datetime, air_temperature, dewpoint_temperature, wind_speed, cloud_cover`.
//! Optional columns may be missing or left blank.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::sim::model::{AtmosphericOverrides, MeteorologicalRecord};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Reads meteorological records from a CSV file.
pub fn read_met_csv(path: &Path) -> Result<Vec<MeteorologicalRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    parse_met_csv(file)
        .with_context(|| format!("Failed to read meteorological data from: {}", path.display()))
}

/// Parses meteorological records from CSV text.
pub fn parse_met_csv<R: Read>(reader: R) -> Result<Vec<MeteorologicalRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_headers(rdr.headers().context("Missing header row")?)?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = row.with_context(|| format!("Invalid CSV at line {line}"))?;
        records.push(columns.record(&row, line)?);
    }
    Ok(records)
}

/// Parses a timestamp in one of the accepted layouts.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

struct Columns {
    datetime: usize,
    air_temperature: usize,
    dewpoint_temperature: usize,
    wind_speed: usize,
    cloud_cover: usize,
    solar_radiation: Option<usize>,
    water_depth_override: Option<usize>,
    effective_shade_override: Option<usize>,
    pressure_mb: Option<usize>,
    ozone_cm: Option<usize>,
    water_vapor_cm: Option<usize>,
    aod_500nm: Option<usize>,
    aod_380nm: Option<usize>,
    forward_scatter: Option<usize>,
    ground_albedo: Option<usize>,
    visibility_km: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &str| {
            find(name).with_context(|| format!("Missing required column '{name}'"))
        };

        Ok(Self {
            datetime: require("datetime")?,
            air_temperature: require("air_temperature")?,
            dewpoint_temperature: require("dewpoint_temperature")?,
            wind_speed: require("wind_speed")?,
            cloud_cover: require("cloud_cover")?,
            solar_radiation: find("solar_radiation"),
            water_depth_override: find("water_depth_override"),
            effective_shade_override: find("effective_shade_override"),
            pressure_mb: find("pressure_mb"),
            ozone_cm: find("ozone_cm"),
            water_vapor_cm: find("water_vapor_cm"),
            aod_500nm: find("aod_500nm"),
            aod_380nm: find("aod_380nm"),
            forward_scatter: find("forward_scatter"),
            ground_albedo: find("ground_albedo"),
            visibility_km: find("visibility_km"),
        })
    }

    fn record(&self, row: &StringRecord, line: usize) -> Result<MeteorologicalRecord> {
        let text = row.get(self.datetime).unwrap_or("");
        let datetime = parse_datetime(text)
            .with_context(|| format!("Invalid datetime '{text}' at line {line}"))?;

        let required = |idx: usize, name: &str| -> Result<f64> {
            let s = row.get(idx).unwrap_or("");
            s.parse::<f64>()
                .with_context(|| format!("Invalid {name} '{s}' at line {line}"))
        };
        let optional = |idx: Option<usize>, name: &str| -> Result<Option<f64>> {
            match idx.and_then(|i| row.get(i)).filter(|s| !s.is_empty()) {
                Some(s) => s
                    .parse::<f64>()
                    .map(Some)
                    .with_context(|| format!("Invalid {name} '{s}' at line {line}")),
                None => Ok(None),
            }
        };

        Ok(MeteorologicalRecord {
            datetime,
            air_temperature: required(self.air_temperature, "air temperature")?,
            dewpoint_temperature: required(self.dewpoint_temperature, "dewpoint temperature")?,
            wind_speed: required(self.wind_speed, "wind speed")?,
            cloud_cover: required(self.cloud_cover, "cloud cover")?,
            solar_radiation: optional(self.solar_radiation, "solar radiation")?,
            water_depth_override: optional(self.water_depth_override, "water depth override")?,
            effective_shade_override: optional(self.effective_shade_override, "shade override")?,
            atmosphere: AtmosphericOverrides {
                pressure_mb: optional(self.pressure_mb, "pressure")?,
                ozone_cm: optional(self.ozone_cm, "ozone")?,
                water_vapor_cm: optional(self.water_vapor_cm, "water vapor")?,
                aod_500nm: optional(self.aod_500nm, "AOD 500 nm")?,
                aod_380nm: optional(self.aod_380nm, "AOD 380 nm")?,
                forward_scatter: optional(self.forward_scatter, "forward scatter")?,
                ground_albedo: optional(self.ground_albedo, "ground albedo")?,
                visibility_km: optional(self.visibility_km, "visibility")?,
            },
        })
    }
}
