//! JSON configuration files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use crate::sim::model::Configuration;

/// Writes a configuration as pretty-printed JSON.
pub fn write_config(path: &Path, config: &Configuration) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, config)
        .with_context(|| format!("Failed to serialize configuration to: {}", path.display()))?;

    Ok(())
}

/// Reads a configuration. Missing fields take their defaults.
pub fn read_config(path: &Path) -> Result<Configuration> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let config: Configuration = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize configuration from: {}", path.display()))?;

    Ok(config)
}
