//! Output formatting and persistence for analysis results.
//!
//! Supports pretty-printing, JSON files, and a CSV summary log.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{FeedAnalysis, FrequencySummary};
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Logs an analysis using Rust's debug pretty-print format.
pub fn print_pretty(analysis: &FeedAnalysis) {
    debug!("{:#?}", analysis);
}

/// Logs any result as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes any result as compact JSON to `path`, replacing the file.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    debug!(path, "Wrote JSON result");
    Ok(())
}

/// Appends the bucket counts of an analysis as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &str, analysis: &FeedAnalysis) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(FrequencySummary::from(analysis))?;
    writer.flush()?;

    Ok(())
}
