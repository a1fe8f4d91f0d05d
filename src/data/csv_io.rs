//! CSV ingest and export glue
//!
//! The core never touches files itself; these helpers sit at the loader /
//! presentation boundary, reading the five-column telemetry schema and
//! writing scored results back out for downstream reporting.

use std::path::Path;

use crate::data::{Dataset, TelemetryRecord};
use crate::error::{Result, SentinelError};

/// Load a telemetry CSV (header row required) into a [`Dataset`].
pub fn load_telemetry(path: impl AsRef<Path>) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for row in reader.deserialize::<TelemetryRecord>() {
        records.push(row?);
    }
    if records.is_empty() {
        return Err(SentinelError::DataError(format!(
            "{} contains no telemetry rows",
            path.as_ref().display()
        )));
    }
    Ok(Dataset::from_records(&records))
}

/// Write raw telemetry records with the schema header.
pub fn write_telemetry(path: impl AsRef<Path>, records: &[TelemetryRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write each record's features plus its anomaly score and flag.
///
/// `scores` and `flags` must line up one-to-one with the dataset's rows.
pub fn write_scored(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    scores: &[f64],
    flags: &[bool],
) -> Result<()> {
    if scores.len() != dataset.n_records() || flags.len() != dataset.n_records() {
        return Err(SentinelError::DataError(format!(
            "{} scores / {} flags for {} records",
            scores.len(),
            flags.len(),
            dataset.n_records()
        )));
    }

    let mut writer = csv::Writer::from_path(path.as_ref())?;

    let mut header: Vec<String> = dataset.columns().to_vec();
    header.push("anomaly_score".to_string());
    header.push("is_anomaly".to_string());
    writer.write_record(&header)?;

    for (i, row) in dataset.values().rows().into_iter().enumerate() {
        let mut fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        fields.push(scores[i].to_string());
        fields.push(flags[i].to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}
