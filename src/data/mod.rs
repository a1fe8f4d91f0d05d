//! Telemetry dataset types
//!
//! A [`Dataset`] is an immutable table of numeric feature vectors with a
//! fixed, named column schema. The engine only ever reads it; loading and
//! generation live at the edges (see [`csv_io`] and [`crate::synthetic`]).

pub mod csv_io;

use crate::error::{Result, SentinelError};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Column order of the system activity schema, fixed at ingest time.
pub const TELEMETRY_COLUMNS: [&str; 5] = [
    "login_attempts_per_min",
    "files_accessed_per_min",
    "cpu_usage_avg",
    "network_out_mb",
    "process_count",
];

/// One row of system activity telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub login_attempts_per_min: u32,
    pub files_accessed_per_min: u32,
    pub cpu_usage_avg: f64,
    pub network_out_mb: f64,
    pub process_count: u32,
}

impl TelemetryRecord {
    /// Feature vector in [`TELEMETRY_COLUMNS`] order.
    pub fn to_features(&self) -> [f64; 5] {
        [
            self.login_attempts_per_min as f64,
            self.files_accessed_per_min as f64,
            self.cpu_usage_avg,
            self.network_out_mb,
            self.process_count as f64,
        ]
    }
}

/// An immutable table of feature vectors sharing one arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Dataset {
    /// Create a dataset from named columns and a row-major value matrix.
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(SentinelError::DataError(format!(
                "{} column names for {} value columns",
                columns.len(),
                values.ncols()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Build a dataset from telemetry records using the fixed schema.
    pub fn from_records(records: &[TelemetryRecord]) -> Self {
        let mut flat = Vec::with_capacity(records.len() * TELEMETRY_COLUMNS.len());
        for record in records {
            flat.extend_from_slice(&record.to_features());
        }
        let values = Array2::from_shape_vec((records.len(), TELEMETRY_COLUMNS.len()), flat)
            .expect("row-major telemetry matrix has consistent shape");
        Self {
            columns: TELEMETRY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            values,
        }
    }

    /// Number of records (rows).
    pub fn n_records(&self) -> usize {
        self.values.nrows()
    }

    /// Feature arity (columns).
    pub fn arity(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_records() == 0
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Read-only view of the value matrix.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// One record's feature vector.
    pub fn record(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.index_axis(Axis(0), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dataset_from_records() {
        let records = vec![
            TelemetryRecord {
                login_attempts_per_min: 1,
                files_accessed_per_min: 10,
                cpu_usage_avg: 20.5,
                network_out_mb: 2.0,
                process_count: 50,
            },
            TelemetryRecord {
                login_attempts_per_min: 40,
                files_accessed_per_min: 150,
                cpu_usage_avg: 95.0,
                network_out_mb: 120.0,
                process_count: 180,
            },
        ];

        let ds = Dataset::from_records(&records);
        assert_eq!(ds.n_records(), 2);
        assert_eq!(ds.arity(), 5);
        assert_eq!(ds.columns()[2], "cpu_usage_avg");
        assert_eq!(ds.record(1)[4], 180.0);
    }

    #[test]
    fn test_dataset_column_mismatch() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        let result = Dataset::new(vec!["only_one".to_string()], values);
        assert!(matches!(result, Err(SentinelError::DataError(_))));
    }
}
