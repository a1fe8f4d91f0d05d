//! sentinel-iforest - Isolation-forest anomaly detection for system telemetry
//!
//! Builds an ensemble of randomized partitioning trees over multivariate
//! numeric telemetry (logins, file access, CPU, network egress, process
//! counts) and scores each record by how quickly it becomes isolated.
//! Training is deterministic given a seed and parallel across trees; a
//! trained forest is immutable and shared read-only by scoring calls.
//!
//! Score convention, fixed crate-wide: **higher score = more anomalous**
//! (bounded in (0, 1], typical records land near or below 0.5).
//!
//! # Modules
//!
//! - [`data`] - Immutable datasets, the telemetry schema, CSV glue
//! - [`forest`] - Subsampling, tree construction, ensemble training
//! - [`scoring`] - Score tables and threshold classification
//! - [`synthetic`] - Seeded synthetic telemetry generation
//! - [`cli`] - Command-line driver

// Core error handling
pub mod error;

// Data boundary
pub mod data;
pub mod synthetic;

// Core engine
pub mod forest;
pub mod scoring;

// Services
pub mod cli;

pub use error::{Result, SentinelError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{Dataset, TelemetryRecord, TELEMETRY_COLUMNS};
    pub use crate::error::{Result, SentinelError};
    pub use crate::forest::{ForestConfig, IsolationForest, IsolationTree, SampleMode};
    pub use crate::scoring::{classify, score, ScoreTable, ThresholdSweep};
    pub use crate::synthetic::{SyntheticBatch, TelemetryGenerator};
}
