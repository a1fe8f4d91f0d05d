//! Subsample selection for tree construction

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

/// How record indices are drawn for each tree's subsample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleMode {
    /// Each record appears at most once per subsample.
    #[default]
    WithoutReplacement,
    /// Independent uniform draws; duplicates allowed.
    WithReplacement,
}

/// Draw `size` record indices out of `n_records`.
///
/// Deterministic given the rng state: the same seeded generator reproduces
/// the same subsample.
pub fn sample_indices(
    n_records: usize,
    size: usize,
    mode: SampleMode,
    rng: &mut impl Rng,
) -> Result<Vec<usize>> {
    if n_records == 0 {
        return Err(SentinelError::invalid_config(
            "n_records",
            n_records,
            "cannot sample from an empty dataset",
        ));
    }
    if size == 0 {
        return Err(SentinelError::invalid_config(
            "subsample_size",
            size,
            "must be at least 1",
        ));
    }

    match mode {
        SampleMode::WithoutReplacement => {
            if size > n_records {
                return Err(SentinelError::invalid_config(
                    "subsample_size",
                    size,
                    format!("exceeds dataset size {n_records} when sampling without replacement"),
                ));
            }
            let mut indices: Vec<usize> = (0..n_records).collect();
            indices.shuffle(rng);
            indices.truncate(size);
            Ok(indices)
        }
        SampleMode::WithReplacement => {
            Ok((0..size).map(|_| rng.gen_range(0..n_records)).collect())
        }
    }
}
