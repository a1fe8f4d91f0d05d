//! Anomaly scoring
//!
//! Maps average isolation depth across the ensemble to a score in (0, 1].
//! Convention, fixed crate-wide: **higher score = more anomalous**. A score
//! near 1 means the record isolates in very few splits; scores at or below
//! 0.5 are typical.

pub mod threshold;

pub use threshold::{classify, ThresholdSweep};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::error::{Result, SentinelError};
use crate::forest::{average_path_length, IsolationForest};

/// One anomaly score per scored record, in record order.
///
/// Produced fresh by each scoring pass and never mutated; re-scoring builds
/// a new table. Thresholding is a pure filter over this table (see
/// [`threshold`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    scores: Vec<f64>,
}

impl ScoreTable {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score of one record.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied()
    }

    /// All scores, indexed by record.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}

/// Score every record in `dataset` against a trained forest.
///
/// Deterministic given the forest: traversal is read-only and per-record
/// results are collected in record order, so repeated calls produce
/// bit-identical tables.
pub fn score(forest: &IsolationForest, dataset: &Dataset) -> Result<ScoreTable> {
    if dataset.arity() != forest.arity() {
        return Err(SentinelError::invalid_config(
            "feature_arity",
            dataset.arity(),
            format!("forest was trained on {} features", forest.arity()),
        ));
    }

    let c_n = average_path_length(forest.subsample_size());
    let trees = forest.trees();

    let scores: Vec<f64> = (0..dataset.n_records())
        .into_par_iter()
        .map(|i| {
            let record = dataset.record(i);
            let avg_path: f64 = trees
                .iter()
                .map(|tree| tree.path_length(record))
                .sum::<f64>()
                / trees.len() as f64;
            2.0_f64.powf(-avg_path / c_n)
        })
        .collect();

    Ok(ScoreTable { scores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::forest::ForestConfig;
    use ndarray::Array2;

    fn clustered_dataset() -> Dataset {
        // 60 points around the origin plus two far outliers.
        let mut flat = Vec::new();
        for i in 0..60 {
            flat.push((i % 6) as f64);
            flat.push((i % 5) as f64);
        }
        flat.extend_from_slice(&[500.0, 500.0]);
        flat.extend_from_slice(&[-400.0, 600.0]);
        let values = Array2::from_shape_vec((62, 2), flat).unwrap();
        Dataset::new(vec!["x".to_string(), "y".to_string()], values).unwrap()
    }

    #[test]
    fn test_scores_in_unit_interval() {
        let ds = clustered_dataset();
        let config = ForestConfig::new()
            .with_tree_count(50)
            .with_subsample_size(32)
            .with_seed(42);
        let forest = IsolationForest::train(&ds, &config).unwrap();

        let table = forest.score(&ds).unwrap();
        assert_eq!(table.len(), ds.n_records());
        for &s in table.scores() {
            assert!(s > 0.0 && s <= 1.0, "score out of range: {s}");
        }
    }

    #[test]
    fn test_outliers_score_higher() {
        let ds = clustered_dataset();
        let config = ForestConfig::new()
            .with_tree_count(50)
            .with_subsample_size(32)
            .with_seed(42);
        let forest = IsolationForest::train(&ds, &config).unwrap();

        let table = forest.score(&ds).unwrap();
        let typical = table.get(0).unwrap();
        assert!(table.get(60).unwrap() > typical);
        assert!(table.get(61).unwrap() > typical);
    }

    #[test]
    fn test_rescoring_is_identical() {
        let ds = clustered_dataset();
        let config = ForestConfig::new()
            .with_tree_count(25)
            .with_subsample_size(16)
            .with_seed(9);
        let forest = IsolationForest::train(&ds, &config).unwrap();

        let a = forest.score(&ds).unwrap();
        let b = forest.score(&ds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_rejects_arity_mismatch() {
        let ds = clustered_dataset();
        let config = ForestConfig::new()
            .with_tree_count(10)
            .with_subsample_size(16);
        let forest = IsolationForest::train(&ds, &config).unwrap();

        let narrow = Dataset::new(
            vec!["x".to_string()],
            Array2::from_shape_vec((2, 1), vec![1.0, 2.0]).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            forest.score(&narrow),
            Err(SentinelError::InvalidConfiguration { .. })
        ));
    }
}
