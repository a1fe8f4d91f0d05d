//! Threshold classification over a precomputed score table
//!
//! Both entry points are pure filters: changing the cutoff never re-scores.
//! A record is flagged anomalous when its score is strictly above the
//! threshold (higher score = more anomalous).

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreTable;

/// Flag each record whose score exceeds `threshold`. O(N) per call and
/// idempotent: the same table and threshold always yield the same flags.
pub fn classify(table: &ScoreTable, threshold: f64) -> Vec<bool> {
    table.scores().iter().map(|&s| s > threshold).collect()
}

/// Pre-sorted view of a score table for interactive threshold sweeps.
///
/// Sorting happens once at construction; each query is a binary search plus
/// the qualifying subset, O(log N + k), so a UI slider can re-evaluate on
/// every tick without touching the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSweep {
    /// (score, record index), sorted by descending score.
    ranked: Vec<(f64, usize)>,
}

impl ThresholdSweep {
    pub fn new(table: &ScoreTable) -> Self {
        let mut ranked: Vec<(f64, usize)> = table
            .scores()
            .iter()
            .copied()
            .enumerate()
            .map(|(i, s)| (s, i))
            .collect();
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { ranked }
    }

    /// Record indices whose score exceeds `threshold`, most anomalous first.
    pub fn flagged(&self, threshold: f64) -> Vec<usize> {
        let cut = self.ranked.partition_point(|&(s, _)| s > threshold);
        self.ranked[..cut].iter().map(|&(_, i)| i).collect()
    }

    /// Number of records above `threshold` without materializing them.
    pub fn count_above(&self, threshold: f64) -> usize {
        self.ranked.partition_point(|&(s, _)| s > threshold)
    }

    /// The `k` highest-scoring records as (score, record index).
    pub fn top(&self, k: usize) -> &[(f64, usize)] {
        &self.ranked[..k.min(self.ranked.len())]
    }
}
