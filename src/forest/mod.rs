//! Isolation forest training
//!
//! An [`IsolationForest`] is an immutable ensemble of randomized
//! partitioning trees plus the configuration that built it. Training is
//! embarrassingly parallel: each tree gets its own seed derived from the
//! base seed and tree index, so results do not depend on worker scheduling.
//! Retraining always produces a new forest value; nothing is mutated in
//! place and a trained forest is safe to share across scoring calls.

pub mod sampler;
pub mod tree;

pub use sampler::SampleMode;
pub use tree::{average_path_length, IsolationTree, Node, NodeId};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::Dataset;
use crate::error::{Result, SentinelError};
use crate::scoring::ScoreTable;

/// Training configuration for an isolation forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble.
    pub tree_count: usize,
    /// Records drawn per tree.
    pub subsample_size: usize,
    /// Depth cap per tree; defaults to `ceil(log2(subsample_size))`, the
    /// expected isolation depth of a typical record.
    pub max_depth: Option<usize>,
    /// Base random seed; tree `i` uses `seed.wrapping_add(i)`.
    pub seed: u64,
    /// Subsample draw mode.
    pub sample_mode: SampleMode,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            tree_count: 100,
            subsample_size: 256,
            max_depth: None,
            seed: 42,
            sample_mode: SampleMode::default(),
        }
    }
}

impl ForestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of trees
    pub fn with_tree_count(mut self, n: usize) -> Self {
        self.tree_count = n;
        self
    }

    /// Set the subsample size per tree
    pub fn with_subsample_size(mut self, n: usize) -> Self {
        self.subsample_size = n;
        self
    }

    /// Set an explicit depth cap
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set the base random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the subsample draw mode
    pub fn with_sample_mode(mut self, mode: SampleMode) -> Self {
        self.sample_mode = mode;
        self
    }

    fn effective_max_depth(&self) -> usize {
        self.max_depth
            .unwrap_or_else(|| (self.subsample_size as f64).log2().ceil() as usize)
            .max(1)
    }
}

/// A trained ensemble of isolation trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    config: ForestConfig,
    arity: usize,
    max_depth: usize,
}

impl IsolationForest {
    /// Train a forest over `dataset`.
    ///
    /// Fail-fast: any invalid configuration or tree-build failure aborts the
    /// whole call; a partially built forest is never returned.
    pub fn train(dataset: &Dataset, config: &ForestConfig) -> Result<Self> {
        if dataset.is_empty() {
            return Err(SentinelError::invalid_config(
                "dataset",
                0,
                "cannot train on an empty dataset",
            ));
        }
        if config.tree_count < 1 {
            return Err(SentinelError::invalid_config(
                "tree_count",
                config.tree_count,
                "must be at least 1",
            ));
        }
        if config.subsample_size < 2 {
            return Err(SentinelError::invalid_config(
                "subsample_size",
                config.subsample_size,
                "must be at least 2",
            ));
        }
        if config.sample_mode == SampleMode::WithoutReplacement
            && config.subsample_size > dataset.n_records()
        {
            return Err(SentinelError::invalid_config(
                "subsample_size",
                config.subsample_size,
                format!(
                    "exceeds dataset size {} when sampling without replacement",
                    dataset.n_records()
                ),
            ));
        }

        let arity = dataset.arity();
        let max_depth = config.effective_max_depth();
        let n_records = dataset.n_records();
        let values = dataset.values();

        let trees: Vec<IsolationTree> = (0..config.tree_count)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = config.seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let indices = sampler::sample_indices(
                    n_records,
                    config.subsample_size,
                    config.sample_mode,
                    &mut rng,
                )?;
                IsolationTree::build(values, &indices, arity, max_depth, &mut rng)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            tree_count = trees.len(),
            subsample_size = config.subsample_size,
            max_depth,
            seed = config.seed,
            "trained isolation forest"
        );

        Ok(Self {
            trees,
            config: config.clone(),
            arity,
            max_depth,
        })
    }

    /// Score every record in `dataset`; see [`crate::scoring::score`].
    pub fn score(&self, dataset: &Dataset) -> Result<ScoreTable> {
        crate::scoring::score(self, dataset)
    }

    /// The trained trees, in build order.
    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Feature arity the forest was trained on.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Subsample size used per tree; the score normalizer derives from it.
    pub fn subsample_size(&self) -> usize {
        self.config.subsample_size
    }

    /// Depth cap the trees were built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}
