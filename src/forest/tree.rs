//! Isolation tree construction and traversal
//!
//! Each tree is an arena of nodes indexed by [`NodeId`]; the arena is owned
//! solely by its tree and never shared during construction. Splits pick a
//! random feature with spread and a uniform threshold inside that feature's
//! observed range, so anomalous records separate in few splits.

use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

/// Euler-Mascheroni constant, used by the path-length correction.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Features whose spread is below this are treated as constant at a node.
const MIN_SPREAD: f64 = 1e-10;

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in an isolation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Internal split: values `< threshold` go left, `>= threshold` go right.
    Split {
        feature: usize,
        threshold: f64,
        left: NodeId,
        right: NodeId,
    },
    /// Terminal node recording how many records reached it and at what depth.
    Leaf { size: usize, depth: usize },
}

/// One randomized partitioning tree, immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl IsolationTree {
    /// Build a tree over `indices` into `values`.
    ///
    /// `feature_arity` must match the value matrix's column count and
    /// `max_depth` must be at least 1; both are caller configuration, so a
    /// mismatch is an `InvalidConfiguration` error.
    pub fn build(
        values: ArrayView2<'_, f64>,
        indices: &[usize],
        feature_arity: usize,
        max_depth: usize,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if max_depth < 1 {
            return Err(SentinelError::invalid_config(
                "max_depth",
                max_depth,
                "must be at least 1",
            ));
        }
        if feature_arity != values.ncols() {
            return Err(SentinelError::invalid_config(
                "feature_arity",
                feature_arity,
                format!("subsample has {} columns", values.ncols()),
            ));
        }
        if indices.is_empty() {
            return Err(SentinelError::invalid_config(
                "subsample",
                0,
                "cannot build a tree from an empty subsample",
            ));
        }

        let mut nodes = Vec::new();
        let root = Self::build_node(&mut nodes, values, indices, 0, max_depth, rng);
        Ok(Self { nodes, root })
    }

    fn push(nodes: &mut Vec<Node>, node: Node) -> NodeId {
        nodes.push(node);
        NodeId((nodes.len() - 1) as u32)
    }

    fn build_node(
        nodes: &mut Vec<Node>,
        values: ArrayView2<'_, f64>,
        indices: &[usize],
        depth: usize,
        max_depth: usize,
        rng: &mut impl Rng,
    ) -> NodeId {
        let size = indices.len();

        if depth >= max_depth || size <= 1 {
            return Self::push(nodes, Node::Leaf { size, depth });
        }

        // Candidate features are those with spread at this node; drawing
        // uniformly from them is the re-draw policy for degenerate features.
        let mut candidates: Vec<(usize, f64, f64)> = Vec::new();
        for feature in 0..values.ncols() {
            let mut min_val = f64::INFINITY;
            let mut max_val = f64::NEG_INFINITY;
            for &i in indices {
                let v = values[[i, feature]];
                min_val = min_val.min(v);
                max_val = max_val.max(v);
            }
            if max_val - min_val > MIN_SPREAD {
                candidates.push((feature, min_val, max_val));
            }
        }

        // All records identical across every feature: no separating split.
        if candidates.is_empty() {
            return Self::push(nodes, Node::Leaf { size, depth });
        }

        let (feature, min_val, max_val) = candidates[rng.gen_range(0..candidates.len())];

        let threshold = rng.gen_range(min_val..max_val);

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| values[[i, feature]] < threshold);

        // A threshold at the very edge of the range leaves one side empty.
        if left_indices.is_empty() || right_indices.is_empty() {
            return Self::push(nodes, Node::Leaf { size, depth });
        }

        let left = Self::build_node(nodes, values, &left_indices, depth + 1, max_depth, rng);
        let right = Self::build_node(nodes, values, &right_indices, depth + 1, max_depth, rng);

        Self::push(
            nodes,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            },
        )
    }

    /// Estimated path length for one record: traversal depth to its leaf
    /// plus the expected extra depth had partitioning continued on the
    /// leaf's records.
    pub fn path_length(&self, sample: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.nodes[self.root.index()];
        let mut depth = 0usize;
        loop {
            match node {
                Node::Leaf { size, .. } => {
                    return depth as f64 + average_path_length(*size);
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let next = if sample[*feature] < *threshold {
                        left
                    } else {
                        right
                    };
                    node = &self.nodes[next.index()];
                    depth += 1;
                }
            }
        }
    }

    /// Total nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest leaf in the tree.
    pub fn max_leaf_depth(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Leaf { depth, .. } => Some(*depth),
                Node::Split { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }
}

/// Expected path length of an unsuccessful search in a BST of `n` records:
/// `c(n) = 2 * (ln(n-1) + gamma) - 2 * (n-1) / n`, with `c(1) = 0` and
/// `c(2) = 1`. Used both as the leaf correction term and as the score
/// normalizer.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n_f = n as f64;
            2.0 * ((n_f - 1.0).ln() + EULER_GAMMA) - 2.0 * (n_f - 1.0) / n_f
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line_data(n: usize) -> Array2<f64> {
        let flat: Vec<f64> = (0..n).flat_map(|i| [i as f64, (2 * i) as f64]).collect();
        Array2::from_shape_vec((n, 2), flat).unwrap()
    }

    #[test]
    fn test_build_respects_max_depth() {
        let data = line_data(64);
        let indices: Vec<usize> = (0..64).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let tree = IsolationTree::build(data.view(), &indices, 2, 4, &mut rng).unwrap();
        assert!(tree.max_leaf_depth() <= 4);
        assert!(tree.node_count() >= 3);
    }

    #[test]
    fn test_build_rejects_zero_depth() {
        let data = line_data(8);
        let indices: Vec<usize> = (0..8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = IsolationTree::build(data.view(), &indices, 2, 0, &mut rng);
        assert!(matches!(
            result,
            Err(SentinelError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_build_rejects_arity_mismatch() {
        let data = line_data(8);
        let indices: Vec<usize> = (0..8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = IsolationTree::build(data.view(), &indices, 3, 8, &mut rng);
        assert!(matches!(
            result,
            Err(SentinelError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_identical_records_become_single_leaf() {
        let data = array![[3.0, 3.0], [3.0, 3.0], [3.0, 3.0], [3.0, 3.0]];
        let indices: Vec<usize> = (0..4).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let tree = IsolationTree::build(data.view(), &indices, 2, 8, &mut rng).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(matches!(tree.nodes[0], Node::Leaf { size: 4, depth: 0 }));
    }

    #[test]
    fn test_constant_feature_is_skipped() {
        // Second column is constant; every split must use the first.
        let data = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0], [4.0, 7.0]];
        let indices: Vec<usize> = (0..4).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let tree = IsolationTree::build(data.view(), &indices, 2, 8, &mut rng).unwrap();
        for node in &tree.nodes {
            if let Node::Split { feature, .. } = node {
                assert_eq!(*feature, 0);
            }
        }
    }

    #[test]
    fn test_leaf_sizes_positive() {
        let data = line_data(32);
        let indices: Vec<usize> = (0..32).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let tree = IsolationTree::build(data.view(), &indices, 2, 6, &mut rng).unwrap();
        for node in &tree.nodes {
            if let Node::Leaf { size, .. } = node {
                assert!(*size >= 1);
            }
        }
    }

    #[test]
    fn test_path_length_positive() {
        let data = line_data(16);
        let indices: Vec<usize> = (0..16).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let tree = IsolationTree::build(data.view(), &indices, 2, 10, &mut rng).unwrap();
        let sample = array![8.0, 16.0];
        assert!(tree.path_length(sample.view()) > 0.0);
    }

    #[test]
    fn test_average_path_length_values() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);

        // c(256) from the closed form, the usual normalizer.
        let c256 = average_path_length(256);
        assert!(c256 > 10.0 && c256 < 12.0);

        // Monotone in n.
        assert!(average_path_length(100) < average_path_length(1000));
    }
}
