//! Bagged CART regression trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{CostModel, Dataset, Features, MlError, FEATURE_NAMES};

const N_FEATURES: usize = FEATURE_NAMES.len();

/// A node of a regression tree. Samples with `x[feature] <= threshold` go left.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Leaf {
        value: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Leaves have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn predict(&self, x: &Features) -> f64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { value, .. } => return *value,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => node = if x[*feature] <= *threshold { left } else { right },
            }
        }
    }
}

/// Random forest regressor: every tree is fit on a bootstrap resample and
/// predictions are averaged. All features are considered at every split.
#[derive(Clone, Debug)]
pub struct RandomForest {
    n_trees: usize,
    max_depth: Option<usize>,
    min_samples_leaf: usize,
    seed: u64,
    trees: Vec<TreeNode>,
    // Total squared-error reduction per feature.
    importance: [f64; N_FEATURES],
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_trees: usize) -> Self {
        Self {
            n_trees,
            max_depth: None,
            min_samples_leaf: 1,
            seed: 42,
            trees: Vec::new(),
            importance: [0.0; N_FEATURES],
        }
    }

    /// Root has depth 0.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Tree `i` resamples with seed `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }

    /// Share of the total squared-error reduction per feature, in
    /// `FEATURE_NAMES` order. `None` until trained.
    pub fn feature_importances(&self) -> Option<[f64; N_FEATURES]> {
        if self.trees.is_empty() {
            return None;
        }
        let total: f64 = self.importance.iter().sum();
        Some(if total > 0.0 {
            self.importance.map(|v| v / total)
        } else {
            [0.0; N_FEATURES]
        })
    }
}

impl CostModel for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn train(&mut self, data: &Dataset) -> Result<(), MlError> {
        if self.n_trees == 0 {
            return Err(MlError::invalid("n_trees must be > 0"));
        }
        if data.is_empty() {
            return Err(MlError::EmptyDataset);
        }
        let n = data.len();
        let mut builder = TreeBuilder {
            data,
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            importance: [0.0; N_FEATURES],
        };
        let seed = self.seed;
        self.trees = (0..self.n_trees)
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                let mut idx: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                builder.build(&mut idx, 0)
            })
            .collect();
        self.importance = builder.importance;
        Ok(())
    }

    fn predict(&self, x: &Features) -> Result<f64, MlError> {
        if self.trees.is_empty() {
            return Err(MlError::NotTrained { model: self.name() });
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

struct TreeBuilder<'d> {
    data: &'d Dataset,
    max_depth: Option<usize>,
    min_samples_leaf: usize,
    importance: [f64; N_FEATURES],
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
    n_left: usize,
}

impl TreeBuilder<'_> {
    fn build(&mut self, idx: &mut [usize], depth: usize) -> TreeNode {
        let n = idx.len();
        let (sum, sum_sq) = idx.iter().fold((0.0, 0.0), |(s, q), &i| {
            let y = self.data.targets[i];
            (s + y, q + y * y)
        });
        let value = sum / n as f64;
        let sse = (sum_sq - sum * sum / n as f64).max(0.0);
        let leaf = TreeNode::Leaf { value, samples: n };

        if n < 2 * self.min_samples_leaf
            || self.max_depth.is_some_and(|d| depth >= d)
            || sse < 1e-10
        {
            return leaf;
        }
        let Some(best) = self.best_split(idx) else {
            return leaf;
        };
        let gain = sse - best.sse;
        if gain <= 0.0 {
            return leaf;
        }
        self.importance[best.feature] += gain;

        // First `n_left` rows on the winning feature lie below the threshold.
        let x = &self.data.features;
        idx.sort_by(|&a, &b| x[a][best.feature].total_cmp(&x[b][best.feature]));
        let (left, right) = idx.split_at_mut(best.n_left);
        TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.build(left, depth + 1)),
            right: Box::new(self.build(right, depth + 1)),
        }
    }

    /// Minimum-SSE split over all features via one sorted sweep per feature.
    fn best_split(&self, idx: &mut [usize]) -> Option<BestSplit> {
        let x = &self.data.features;
        let y = &self.data.targets;
        let n = idx.len();
        let (total, total_sq) = idx
            .iter()
            .fold((0.0, 0.0), |(s, q), &i| (s + y[i], q + y[i] * y[i]));
        let mut best: Option<BestSplit> = None;

        for feature in 0..N_FEATURES {
            idx.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
            let (mut left, mut left_sq) = (0.0, 0.0);
            for k in 1..n {
                let prev = idx[k - 1];
                left += y[prev];
                left_sq += y[prev] * y[prev];
                let (lo, hi) = (x[prev][feature], x[idx[k]][feature]);
                if lo == hi || k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                    continue;
                }
                let (nl, nr) = (k as f64, (n - k) as f64);
                let right = total - left;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left * left / nl) + (right_sq - right * right / nr);
                if best.as_ref().map_or(true, |b| sse < b.sse) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (lo + hi) / 2.0,
                        sse,
                        n_left: k,
                    });
                }
            }
        }
        best
    }
}
