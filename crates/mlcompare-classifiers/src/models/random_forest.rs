//! Random forest classifier.
//!
//! Bagging of CART trees: every tree is grown on a bootstrap sample of the
//! training rows, considers a random subset of `floor(sqrt(n_features))`
//! features at each split and splits on Gini impurity. The forest predicts
//! the class with the highest mean leaf probability over all trees.
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{ClassifierError, Result};
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{argmax, check_fit_inputs, check_predict_inputs};

/// Seed used when none is configured.
pub const DEFAULT_RANDOM_STATE: u64 = 1234;

/// A single decision tree node
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        proba: Vec<f64>,
    },
    Internal {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict_proba(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        match self {
            TreeNode::Leaf { proba } => proba,
            TreeNode::Internal {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if sample[*feature_idx] <= *threshold {
                    left.predict_proba(sample)
                } else {
                    right.predict_proba(sample)
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A single classification tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: TreeNode,
    max_depth: usize,
    max_features: usize,
    n_classes: usize,
}

impl DecisionTree {
    pub fn new(max_depth: usize, max_features: usize, n_classes: usize) -> Self {
        Self {
            root: TreeNode::Leaf {
                proba: vec![0.0; n_classes],
            },
            max_depth,
            max_features,
            n_classes,
        }
    }

    /// Grow the tree on the rows listed in `indices` (duplicates allowed).
    pub fn train(
        &mut self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, usize>,
        indices: &[usize],
        rng: &mut impl Rng,
    ) {
        self.root = self.build_tree(x, y, indices, 0, rng);
    }

    pub fn predict_proba(&self, sample: ArrayView1<'_, f64>) -> &[f64] {
        self.root.predict_proba(sample)
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn class_counts(&self, y: &ArrayView1<'_, usize>, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[y[i]] += 1;
        }
        counts
    }

    fn leaf(&self, counts: &[usize]) -> TreeNode {
        let total: usize = counts.iter().sum();
        let proba = counts
            .iter()
            .map(|&c| if total > 0 { c as f64 / total as f64 } else { 0.0 })
            .collect();
        TreeNode::Leaf { proba }
    }

    fn build_tree(
        &self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, usize>,
        indices: &[usize],
        depth: usize,
        rng: &mut impl Rng,
    ) -> TreeNode {
        let counts = self.class_counts(y, indices);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        // Base cases: max depth, too few samples or a pure node
        if depth >= self.max_depth || indices.len() < 2 || is_pure {
            return self.leaf(&counts);
        }

        let Some((feature_idx, threshold)) = self.find_best_split(x, y, indices, &counts, rng) else {
            return self.leaf(&counts);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[(i, feature_idx)] <= threshold);

        let left = Box::new(self.build_tree(x, y, &left_indices, depth + 1, rng));
        let right = Box::new(self.build_tree(x, y, &right_indices, depth + 1, rng));

        TreeNode::Internal {
            feature_idx,
            threshold,
            left,
            right,
        }
    }

    /// Best (feature, threshold) among a random subset of features, or
    /// `None` when no split lowers the weighted Gini impurity.
    fn find_best_split(
        &self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, usize>,
        indices: &[usize],
        parent_counts: &[usize],
        rng: &mut impl Rng,
    ) -> Option<(usize, f64)> {
        let n = indices.len();
        let mut features: Vec<usize> = (0..x.ncols()).collect();
        features.shuffle(rng);

        let mut best: Option<(usize, f64)> = None;
        let mut best_score = weighted_gini(parent_counts, n);

        for &feature_idx in features.iter().take(self.max_features) {
            let mut column: Vec<(f64, usize)> =
                indices.iter().map(|&i| (x[(i, feature_idx)], y[i])).collect();
            column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_counts = vec![0usize; self.n_classes];
            let mut right_counts = parent_counts.to_vec();

            for i in 0..n - 1 {
                let (value, label) = column[i];
                left_counts[label] += 1;
                right_counts[label] -= 1;

                let next_value = column[i + 1].0;
                if value >= next_value {
                    continue;
                }

                let n_left = i + 1;
                let score = weighted_gini(&left_counts, n_left) + weighted_gini(&right_counts, n - n_left);
                if score < best_score - 1e-12 {
                    best_score = score;
                    let mut threshold = (value + next_value) / 2.0;
                    if threshold >= next_value {
                        threshold = value;
                    }
                    best = Some((feature_idx, threshold));
                }
            }
        }

        best
    }
}

/// Gini impurity multiplied by the node size.
fn weighted_gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let sum_sq: f64 = counts.iter().map(|&c| (c as f64) * (c as f64)).sum();
    n - sum_sq / n
}

/// RandomForest ensemble
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_estimators: usize,
    max_depth: usize,
    random_state: u64,
    n_features: usize,
    n_classes: usize,
}

impl RandomForestClassifier {
    pub fn new(n_estimators: usize, max_depth: usize) -> Self {
        Self {
            trees: Vec::with_capacity(n_estimators),
            n_estimators,
            max_depth,
            random_state: DEFAULT_RANDOM_STATE,
            n_features: 0,
            n_classes: 0,
        }
    }

    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean class probabilities over all trees, one row per sample.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Vec<Vec<f64>>> {
        if self.trees.is_empty() {
            return Err(ClassifierError::NotFitted);
        }
        check_predict_inputs(self.n_features, &x)?;

        let n_trees = self.trees.len() as f64;
        Ok(x.outer_iter()
            .map(|sample| {
                let mut mean = vec![0.0; self.n_classes];
                for tree in &self.trees {
                    for (m, p) in mean.iter_mut().zip(tree.predict_proba(sample.view())) {
                        *m += p;
                    }
                }
                mean.iter_mut().for_each(|m| *m /= n_trees);
                mean
            })
            .collect())
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> Result<()> {
        check_fit_inputs(&x, &y)?;

        let n_samples = x.nrows();
        self.n_features = x.ncols();
        self.n_classes = y.iter().max().map_or(0, |&m| m + 1);
        let max_features = ((self.n_features as f64).sqrt().floor() as usize).max(1);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.random_state);
        self.trees.clear();

        for i in 0..self.n_estimators {
            // Bootstrap sample
            let bootstrap: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

            let mut tree = DecisionTree::new(self.max_depth, max_features, self.n_classes);
            tree.train(&x, &y, &bootstrap, &mut rng);
            self.trees.push(tree);

            if (i + 1) % 10 == 0 {
                log::trace!("Trained {}/{} trees", i + 1, self.n_estimators);
            }
        }

        log::debug!(
            "Random forest fitted: {} trees, max_depth = {}, {} features per split, random_state = {}",
            self.trees.len(),
            self.max_depth,
            max_features,
            self.random_state
        );
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.iter().map(|p| argmax(p)).collect())
    }

    fn name(&self) -> &str {
        "RANDOM FOREST"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn two_blobs() -> (Array2<f64>, Array1<usize>) {
        let x = array![
            [1.0, 0.0, 0.3],
            [1.2, 0.1, 0.2],
            [0.9, 0.2, 0.1],
            [1.1, 0.0, 0.4],
            [1.0, 0.3, 0.2],
            [-1.0, 2.0, 0.3],
            [-1.1, 2.1, 0.1],
            [-0.9, 1.9, 0.2],
            [-1.2, 2.2, 0.4],
            [-1.0, 2.3, 0.1]
        ];
        let y = array![0usize, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_random_forest_classifier() {
        let (x, y) = two_blobs();
        let mut rf = RandomForestClassifier::new(25, 3);
        rf.fit(x.view(), y.view()).unwrap();
        assert_eq!(rf.n_trees(), 25);

        let pred = rf.predict(x.view()).unwrap();
        assert_eq!(pred, y);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = two_blobs();
        let probe = array![[0.0, 1.0, 0.25], [0.5, 0.5, 0.3]];

        let mut a = RandomForestClassifier::new(5, 2).with_random_state(7);
        let mut b = RandomForestClassifier::new(5, 2).with_random_state(7);
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();
        assert_eq!(
            a.predict_proba(probe.view()).unwrap(),
            b.predict_proba(probe.view()).unwrap()
        );
    }

    #[test]
    fn test_trees_respect_max_depth() {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
        let y: Array1<usize> = (0..40).map(|i| i % 3).collect();
        let mut rf = RandomForestClassifier::new(4, 2);
        rf.fit(x.view(), y.view()).unwrap();
        assert!(rf.trees().iter().all(|t| t.depth() <= 2));
    }

    #[test]
    fn test_features_per_split_rounds_down() {
        for (n_features, expected) in [(4, 2), (13, 3), (30, 5), (1, 1), (3, 1)] {
            let x = Array2::from_shape_fn((12, n_features), |(i, j)| ((i * 5 + j) % 7) as f64);
            let y: Array1<usize> = (0..12).map(|i| i % 2).collect();
            let mut rf = RandomForestClassifier::new(2, 3);
            rf.fit(x.view(), y.view()).unwrap();
            assert!(
                rf.trees().iter().all(|t| t.max_features() == expected),
                "{} features",
                n_features
            );
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = two_blobs();
        let mut rf = RandomForestClassifier::new(3, 1);
        rf.fit(x.view(), y.view()).unwrap();
        for row in rf.predict_proba(x.view()).unwrap() {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "row sums to {}", total);
        }
    }

    #[test]
    fn test_weighted_gini() {
        assert_eq!(weighted_gini(&[4, 0], 4), 0.0);
        assert!((weighted_gini(&[2, 2], 4) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_before_fit() {
        let rf = RandomForestClassifier::new(2, 2);
        assert!(matches!(
            rf.predict(array![[0.0]].view()),
            Err(ClassifierError::NotFitted)
        ));
    }
}
