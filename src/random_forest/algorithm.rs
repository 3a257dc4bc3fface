//! Random forest classification
//!
use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::RandomForestValidParams;
use crate::DecisionTree;
use linfa::{
    dataset::{AsSingleTargets, Labels, Records},
    error::{Error, Result},
    traits::*,
    Dataset, DatasetBase, Float, Label,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A fitted random forest model for classification.
///
/// ### Structure
///
/// A random forest is an ordered collection of decision trees, each trained
/// on its own bootstrap sample of the training set (as many rows as the
/// original data, drawn uniformly with replacement) with every split
/// decision restricted to a random subset of the features. The trees are
/// independent of each other and immutable once the forest is returned.
///
/// ### Predictions
///
/// Every tree in the forest classifies the sample and the label with the
/// highest number of votes wins. Ties are resolved towards the label that
/// reached the winning count first in tree order, so prediction is a pure,
/// deterministic function of the forest and the sample.
///
/// ### Example
///
/// ```rust
/// use linfa_forests::RandomForestParams;
/// use linfa::prelude::*;
///
/// // Load the dataset
/// let dataset = linfa_datasets::iris();
/// // Fit the forest
/// let model = RandomForestParams::new(10)
///     .max_depth(Some(5))
///     .feature_subsample(Some(2))
///     .fit(&dataset)
///     .unwrap();
/// // Get accuracy on training set
/// let accuracy = model.predict(&dataset).confusion_matrix(&dataset).unwrap().accuracy();
///
/// assert!(accuracy > 0.9);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone)]
pub struct RandomForest<F: Float, L: Label> {
    trees: Vec<DecisionTree<F, L>>,
    num_features: usize,
}

impl<F: Float, L: Label> RandomForest<F, L> {
    /// Return the trees of the forest, in training order
    pub fn trees(&self) -> &[DecisionTree<F, L>] {
        &self.trees
    }

    /// Return the number of trees in the forest
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the mean impurity decrease for each feature, averaged over all
    /// trees of the forest
    pub fn feature_importance(&self) -> Vec<F> {
        let mut importance = vec![F::zero(); self.num_features];

        for tree in &self.trees {
            for (total, value) in importance.iter_mut().zip(tree.mean_impurity_decrease()) {
                *total += value;
            }
        }

        let n_trees = F::cast(self.trees.len());
        importance.into_iter().map(|x| x / n_trees).collect()
    }
}

/// Draw a bootstrap sample from the dataset: as many rows as the input,
/// sampled independently and uniformly with replacement.
fn bootstrap<F: Float, L: Label, D: Data<Elem = F>, T: AsSingleTargets<Elem = L>>(
    dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    rng: &mut impl Rng,
) -> Dataset<F, L, Ix1> {
    let n = dataset.nsamples();
    let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

    let records = dataset.records().select(Axis(0), &indices);
    let targets = dataset.as_single_targets().select(Axis(0), &indices);

    Dataset::new(records, targets).with_feature_names(dataset.feature_names())
}

impl<'a, F: Float, L: Label + 'a + std::fmt::Debug, D, T> Fit<ArrayBase<D, Ix2>, T, Error>
    for RandomForestValidParams<F>
where
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = L> + Labels<Elem = L>,
{
    type Object = RandomForest<F, L>;

    /// Fit a random forest on the dataset by training one decision tree per
    /// bootstrap sample. Trees are collected in iteration order so that a
    /// fixed seed reproduces the forest exactly.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        if dataset.nsamples() == 0 {
            return Err(Error::NotEnoughSamples);
        }

        let mut rng = StdRng::seed_from_u64(self.seed());
        let mut trees = Vec::with_capacity(self.n_trees());

        for _ in 0..self.n_trees() {
            let sample = bootstrap(dataset, &mut rng);

            // Each tree gets its own generator seeded from the forest's, so
            // per-tree training stays independent and reproducible
            let tree = DecisionTree::params()
                .split_quality(self.split_quality())
                .max_depth(self.max_depth())
                .min_leaf_accuracy(self.min_leaf_accuracy())
                .min_examples(self.min_examples())
                .feature_subsample(self.feature_subsample())
                .seed(rng.gen())
                .fit(&sample)?;

            trees.push(tree);
        }

        Ok(RandomForest {
            trees,
            num_features: dataset.records().ncols(),
        })
    }
}

impl<F: Float, L: Label + Default, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for RandomForest<F, L>
{
    /// Make predictions for each row of a matrix of features `x` by majority
    /// voting over all trees of the forest.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number the forest was trained with."
        );

        // one ballot per observation, one vote per tree
        let mut ballots: Vec<Vec<L>> = vec![Vec::with_capacity(self.trees.len()); x.nrows()];

        for tree in &self.trees {
            let predictions: Array1<L> = tree.predict(x);
            for (ballot, vote) in ballots.iter_mut().zip(predictions) {
                ballot.push(vote);
            }
        }

        for (target, ballot) in y.iter_mut().zip(ballots.iter()) {
            *target = majority_vote(ballot);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::default(x.nrows())
    }
}

/// Returns the label with the most votes. When two labels tie, the one that
/// occurred first in `votes` wins, so the outcome does not depend on hashing
/// order and repeated calls agree.
///
/// ### Panics
///
/// If `votes` is empty
fn majority_vote<L: Label>(votes: &[L]) -> L {
    let mut counts: Vec<(&L, usize)> = Vec::new();

    for vote in votes {
        match counts.iter_mut().find(|(label, _)| *label == vote) {
            Some((_, count)) => *count += 1,
            None => counts.push((vote, 1)),
        }
    }

    counts
        .iter()
        .fold(None, |best: Option<(&L, usize)>, &(label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label.clone())
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::RandomForestParams;
    use linfa::{error::Result, Dataset, ParamGuard};
    use ndarray::{Array, Array1, Axis, Ix1};

    use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
    use rand::rngs::SmallRng;

    fn synthetic_dataset(n: usize) -> Dataset<f64, usize, Ix1> {
        let mut rng = SmallRng::seed_from_u64(8);

        let data = Array::random_using((n, 5), Uniform::new(-4., 4.), &mut rng);
        let targets = data
            .index_axis(Axis(1), 0)
            .map(|x| usize::from(*x > 0.0));

        Dataset::new(data, targets)
    }

    #[test]
    fn majority_vote_example() {
        assert_eq!(majority_vote(&[1usize, 1, 0]), 1);
        assert_eq!(majority_vote(&[0usize, 0, 1, 1, 1]), 1);
        assert_eq!(majority_vote(&[7usize]), 7);
    }

    #[test]
    /// On a tied ballot the label that appeared first wins, every time
    fn majority_vote_tie_break() {
        assert_eq!(majority_vote(&[1usize, 0, 1, 0]), 1);
        assert_eq!(majority_vote(&[0usize, 1, 0, 1]), 0);

        for _ in 0..10 {
            assert_eq!(majority_vote(&[1usize, 0, 1, 0]), 1);
        }
    }

    #[test]
    /// A bootstrap sample has as many rows and targets as the dataset it was
    /// drawn from
    fn bootstrap_preserves_sample_size() {
        let dataset = synthetic_dataset(20);
        let mut rng = SmallRng::seed_from_u64(42);

        let sample = bootstrap(&dataset, &mut rng);

        assert_eq!(sample.nsamples(), 20);
        assert_eq!(sample.records().ncols(), 5);
        assert_eq!(sample.targets().len(), 20);
    }

    #[test]
    /// The fitted forest holds exactly as many trees as requested
    fn forest_has_requested_tree_count() -> Result<()> {
        let dataset = synthetic_dataset(50);

        for n_trees in &[1, 7] {
            let model = RandomForestParams::new(*n_trees)
                .max_depth(Some(3))
                .fit(&dataset)?;
            assert_eq!(model.num_trees(), *n_trees);
        }

        Ok(())
    }

    #[test]
    /// Two training runs with the same seed produce identical predictions
    fn seeded_training_is_reproducible() -> Result<()> {
        let dataset = synthetic_dataset(80);

        let first = RandomForestParams::new(10)
            .feature_subsample(Some(2))
            .seed(7)
            .fit(&dataset)?;
        let second = RandomForestParams::new(10)
            .feature_subsample(Some(2))
            .seed(7)
            .fit(&dataset)?;

        assert_eq!(
            first.predict(dataset.records()),
            second.predict(dataset.records())
        );

        Ok(())
    }

    #[test]
    /// Forest predictions only ever contain labels seen during training
    fn predictions_drawn_from_training_labels() -> Result<()> {
        let dataset = synthetic_dataset(100);

        let model = RandomForestParams::new(10)
            .feature_subsample(Some(2))
            .fit(&dataset)?;

        let predictions: Array1<usize> = model.predict(dataset.records());
        for prediction in predictions.iter() {
            assert!(*prediction == 0 || *prediction == 1);
        }

        Ok(())
    }

    #[test]
    /// An empty dataset cannot be bootstrapped into anything useful
    fn empty_dataset_fails() {
        let dataset: Dataset<f64, usize, Ix1> =
            Dataset::new(Array::zeros((0, 3)), Array1::from_vec(vec![]));

        let result = RandomForestParams::new(5).fit(&dataset);
        assert!(result.is_err());
    }

    #[test]
    #[should_panic]
    /// Check that a forest without trees panics
    fn panic_zero_trees() {
        RandomForestParams::<f64>::new(0).check().unwrap();
    }
}
