use linfa::{
    error::{Error, Result},
    Float, ParamGuard,
};
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::SplitQuality;

/// The set of hyperparameters that can be specified for fitting a
/// [random forest](struct.RandomForest.html).
///
/// The tree-level parameters (`split_quality`, `max_depth`,
/// `min_leaf_accuracy`, `min_examples`, `feature_subsample`) are handed down
/// unchanged to every tree trained for the ensemble.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub struct RandomForestValidParams<F> {
    n_trees: usize,
    split_quality: SplitQuality,
    max_depth: Option<usize>,
    min_leaf_accuracy: f32,
    min_examples: usize,
    feature_subsample: Option<usize>,
    seed: u64,

    float_marker: PhantomData<F>,
}

impl<F: Float> RandomForestValidParams<F> {
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    pub fn split_quality(&self) -> SplitQuality {
        self.split_quality
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_leaf_accuracy(&self) -> f32 {
        self.min_leaf_accuracy
    }

    pub fn min_examples(&self) -> usize {
        self.min_examples
    }

    pub fn feature_subsample(&self) -> Option<usize> {
        self.feature_subsample
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub struct RandomForestParams<F>(RandomForestValidParams<F>);

impl<F: Float> RandomForestParams<F> {
    /// Creates the parameter set for a forest of `n_trees` trees, with
    /// the following defaults for the remaining parameters:
    /// * `split_quality = SplitQuality::Entropy`
    /// * `max_depth = None`
    /// * `min_leaf_accuracy = 1.0`
    /// * `min_examples = 0`
    /// * `feature_subsample = None`
    /// * `seed = 42`
    pub fn new(n_trees: usize) -> Self {
        Self(RandomForestValidParams {
            n_trees,
            split_quality: SplitQuality::Entropy,
            max_depth: None,
            min_leaf_accuracy: 1.0,
            min_examples: 0,
            feature_subsample: None,
            seed: 42,
            float_marker: PhantomData,
        })
    }

    /// Sets the metric used to decide the feature on which to split a node
    pub fn split_quality(mut self, split_quality: SplitQuality) -> Self {
        self.0.split_quality = split_quality;
        self
    }

    /// Sets the optional limit to the depth of each tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the fraction of observations in a node that must belong to the
    /// modal class for the node to be turned into a leaf
    pub fn min_leaf_accuracy(mut self, min_leaf_accuracy: f32) -> Self {
        self.0.min_leaf_accuracy = min_leaf_accuracy;
        self
    }

    /// Sets the number of observations at or below which a node is turned
    /// into a leaf without further splitting
    pub fn min_examples(mut self, min_examples: usize) -> Self {
        self.0.min_examples = min_examples;
        self
    }

    /// Sets the number of features considered at each split decision inside
    /// every tree. `None` considers all features, which reduces the forest
    /// to plain bagging.
    pub fn feature_subsample(mut self, feature_subsample: Option<usize>) -> Self {
        self.0.feature_subsample = feature_subsample;
        self
    }

    /// Sets the seed of the generator driving bootstrap sampling. Every tree
    /// additionally receives its own generator seeded from this one, so a
    /// fixed seed reproduces the whole training run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float> ParamGuard for RandomForestParams<F> {
    type Checked = RandomForestValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_trees == 0 {
            Err(Error::Parameters(
                "The number of trees in the forest should be greater than zero".to_string(),
            ))
        } else if !(0.0..=1.0).contains(&self.0.min_leaf_accuracy) {
            Err(Error::Parameters(format!(
                "Minimum leaf accuracy should lie in [0, 1], but was {}",
                self.0.min_leaf_accuracy
            )))
        } else if self.0.max_depth == Some(0) {
            Err(Error::Parameters(
                "Maximum tree depth should be greater than zero".to_string(),
            ))
        } else if self.0.feature_subsample == Some(0) {
            Err(Error::Parameters(
                "Number of features per split should be greater than zero".to_string(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
