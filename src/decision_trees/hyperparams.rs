use linfa::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::DecisionTree;

/// The metric used to determine the feature by which a node is split
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub enum SplitQuality {
    /// Measures the degree of probability of a randomly chosen point in the subtree being misclassified, defined as
    /// one minus the sum over all labels of the squared probability of encountering that label.
    /// The Gini index of the root is given by the weighted sum of the indexes of its two subtrees.
    /// At each step the split is applied to the feature which decreases the most the Gini impurity of the root.
    Gini,
    /// Measures the entropy of a subtree, defined as the sum over all labels of the probability of encountering that label in the
    /// subtree times its logarithm in base two, with negative sign. The entropy of the root minus the weighted sum of the entropy
    /// of its two subtrees defines the "information gain" obtained by applying the split. At each step the split is applied to the
    /// feature with the biggest information gain
    Entropy,
}

/// The set of hyperparameters that can be specified for fitting a
/// [decision tree](struct.DecisionTree.html).
///
/// ### Example
///
/// ```rust
/// use linfa_forests::{DecisionTree, SplitQuality};
/// use linfa_datasets::iris;
/// use linfa::prelude::*;
///
/// // Initialize the default set of parameters
/// let params = DecisionTree::params();
/// // Set the parameters to the desired values
/// let params = params.split_quality(SplitQuality::Gini).max_depth(Some(5)).min_examples(2);
///
/// // Load the data
/// let (train, val) = linfa_datasets::iris().split_with_ratio(0.9);
/// // Fit the decision tree on the training data
/// let tree = params.fit(&train).unwrap();
/// // Predict on validation and check accuracy
/// let val_accuracy = tree.predict(&val).confusion_matrix(&val).unwrap().accuracy();
/// assert!(val_accuracy > 0.9);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug)]
pub struct DecisionTreeValidParams<F, L> {
    split_quality: SplitQuality,
    max_depth: Option<usize>,
    min_leaf_accuracy: f32,
    min_examples: usize,
    feature_subsample: Option<usize>,
    seed: u64,

    float_marker: PhantomData<F>,
    label_marker: PhantomData<L>,
}

impl<F: Float, L> DecisionTreeValidParams<F, L> {
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
pub struct DecisionTreeParams<F, L>(DecisionTreeValidParams<F, L>);

impl<F: Float, L: Label> DecisionTreeParams<F, L> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            split_quality: SplitQuality::Entropy,
            max_depth: None,
            min_leaf_accuracy: 1.0,
            min_examples: 0,
            feature_subsample: None,
            seed: 42,
            float_marker: PhantomData,
            label_marker: PhantomData,
        })
    }

    /// Sets the metric used to decide the feature on which to split a node
    pub fn split_quality(mut self, split_quality: SplitQuality) -> Self {
        self.0.split_quality = split_quality;
        self
    }

    /// Sets the optional limit to the depth of the decision tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the fraction of observations in a node that must belong to the
    /// modal class for the node to be turned into a leaf.
    ///
    /// With the default of `1.0` a node only stops splitting once it is pure.
    pub fn min_leaf_accuracy(mut self, min_leaf_accuracy: f32) -> Self {
        self.0.min_leaf_accuracy = min_leaf_accuracy;
        self
    }

    /// Sets the number of observations at or below which a node is turned
    /// into a leaf without further splitting.
    pub fn min_examples(mut self, min_examples: usize) -> Self {
        self.0.min_examples = min_examples;
        self
    }

    /// Sets the number of features considered at each split decision.
    ///
    /// Every split draws a fresh uniform random subset of this many features
    /// and only searches those for the best threshold. `None` considers all
    /// features, which recovers a plain CART tree.
    pub fn feature_subsample(mut self, feature_subsample: Option<usize>) -> Self {
        self.0.feature_subsample = feature_subsample;
        self
    }

    /// Sets the seed of the generator used for feature subsampling
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float, L: Label> Default for DecisionTreeParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `split_quality = SplitQuality::Entropy`
    /// * `max_depth = None`
    /// * `min_leaf_accuracy = 1.0`
    /// * `min_examples = 0`
    /// * `feature_subsample = None`
    /// * `seed = 42`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F, L> {
        DecisionTreeParams::new()
    }
}

impl<F: Float, L> ParamGuard for DecisionTreeParams<F, L> {
    type Checked = DecisionTreeValidParams<F, L>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if !(0.0..=1.0).contains(&self.0.min_leaf_accuracy) {
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
