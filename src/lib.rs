//!
//! # Random forest learning
//! `linfa-forests` provides a pure Rust implementation of random forest
//! classification on top of its own decision tree learner.
//!
//! # The big picture
//!
//! `linfa-forests` is a crate in the [linfa](https://github.com/rust-ml/linfa) ecosystem,
//! an effort to create a toolkit for classical Machine Learning implemented in pure Rust, akin to Python's scikit-learn.
//!
//! A random forest is an ensemble of decision trees in which every tree is trained on a
//! bootstrap sample of the training set and every split decision only considers a random
//! subset of the features. Predictions are made by majority vote over the trees, which
//! typically generalizes much better than any single tree.
//!
//! # Current state
//!
//! `linfa-forests` provides a [decision tree](DecisionTree) classifier with configurable
//! stopping criteria and per-split feature subsampling, and a [random forest](RandomForest)
//! classifier built from it via bootstrap aggregation.
//!
//! Both models are fitted through the standard `linfa` traits, see
//! [`RandomForestParams`](RandomForestParams) for the forest-level configuration.
//!

mod decision_trees;
mod random_forest;

pub use decision_trees::*;
pub use random_forest::*;

// Re-export the common Result alias for convenience
pub use linfa::error::Result;
