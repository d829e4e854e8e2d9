//! Entropy-driven decision tree induction.
//!
//! Trees are grown top-down by [`SimpleDecisionTreeBuilder`] from a
//! [`WeightedItemSet`], frozen into a [`TestDecisionTree`] and saved as a
//! JSON node array.

pub mod classifiers;
pub mod config;
pub mod core;
pub mod evaluation;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use classifiers::Classifier;
pub use classifiers::decision_tree::{
    DecisionTree, LearningDecisionTree, SimpleDecisionTreeBuilder, TestDecisionTree,
};
pub use config::TrainConfig;
pub use crate::core::error::{Result, TreeError};
pub use crate::core::items::{Item, ItemSet, WeightedItemSet};
