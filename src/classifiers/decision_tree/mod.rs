pub mod decision_tree;
pub mod learning_decision_tree;
pub mod model_document;
pub mod node_record;
pub mod nodes;
pub mod simple_decision_tree_builder;
pub mod split_criteria;
pub(crate) mod split_search;
pub mod split_tests;
pub mod test_decision_tree;

pub use decision_tree::{ANCHOR, DecisionTree, TreeStats};
pub use learning_decision_tree::LearningDecisionTree;
pub use model_document::{ModelDocument, ModelMetadata};
pub use node_record::NodeRecord;
pub use simple_decision_tree_builder::SimpleDecisionTreeBuilder;
pub use test_decision_tree::TestDecisionTree;
