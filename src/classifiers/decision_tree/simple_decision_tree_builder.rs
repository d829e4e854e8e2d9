use crate::classifiers::decision_tree::learning_decision_tree::LearningDecisionTree;
use crate::classifiers::decision_tree::model_document::ModelMetadata;
use crate::classifiers::decision_tree::nodes::{Node, NodeId};
use crate::classifiers::decision_tree::split_tests::Test;
use crate::classifiers::decision_tree::test_decision_tree::TestDecisionTree;
use crate::config::TrainConfig;
use crate::core::attribute_set::AttributeSet;
use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use crate::core::items::{ItemCollection, WeightedItemSet};
use chrono::{SecondsFormat, Utc};
use log::{debug, info};

enum Expansion {
    Leaf(&'static str),
    Split(Test, f64, Vec<WeightedItemSet>),
}

/// Greedy top-down builder: repeatedly takes the first open node and turns
/// it into a leaf or into a test on the candidate attribute with the best
/// information gain.
///
/// A node becomes a leaf when its goal entropy is at most the entropy
/// threshold, when there is nothing to test, or when the best absolute gain
/// (gain times node weight) is at most the score threshold.
pub struct SimpleDecisionTreeBuilder {
    tree: LearningDecisionTree,
    test_attributes: AttributeSet,
    goal_attribute: SymbolicAttribute,
    entropy_threshold: f64,
    score_threshold: f64,
}

impl SimpleDecisionTreeBuilder {
    pub fn new(
        learning_set: WeightedItemSet,
        test_attributes: AttributeSet,
        goal: &SymbolicAttribute,
    ) -> Result<SimpleDecisionTreeBuilder> {
        if learning_set.is_empty() {
            return Err(TreeError::EmptyLearningSet);
        }
        let attribute_set = learning_set.attribute_set();
        let goal_attribute = attribute_set.symbolic_by_name(goal.name())?.clone();
        let goal_as_attribute = Attribute::from(goal_attribute.clone());
        for attr in test_attributes.iter() {
            attribute_set.require_index(attr)?;
            if *attr == goal_as_attribute {
                return Err(TreeError::InvalidInput(format!(
                    "goal attribute '{}' cannot also be a test attribute",
                    goal_attribute.name()
                )));
            }
        }

        info!(
            "building tree for '{}' from {} items (weight {:.3}) over {} candidate attributes",
            goal_attribute.name(),
            learning_set.num_of_items(),
            learning_set.size(),
            test_attributes.size()
        );
        let tree = LearningDecisionTree::new(learning_set, &goal_attribute)?;
        Ok(SimpleDecisionTreeBuilder {
            tree,
            test_attributes,
            goal_attribute,
            entropy_threshold: 0.0,
            score_threshold: 0.0,
        })
    }

    pub fn with_config(mut self, config: &TrainConfig) -> Result<SimpleDecisionTreeBuilder> {
        self.set_entropy_threshold(config.entropy_threshold)?;
        self.set_score_threshold(config.score_threshold)?;
        Ok(self)
    }

    pub fn entropy_threshold(&self) -> f64 {
        self.entropy_threshold
    }

    pub fn set_entropy_threshold(&mut self, value: f64) -> Result<()> {
        self.entropy_threshold = non_negative("entropy_threshold", value)?;
        Ok(())
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    pub fn set_score_threshold(&mut self, value: f64) -> Result<()> {
        self.score_threshold = non_negative("score_threshold", value)?;
        Ok(())
    }

    pub fn tree(&self) -> &LearningDecisionTree {
        &self.tree
    }

    /// Expands the first open node.
    pub fn expand(&mut self) -> Result<()> {
        let id = self.tree.open_node()?;
        let expansion = self.choose_expansion(id)?;
        let learning_set = self.tree.take_learning_set(id)?;
        match expansion {
            Expansion::Leaf(reason) => {
                debug!(
                    "node {id}: leaf ({reason}), weight {:.3}",
                    learning_set.size()
                );
                self.make_leaf_node(id, learning_set)
            }
            Expansion::Split(test, score, subsets) => {
                debug!("node {id}: test {test} scoring {score:.6}");
                self.make_test_node(id, learning_set, test, score, subsets)
            }
        }
    }

    fn choose_expansion(&self, id: NodeId) -> Result<Expansion> {
        let set = self
            .tree
            .learning_set(id)
            .ok_or(TreeError::NotALearningNode)?;
        let entropy = set.cal_entropy(&self.goal_attribute)?;
        if entropy <= self.entropy_threshold {
            return Ok(Expansion::Leaf("entropy below threshold"));
        }
        if self.test_attributes.is_empty() {
            return Ok(Expansion::Leaf("no test attribute"));
        }

        let best = set.best_split_test(&self.test_attributes, &self.goal_attribute)?;
        let score = best.score() * set.size();
        if score <= self.score_threshold {
            return Ok(Expansion::Leaf("score below threshold"));
        }

        // A son holding every item would face the same set and the same test.
        let test = best.into_test();
        let subsets = set.split(&test)?;
        if subsets
            .iter()
            .any(|subset| subset.num_of_items() == set.num_of_items())
        {
            return Ok(Expansion::Leaf("test does not separate items"));
        }
        Ok(Expansion::Split(test, score, subsets))
    }

    fn make_leaf_node(&mut self, id: NodeId, learning_set: WeightedItemSet) -> Result<()> {
        let leaf = Node::learning_leaf(learning_set, &self.goal_attribute)?;
        self.tree.replace(id, leaf)?;
        Ok(())
    }

    fn make_test_node(
        &mut self,
        id: NodeId,
        learning_set: WeightedItemSet,
        test: Test,
        score: f64,
        subsets: Vec<WeightedItemSet>,
    ) -> Result<()> {
        self.tree
            .replace(id, Node::learning_test(learning_set, test, Some(score)))?;
        for (issue, subset) in subsets.into_iter().enumerate() {
            let son = self.tree.son(id, issue)?;
            self.tree.replace(son, Node::learning_open(subset))?;
        }
        Ok(())
    }

    /// Expands until no open node is left.
    pub fn build(mut self) -> Result<LearningDecisionTree> {
        while self.tree.has_open_node() {
            self.expand()?;
        }
        let stats = self.tree.stats();
        info!(
            "tree built: {} nodes ({} tests, {} leaves), depth {}",
            stats.nodes, stats.tests, stats.leaves, stats.depth
        );
        Ok(self.tree)
    }

    /// Builds, then freezes the tree into a classification-only model that
    /// records how it was trained.
    pub fn build_model(self) -> Result<TestDecisionTree> {
        let metadata = ModelMetadata {
            trained_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            entropy_threshold: Some(self.entropy_threshold),
            score_threshold: Some(self.score_threshold),
            training_weight: self.tree.node(self.tree.root()).map(Node::weight),
        };
        let tree = self.build()?;
        Ok(tree.test_decision_tree()?.with_metadata(metadata))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() || value < 0.0 {
        return Err(TreeError::NegativeThreshold { name, value });
    }
    Ok(value)
}
