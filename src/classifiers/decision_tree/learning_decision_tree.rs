use crate::classifiers::decision_tree::decision_tree::DecisionTree;
use crate::classifiers::decision_tree::nodes::{Node, NodeId};
use crate::classifiers::decision_tree::test_decision_tree::TestDecisionTree;
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::{ItemCollection, WeightedItemSet};
use std::ops::Deref;
use std::sync::Arc;

/// A tree under construction. Every node placed in it carries the learning
/// items that reached it.
#[derive(Debug, Clone)]
pub struct LearningDecisionTree {
    tree: DecisionTree,
}

impl LearningDecisionTree {
    /// Tree whose root is an open node holding `learning_set`.
    pub fn new(learning_set: WeightedItemSet, goal: &SymbolicAttribute) -> Result<Self> {
        let mut tree = DecisionTree::new(Arc::clone(learning_set.attribute_set()), goal)?;
        let root = tree.root();
        tree.replace(root, Node::learning_open(learning_set))?;
        Ok(LearningDecisionTree { tree })
    }

    /// Like [`DecisionTree::replace`], but only accepts learning nodes.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Result<Node> {
        if !node.is_learning_node() {
            return Err(TreeError::NotALearningNode);
        }
        self.tree.replace(id, node)
    }

    pub fn learning_set(&self, id: NodeId) -> Option<&WeightedItemSet> {
        self.tree.node(id).and_then(Node::learning_set)
    }

    pub(crate) fn take_learning_set(&mut self, id: NodeId) -> Result<WeightedItemSet> {
        self.tree
            .node_mut(id)
            .and_then(Node::take_learning_set)
            .ok_or(TreeError::NotALearningNode)
    }

    /// Copy of the tree without its learning sets.
    pub fn test_decision_tree(&self) -> Result<TestDecisionTree> {
        TestDecisionTree::from_nodes(
            Arc::clone(self.tree.attribute_set()),
            self.tree.goal_attribute(),
            &self.tree.flatten(),
        )
    }
}

impl Deref for LearningDecisionTree {
    type Target = DecisionTree;

    fn deref(&self) -> &DecisionTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::{SymbolicTest, Test};
    use crate::testing::unknown_value_set;

    #[test]
    fn test_root_holds_learning_set() {
        let (_, set, goal) = unknown_value_set();
        let tree = LearningDecisionTree::new(set, &goal).unwrap();
        let root = tree.root();
        assert_eq!(tree.learning_set(root).unwrap().num_of_items(), 5);
        assert_eq!(tree.node(root).unwrap().weight(), 5.0);
        assert_eq!(tree.open_node().unwrap(), root);
    }

    #[test]
    fn test_rejects_plain_nodes() {
        let (_, set, goal) = unknown_value_set();
        let mut tree = LearningDecisionTree::new(set, &goal).unwrap();
        let root = tree.root();
        assert!(matches!(
            tree.replace(root, Node::leaf(5.0, vec![0.6, 0.4], 0.97)),
            Err(TreeError::NotALearningNode)
        ));
    }

    #[test]
    fn test_take_then_replace_with_learning_leaf() {
        let (_, set, goal) = unknown_value_set();
        let mut tree = LearningDecisionTree::new(set, &goal).unwrap();
        let root = tree.root();
        let set = tree.take_learning_set(root).unwrap();
        assert!(tree.take_learning_set(root).is_err());
        tree.replace(root, Node::learning_leaf(set, &goal).unwrap())
            .unwrap();
        assert!(!tree.has_open_node());
    }

    #[test]
    fn test_conversion_drops_learning_sets() {
        let (attrs, set, goal) = unknown_value_set();
        let mut tree = LearningDecisionTree::new(set, &goal).unwrap();
        let root = tree.root();
        let set = tree.take_learning_set(root).unwrap();
        let a = attrs.symbolic_by_name("A").unwrap().clone();
        let test: Test = SymbolicTest::new(a, vec![1]).unwrap().into();
        tree.replace(root, Node::learning_test(set, test, Some(0.3)))
            .unwrap();

        let frozen = tree.test_decision_tree().unwrap();
        assert_eq!(frozen.flatten(), tree.flatten());
        for id in frozen.bf_iterator() {
            assert!(!frozen.node(id).unwrap().is_learning_node());
        }
    }
}
