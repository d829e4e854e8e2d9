use crate::classifiers::decision_tree::split_tests::{SplitTest, Test};
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::{ItemCollection, WeightedItemSet};
use strum_macros::{Display, EnumDiscriminants, IntoStaticStr};

/// Index of a node in its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, EnumDiscriminants)]
#[strum_discriminants(name(NodeType))]
#[strum_discriminants(derive(Display, IntoStaticStr))]
#[strum_discriminants(strum(serialize_all = "lowercase"))]
pub enum NodeKind {
    /// Sentinel above the root; its only son is the root.
    Anchor { son: NodeId },
    /// Placeholder still waiting to be expanded.
    Open,
    Leaf {
        distribution: Vec<f64>,
        entropy: f64,
    },
    Test {
        test: Test,
        attribute_index: usize,
        score: Option<f64>,
        sons: Vec<NodeId>,
        has_open_node: bool,
    },
}

/// One slot of the tree arena.
///
/// `weight` is the weight of the training items that reached the node. A
/// learning node also keeps those items.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) father: Option<NodeId>,
    weight: f64,
    pub(crate) kind: NodeKind,
    learning_set: Option<WeightedItemSet>,
}

impl Node {
    fn with_kind(weight: f64, kind: NodeKind) -> Node {
        Node {
            father: None,
            weight,
            kind,
            learning_set: None,
        }
    }

    pub(crate) fn anchor(son: NodeId) -> Node {
        Node::with_kind(0.0, NodeKind::Anchor { son })
    }

    pub fn open(weight: f64) -> Node {
        Node::with_kind(weight, NodeKind::Open)
    }

    pub fn learning_open(learning_set: WeightedItemSet) -> Node {
        Node::open(learning_set.size()).learning(learning_set)
    }

    pub fn leaf(weight: f64, distribution: Vec<f64>, entropy: f64) -> Node {
        Node::with_kind(
            weight,
            NodeKind::Leaf {
                distribution,
                entropy,
            },
        )
    }

    /// Leaf predicting the goal distribution of `learning_set`.
    pub fn learning_leaf(learning_set: WeightedItemSet, goal: &SymbolicAttribute) -> Result<Node> {
        let distribution = learning_set.goal_distribution(goal)?;
        let entropy = learning_set.cal_entropy(goal)?;
        Ok(Node::leaf(learning_set.size(), distribution, entropy).learning(learning_set))
    }

    /// Test node. Its sons are created as open nodes when the node is put
    /// into a tree.
    pub fn test(weight: f64, test: Test, score: Option<f64>) -> Node {
        Node::with_kind(
            weight,
            NodeKind::Test {
                test,
                attribute_index: 0,
                score,
                sons: Vec::new(),
                has_open_node: false,
            },
        )
    }

    pub fn learning_test(learning_set: WeightedItemSet, test: Test, score: Option<f64>) -> Node {
        Node::test(learning_set.size(), test, score).learning(learning_set)
    }

    fn learning(mut self, learning_set: WeightedItemSet) -> Node {
        self.learning_set = Some(learning_set);
        self
    }

    pub fn father(&self) -> Option<NodeId> {
        self.father
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::from(&self.kind)
    }

    /// True for nodes without sons: leaves and open nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. } | NodeKind::Open)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.kind, NodeKind::Open)
    }

    pub fn sons(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Anchor { son } => std::slice::from_ref(son),
            NodeKind::Test { sons, .. } => sons,
            NodeKind::Open | NodeKind::Leaf { .. } => &[],
        }
    }

    pub fn num_of_sons(&self) -> usize {
        self.sons().len()
    }

    pub fn son(&self, issue: usize) -> Result<NodeId> {
        if self.is_leaf() {
            return Err(TreeError::NoSons(self.node_type().into()));
        }
        self.sons()
            .get(issue)
            .copied()
            .ok_or(TreeError::InvalidIssue(issue))
    }

    pub fn test_ref(&self) -> Option<&Test> {
        match &self.kind {
            NodeKind::Test { test, .. } => Some(test),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Test { score, .. } => *score,
            _ => None,
        }
    }

    pub fn distribution(&self) -> Option<&[f64]> {
        match &self.kind {
            NodeKind::Leaf { distribution, .. } => Some(distribution),
            _ => None,
        }
    }

    pub fn entropy(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Leaf { entropy, .. } => Some(*entropy),
            _ => None,
        }
    }

    pub fn is_learning_node(&self) -> bool {
        self.learning_set.is_some()
    }

    pub fn learning_set(&self) -> Option<&WeightedItemSet> {
        self.learning_set.as_ref()
    }

    pub(crate) fn take_learning_set(&mut self) -> Option<WeightedItemSet> {
        self.learning_set.take()
    }

    pub(crate) fn num_of_issues(&self) -> usize {
        match &self.kind {
            NodeKind::Test { test, .. } => test.num_of_issues(),
            NodeKind::Anchor { .. } => 1,
            NodeKind::Open | NodeKind::Leaf { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::NumericalTest;
    use crate::core::attributes::NumericalAttribute;
    use crate::testing::unknown_value_set;

    #[test]
    fn test_node_type_names() {
        assert_eq!(Node::open(0.0).node_type().to_string(), "open");
        assert_eq!(Node::anchor(1).node_type().to_string(), "anchor");
        let name: &'static str = Node::leaf(1.0, vec![1.0], 0.0).node_type().into();
        assert_eq!(name, "leaf");
    }

    #[test]
    fn test_leaf_and_open_have_no_sons() {
        let leaf = Node::leaf(1.0, vec![0.5, 0.5], 1.0);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.num_of_sons(), 0);
        assert!(matches!(leaf.son(0), Err(TreeError::NoSons("leaf"))));
        assert!(matches!(Node::open(0.0).son(0), Err(TreeError::NoSons("open"))));
    }

    #[test]
    fn test_anchor_has_exactly_one_son() {
        let anchor = Node::anchor(7);
        assert!(!anchor.is_leaf());
        assert_eq!(anchor.son(0).unwrap(), 7);
        assert!(matches!(anchor.son(1), Err(TreeError::InvalidIssue(1))));
    }

    #[test]
    fn test_learning_leaf_distribution() {
        let (_, set, goal) = unknown_value_set();
        let leaf = Node::learning_leaf(set, &goal).unwrap();
        assert!(leaf.is_learning_node());
        assert_eq!(leaf.weight(), 5.0);
        let dist = leaf.distribution().unwrap();
        assert!((dist[0] - 0.6).abs() < 1e-12);
        assert!((dist[1] - 0.4).abs() < 1e-12);
        assert!(leaf.entropy().unwrap() > 0.9);
    }

    #[test]
    fn test_test_node_accessors() {
        let test: Test = NumericalTest::new(NumericalAttribute::new("x"), 1.0).into();
        let node = Node::test(3.0, test.clone(), Some(0.5));
        assert_eq!(node.test_ref(), Some(&test));
        assert_eq!(node.score(), Some(0.5));
        assert_eq!(node.num_of_issues(), 2);
        assert!(!node.is_learning_node());
    }
}
