use crate::classifiers::decision_tree::nodes::{Node, NodeKind};
use crate::classifiers::decision_tree::split_tests::{SplitTest, Test};
use crate::core::attribute_set::AttributeSet;
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Flat, pointer-free form of one node, as stored in a breadth-first array.
///
/// A test record only says how many sons follow; they are found later in the
/// array, in issue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeRecord {
    Anchor,
    Open {
        weight: f64,
    },
    Leaf {
        weight: f64,
        distribution: Vec<f64>,
        entropy: f64,
    },
    Test {
        weight: f64,
        sons: usize,
        test: Test,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
}

impl NodeRecord {
    pub fn num_of_sons(&self) -> usize {
        match self {
            NodeRecord::Test { sons, .. } => *sons,
            NodeRecord::Anchor => 1,
            NodeRecord::Open { .. } | NodeRecord::Leaf { .. } => 0,
        }
    }

    /// Node for a non-anchor record. Test sons are wired by the caller.
    pub(crate) fn to_node(
        &self,
        attribute_set: &AttributeSet,
        goal: &SymbolicAttribute,
    ) -> Result<Node> {
        match self {
            NodeRecord::Anchor => Err(TreeError::MalformedNodeArray(
                "anchor record below the root".into(),
            )),
            NodeRecord::Open { weight } => Ok(Node::open(*weight)),
            NodeRecord::Leaf {
                weight,
                distribution,
                entropy,
            } => {
                if distribution.len() != goal.num_of_values() {
                    return Err(TreeError::MalformedNodeArray(format!(
                        "leaf distribution has {} entries, goal '{}' has {} values",
                        distribution.len(),
                        goal.name(),
                        goal.num_of_values()
                    )));
                }
                Ok(Node::leaf(*weight, distribution.clone(), *entropy))
            }
            NodeRecord::Test {
                weight,
                sons,
                test,
                score,
            } => {
                if *sons != test.num_of_issues() {
                    return Err(TreeError::MalformedNodeArray(format!(
                        "test on '{}' declares {sons} sons for {} issues",
                        test.attribute_name(),
                        test.num_of_issues()
                    )));
                }
                let index = attribute_set.require_name(test.attribute_name())?;
                let mut node = Node::test(*weight, test.clone(), *score);
                if let NodeKind::Test {
                    attribute_index, ..
                } = &mut node.kind
                {
                    *attribute_index = index;
                }
                Ok(node)
            }
        }
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        match node.kind() {
            NodeKind::Anchor { .. } => NodeRecord::Anchor,
            NodeKind::Open => NodeRecord::Open {
                weight: node.weight(),
            },
            NodeKind::Leaf {
                distribution,
                entropy,
            } => NodeRecord::Leaf {
                weight: node.weight(),
                distribution: distribution.clone(),
                entropy: *entropy,
            },
            NodeKind::Test {
                test, sons, score, ..
            } => NodeRecord::Test {
                weight: node.weight(),
                sons: sons.len(),
                test: test.clone(),
                score: *score,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::NumericalTest;
    use crate::core::attributes::NumericalAttribute;

    fn attrs() -> AttributeSet {
        AttributeSet::new(vec![
            NumericalAttribute::new("x").into(),
            SymbolicAttribute::new("goal", 2).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_json_shape_is_tagged() {
        let record = NodeRecord::Leaf {
            weight: 2.0,
            distribution: vec![0.5, 0.5],
            entropy: 1.0,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"kind\":\"leaf\""));
        let back: NodeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(
            serde_json::to_string(&NodeRecord::Anchor).unwrap(),
            "{\"kind\":\"anchor\"}"
        );
    }

    #[test]
    fn test_to_node_checks_leaf_width() {
        let goal = SymbolicAttribute::new("goal", 2);
        let record = NodeRecord::Leaf {
            weight: 1.0,
            distribution: vec![1.0],
            entropy: 0.0,
        };
        assert!(matches!(
            record.to_node(&attrs(), &goal),
            Err(TreeError::MalformedNodeArray(_))
        ));
    }

    #[test]
    fn test_to_node_resolves_test_attribute() {
        let goal = SymbolicAttribute::new("goal", 2);
        let test: Test = NumericalTest::new(NumericalAttribute::new("X"), 1.5).into();
        let record = NodeRecord::Test {
            weight: 3.0,
            sons: 2,
            test: test.clone(),
            score: None,
        };
        let node = record.to_node(&attrs(), &goal).unwrap();
        match node.kind() {
            NodeKind::Test {
                attribute_index, ..
            } => assert_eq!(*attribute_index, 0),
            other => panic!("unexpected {other:?}"),
        }

        let wrong = NodeRecord::Test {
            weight: 3.0,
            sons: 3,
            test,
            score: None,
        };
        assert!(wrong.to_node(&attrs(), &goal).is_err());
        assert!(NodeRecord::Anchor.to_node(&attrs(), &goal).is_err());
    }
}
