use crate::classifiers::classifier::Classifier;
use crate::classifiers::decision_tree::node_record::NodeRecord;
use crate::classifiers::decision_tree::nodes::{Node, NodeId, NodeKind};
use crate::classifiers::decision_tree::split_tests::SplitTest;
use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

pub const ANCHOR: NodeId = 0;

/// Node counts and depth of the part of a tree reachable from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    pub nodes: usize,
    pub tests: usize,
    pub leaves: usize,
    pub open: usize,
    pub depth: usize,
}

/// Arena-backed binary decision tree guessing a symbolic goal attribute.
///
/// Slot 0 always holds the anchor, whose single son is the root. Replacing a
/// node overwrites its slot, so a `NodeId` keeps naming the same position in
/// the tree across replacements.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    attribute_set: Arc<AttributeSet>,
    goal_attribute: SymbolicAttribute,
    goal_index: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Creates a tree made of an anchor and an open root.
    pub fn new(attribute_set: Arc<AttributeSet>, goal: &SymbolicAttribute) -> Result<DecisionTree> {
        let (goal_attribute, goal_index) = resolve_goal(&attribute_set, goal)?;
        let mut root = Node::open(0.0);
        root.father = Some(ANCHOR);
        Ok(DecisionTree {
            attribute_set,
            goal_attribute,
            goal_index,
            nodes: vec![Node::anchor(1), root],
        })
    }

    pub fn attribute_set(&self) -> &Arc<AttributeSet> {
        &self.attribute_set
    }

    pub fn goal_attribute(&self) -> &SymbolicAttribute {
        &self.goal_attribute
    }

    pub fn goal_index(&self) -> usize {
        self.goal_index
    }

    pub fn anchor(&self) -> NodeId {
        ANCHOR
    }

    pub fn root(&self) -> NodeId {
        match self.nodes[ANCHOR].kind {
            NodeKind::Anchor { son } => son,
            _ => ANCHOR + 1,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    fn attached(&self, id: NodeId) -> Result<&Node> {
        match self.nodes.get(id) {
            Some(node) if id == ANCHOR || node.father.is_some() => Ok(node),
            _ => Err(TreeError::InvalidInput(format!(
                "node {id} is not part of the tree"
            ))),
        }
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root()
    }

    pub fn son(&self, id: NodeId, issue: usize) -> Result<NodeId> {
        self.attached(id)?.son(issue)
    }

    pub fn has_open_node(&self) -> bool {
        self.subtree_has_open(ANCHOR)
    }

    /// True when `id` is open or has an open descendant.
    pub fn subtree_has_open(&self, id: NodeId) -> bool {
        match &self.nodes[id].kind {
            NodeKind::Open => true,
            NodeKind::Leaf { .. } => false,
            NodeKind::Anchor { son } => self.subtree_has_open(*son),
            NodeKind::Test { has_open_node, .. } => *has_open_node,
        }
    }

    /// The first open node found by descending from the anchor, always
    /// taking the lowest-issue son whose subtree still has an open node.
    pub fn open_node(&self) -> Result<NodeId> {
        let mut id = ANCHOR;
        loop {
            match &self.nodes[id].kind {
                NodeKind::Open => return Ok(id),
                NodeKind::Leaf { .. } => return Err(TreeError::NoOpenNode),
                NodeKind::Anchor { son } => id = *son,
                NodeKind::Test { sons, .. } => {
                    id = sons
                        .iter()
                        .copied()
                        .find(|&s| self.subtree_has_open(s))
                        .ok_or(TreeError::NoOpenNode)?;
                }
            }
        }
    }

    /// Puts `node` in place of `id` and returns the node it displaced.
    ///
    /// `id` must be attached below the anchor. A test node gets one fresh
    /// open son per issue. The displaced node's former sons are detached.
    pub fn replace(&mut self, id: NodeId, mut node: Node) -> Result<Node> {
        if id == ANCHOR {
            return Err(TreeError::InvalidInput("the anchor cannot be replaced".into()));
        }
        let father = self.attached(id)?.father.ok_or_else(|| {
            TreeError::InvalidInput(format!("node {id} is not part of the tree"))
        })?;
        let father_node = &self.nodes[father];
        if father_node.is_leaf() {
            return Err(TreeError::NoSons(father_node.node_type().into()));
        }
        if !father_node.sons().contains(&id) {
            return Err(TreeError::NotASon { father, son: id });
        }

        let issues = node.num_of_issues();
        if let NodeKind::Test {
            test,
            attribute_index,
            ..
        } = &mut node.kind
        {
            *attribute_index = self.attribute_set.require_name(test.attribute_name())?;
        }
        node.father = Some(father);

        let mut old = std::mem::replace(&mut self.nodes[id], node);
        old.father = None;
        for &son in old.sons() {
            if let Some(s) = self.nodes.get_mut(son) {
                s.father = None;
            }
        }

        if issues > 0 {
            let first = self.nodes.len();
            for _ in 0..issues {
                let mut son = Node::open(0.0);
                son.father = Some(id);
                self.nodes.push(son);
            }
            if let NodeKind::Test {
                sons,
                has_open_node,
                ..
            } = &mut self.nodes[id].kind
            {
                *sons = (first..first + issues).collect();
                *has_open_node = true;
            }
        }

        self.update_has_open_node(father);
        Ok(old)
    }

    /// Recomputes the open-node flag of `id` and walks up while it changes.
    fn update_has_open_node(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            let flag = match &self.nodes[id].kind {
                NodeKind::Test { sons, .. } => sons.iter().any(|&s| self.subtree_has_open(s)),
                _ => return,
            };
            if let NodeKind::Test { has_open_node, .. } = &mut self.nodes[id].kind {
                if *has_open_node == flag {
                    return;
                }
                *has_open_node = flag;
            }
            current = self.nodes[id].father;
        }
    }

    /// Leaf (or open node) reached by `item`. Every tested value on the way
    /// must be known.
    pub fn leaf_node(&self, item: &Item) -> Result<NodeId> {
        self.check_item(item)?;
        let mut id = self.root();
        loop {
            let node = &self.nodes[id];
            match &node.kind {
                NodeKind::Test {
                    test,
                    attribute_index,
                    sons,
                    ..
                } => {
                    let value = self.value_at(item, *attribute_index)?;
                    let issue = test.perform(&value)?;
                    id = *sons.get(issue).ok_or(TreeError::InvalidIssue(issue))?;
                }
                NodeKind::Anchor { son } => id = *son,
                NodeKind::Leaf { .. } | NodeKind::Open => return Ok(id),
            }
        }
    }

    fn check_item(&self, item: &Item) -> Result<()> {
        if item.num_of_attributes() != self.attribute_set.size() {
            return Err(TreeError::IncompatibleItem {
                expected: self.attribute_set.size(),
                found: item.num_of_attributes(),
            });
        }
        Ok(())
    }

    fn value_at(&self, item: &Item, index: usize) -> Result<AttributeValue> {
        item.value_of(index).ok_or(TreeError::IncompatibleItem {
            expected: self.attribute_set.size(),
            found: item.num_of_attributes(),
        })
    }

    fn distribution_at(&self, item: &Item, id: NodeId) -> Result<Vec<f64>> {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Leaf { distribution, .. } => Ok(distribution.clone()),
            NodeKind::Open => Err(TreeError::OpenNodeReached),
            NodeKind::Anchor { son } => self.distribution_at(item, *son),
            NodeKind::Test {
                test,
                attribute_index,
                sons,
                ..
            } => {
                let value = self.value_at(item, *attribute_index)?;
                if !value.is_unknown() {
                    let issue = test.perform(&value)?;
                    let son = sons.get(issue).ok_or(TreeError::InvalidIssue(issue))?;
                    return self.distribution_at(item, *son);
                }

                let mut mixed = vec![0.0; self.goal_attribute.num_of_values()];
                let mut sons_weight = 0.0;
                for &son in sons {
                    let weight = self.nodes[son].weight();
                    for (m, d) in mixed.iter_mut().zip(self.distribution_at(item, son)?) {
                        *m += d * weight;
                    }
                    sons_weight += weight;
                }
                let norm = if node.weight() > 0.0 {
                    node.weight()
                } else {
                    sons_weight
                };
                if norm > 0.0 {
                    for m in mixed.iter_mut() {
                        *m /= norm;
                    }
                }
                Ok(mixed)
            }
        }
    }

    /// Ids of every reachable node in breadth-first order, anchor first and
    /// sons in issue order.
    pub fn bf_iterator(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([ANCHOR]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id].sons().iter().copied());
        }
        order
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut queue = VecDeque::from([(self.root(), 1)]);
        while let Some((id, level)) = queue.pop_front() {
            let node = &self.nodes[id];
            stats.nodes += 1;
            stats.depth = stats.depth.max(level);
            match node.kind {
                NodeKind::Test { .. } => stats.tests += 1,
                NodeKind::Leaf { .. } => stats.leaves += 1,
                NodeKind::Open => stats.open += 1,
                NodeKind::Anchor { .. } => {}
            }
            queue.extend(node.sons().iter().map(|&s| (s, level + 1)));
        }
        stats
    }

    /// Breadth-first record array of the reachable tree.
    pub fn flatten(&self) -> Vec<NodeRecord> {
        self.bf_iterator()
            .into_iter()
            .map(|id| NodeRecord::from(&self.nodes[id]))
            .collect()
    }

    /// Rebuilds a tree from a breadth-first record array: anchor first, then
    /// every node followed later by its sons in issue order.
    pub fn from_records(
        attribute_set: Arc<AttributeSet>,
        goal: &SymbolicAttribute,
        records: &[NodeRecord],
    ) -> Result<DecisionTree> {
        let (goal_attribute, goal_index) = resolve_goal(&attribute_set, goal)?;
        match records.first() {
            Some(NodeRecord::Anchor) => {}
            _ => {
                return Err(TreeError::MalformedNodeArray(
                    "the first record must be the anchor".into(),
                ));
            }
        }
        if records.len() < 2 {
            return Err(TreeError::MalformedNodeArray("missing root".into()));
        }

        let mut nodes = vec![Node::anchor(1)];
        let mut root = records[1].to_node(&attribute_set, &goal_attribute)?;
        root.father = Some(ANCHOR);
        nodes.push(root);

        let mut queue = VecDeque::from([1]);
        while let Some(id) = queue.pop_front() {
            let count = records[id].num_of_sons();
            let first = nodes.len();
            for _ in 0..count {
                let next = nodes.len();
                let record = records.get(next).ok_or_else(|| {
                    TreeError::MalformedNodeArray(format!("missing son of node {id}"))
                })?;
                let mut son = record.to_node(&attribute_set, &goal_attribute)?;
                son.father = Some(id);
                nodes.push(son);
                queue.push_back(next);
            }
            if let NodeKind::Test { sons, .. } = &mut nodes[id].kind {
                *sons = (first..first + count).collect();
            }
        }
        if nodes.len() != records.len() {
            return Err(TreeError::MalformedNodeArray(format!(
                "{} records left after the last node",
                records.len() - nodes.len()
            )));
        }

        // Sons always come after their father.
        for id in (1..nodes.len()).rev() {
            let flag = nodes[id].sons().iter().any(|&s| match &nodes[s].kind {
                NodeKind::Open => true,
                NodeKind::Test { has_open_node, .. } => *has_open_node,
                _ => false,
            });
            if let NodeKind::Test { has_open_node, .. } = &mut nodes[id].kind {
                *has_open_node = flag;
            }
        }

        Ok(DecisionTree {
            attribute_set,
            goal_attribute,
            goal_index,
            nodes,
        })
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Test { test, sons, .. } => {
                writeln!(f, "{test} ? (weight {:.3})", node.weight())?;
                for (issue, &son) in sons.iter().enumerate().rev() {
                    let label = test.issue_to_string(issue).unwrap_or("?");
                    write!(f, "{:indent$}-> {label}: ", "", indent = 2 * (depth + 1))?;
                    self.fmt_node(f, son, depth + 1)?;
                }
                Ok(())
            }
            NodeKind::Leaf { distribution, .. } => {
                let parts: Vec<String> = distribution
                    .iter()
                    .enumerate()
                    .map(|(code, p)| {
                        let label = self
                            .goal_attribute
                            .value_to_string(&AttributeValue::KnownSymbolic(code));
                        format!("{label}={p:.3}")
                    })
                    .collect();
                writeln!(f, "[{}] (weight {:.3})", parts.join(" "), node.weight())
            }
            NodeKind::Open => writeln!(f, "(open)"),
            NodeKind::Anchor { son } => self.fmt_node(f, *son, depth),
        }
    }
}

impl Classifier for DecisionTree {
    fn goal_attribute(&self) -> &SymbolicAttribute {
        &self.goal_attribute
    }

    fn goal_value_distribution(&self, item: &Item) -> Result<Vec<f64>> {
        self.check_item(item)?;
        self.distribution_at(item, self.root())
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root(), 0)
    }
}

fn resolve_goal(
    attribute_set: &AttributeSet,
    goal: &SymbolicAttribute,
) -> Result<(SymbolicAttribute, usize)> {
    let index = attribute_set.require_name(goal.name())?;
    let goal = attribute_set.symbolic_by_name(goal.name())?.clone();
    Ok((goal, index))
}
