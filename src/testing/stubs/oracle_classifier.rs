use crate::classifiers::Classifier;
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::Result;
use crate::core::items::Item;

/// Always answers the item's own goal value; unknown goals get a uniform
/// distribution.
pub struct OracleClassifier {
    goal: SymbolicAttribute,
    goal_index: usize,
}

impl OracleClassifier {
    pub fn new(goal: SymbolicAttribute, goal_index: usize) -> OracleClassifier {
        OracleClassifier { goal, goal_index }
    }
}

impl Classifier for OracleClassifier {
    fn goal_attribute(&self) -> &SymbolicAttribute {
        &self.goal
    }

    fn goal_value_distribution(&self, item: &Item) -> Result<Vec<f64>> {
        let n = self.goal.num_of_values().max(1);
        let mut votes = vec![0.0; n];
        match item
            .value_of(self.goal_index)
            .and_then(|v| v.symbolic_code())
        {
            Some(code) if code < n => votes[code] = 1.0,
            _ => votes.fill(1.0 / n as f64),
        }
        Ok(votes)
    }
}
