use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;

pub trait Classifier {
    fn goal_attribute(&self) -> &SymbolicAttribute;

    /// Probability of each goal code for `item`.
    fn goal_value_distribution(&self, item: &Item) -> Result<Vec<f64>>;

    /// Most probable goal code; the lowest code wins ties.
    fn guess_goal_attribute(&self, item: &Item) -> Result<usize> {
        let distribution = self.goal_value_distribution(item)?;
        most_probable(&distribution).ok_or_else(|| {
            TreeError::InvalidInput(format!(
                "goal '{}' has no values to guess from",
                self.goal_attribute().name()
            ))
        })
    }
}

pub(crate) fn most_probable(distribution: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (code, &p) in distribution.iter().enumerate() {
        if best.is_none_or(|(_, max)| p > max) {
            best = Some((code, p));
        }
    }
    best.map(|(code, _)| code)
}
