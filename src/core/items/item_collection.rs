use crate::classifiers::decision_tree::split_tests::TestScore;
use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::entropy::cal_entropy;
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;
use std::sync::Arc;

/// Read side shared by [`ItemSet`](super::ItemSet) and
/// [`WeightedItemSet`](super::WeightedItemSet).
pub trait ItemCollection {
    fn attribute_set(&self) -> &Arc<AttributeSet>;

    fn num_of_items(&self) -> usize;

    fn item(&self, index: usize) -> Option<&Item>;

    /// Weight of the item at `index`; 1.0 for unweighted collections.
    fn weight(&self, index: usize) -> f64;

    /// Sum of all item weights.
    fn size(&self) -> f64;

    fn cal_entropy(&self, goal: &SymbolicAttribute) -> Result<f64>;

    /// Best test on a single attribute, scored in bits of information gain
    /// per unit of weight of this collection.
    fn best_split_test_on(
        &self,
        test_attribute: &Attribute,
        goal: &SymbolicAttribute,
    ) -> Result<TestScore>;

    fn is_empty(&self) -> bool {
        self.num_of_items() == 0
    }

    fn rows(&self) -> impl Iterator<Item = (&Item, f64)> {
        (0..self.num_of_items()).filter_map(move |i| self.item(i).map(|item| (item, self.weight(i))))
    }

    /// Weighted count of each goal code.
    fn goal_frequencies(&self, goal: &SymbolicAttribute) -> Result<Vec<f64>> {
        let goal_index = self.attribute_set().require_name(goal.name())?;
        goal_frequencies(self.rows(), goal, goal_index)
    }

    /// Goal frequencies divided by [`size`](Self::size). All zeros when the
    /// collection carries no weight.
    fn goal_distribution(&self, goal: &SymbolicAttribute) -> Result<Vec<f64>> {
        let mut frequencies = self.goal_frequencies(goal)?;
        let size = self.size();
        if size > 0.0 {
            for f in frequencies.iter_mut() {
                *f /= size;
            }
        } else {
            frequencies.fill(0.0);
        }
        Ok(frequencies)
    }

    fn best_split_tests(
        &self,
        candidates: &AttributeSet,
        goal: &SymbolicAttribute,
    ) -> Result<Vec<TestScore>> {
        if candidates.is_empty() {
            return Err(TreeError::EmptyAttributeSet);
        }
        candidates
            .iter()
            .map(|attr| self.best_split_test_on(attr, goal))
            .collect()
    }

    /// Highest scoring test over `candidates`; the first one wins ties.
    fn best_split_test(
        &self,
        candidates: &AttributeSet,
        goal: &SymbolicAttribute,
    ) -> Result<TestScore> {
        let mut best: Option<TestScore> = None;
        for score in self.best_split_tests(candidates, goal)? {
            if best.as_ref().is_none_or(|b| score.score() > b.score()) {
                best = Some(score);
            }
        }
        best.ok_or(TreeError::EmptyAttributeSet)
    }
}

pub(crate) fn goal_code(item: &Item, goal: &SymbolicAttribute, goal_index: usize) -> Result<usize> {
    match item.value_of(goal_index) {
        Some(AttributeValue::KnownSymbolic(code)) if code < goal.num_of_values() => Ok(code),
        Some(AttributeValue::KnownSymbolic(code)) => Err(TreeError::SymbolicValueOutOfDomain {
            attribute: goal.name().to_string(),
            code,
            num_of_values: goal.num_of_values(),
        }),
        Some(AttributeValue::UnknownSymbolic) => {
            Err(TreeError::UnknownValue(goal.name().to_string()))
        }
        Some(_) => Err(TreeError::ValueKindMismatch {
            attribute: goal.name().to_string(),
            expected: "symbolic",
        }),
        None => Err(TreeError::IncompatibleItem {
            expected: goal_index + 1,
            found: item.num_of_attributes(),
        }),
    }
}

pub(crate) fn goal_frequencies<'a>(
    rows: impl Iterator<Item = (&'a Item, f64)>,
    goal: &SymbolicAttribute,
    goal_index: usize,
) -> Result<Vec<f64>> {
    let mut frequencies = vec![0.0; goal.num_of_values()];
    for (item, weight) in rows {
        frequencies[goal_code(item, goal, goal_index)?] += weight;
    }
    Ok(frequencies)
}

pub(crate) fn entropy_of<'a>(
    rows: impl Iterator<Item = (&'a Item, f64)>,
    goal: &SymbolicAttribute,
    goal_index: usize,
) -> Result<f64> {
    cal_entropy(&goal_frequencies(rows, goal, goal_index)?)
}
