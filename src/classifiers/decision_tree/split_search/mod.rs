//! Best-test search over a weighted list of items, one attribute at a time.

mod numerical_split_search;
mod symbolic_split_search;

use crate::classifiers::decision_tree::split_criteria::{InfoGainSplitCriterion, SplitCriterion};
use crate::classifiers::decision_tree::split_tests::{Test, TestScore};
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, NumericalAttribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;
use crate::core::items::item_collection::goal_code;

/// Gains below this many bits are rounding noise.
const MIN_GAIN: f64 = 1e-12;

struct Row<'a> {
    item: &'a Item,
    goal: usize,
    weight: f64,
}

pub(crate) struct SplitSearch<'a> {
    rows: Vec<Row<'a>>,
    goal: &'a SymbolicAttribute,
    pre_split_entropy: f64,
    criterion: InfoGainSplitCriterion,
}

impl<'a> SplitSearch<'a> {
    /// `pre_split_entropy` must be the goal entropy of exactly these rows.
    pub(crate) fn new(
        rows: impl Iterator<Item = (&'a Item, f64)>,
        goal: &'a SymbolicAttribute,
        goal_index: usize,
        pre_split_entropy: f64,
    ) -> Result<SplitSearch<'a>> {
        let rows = rows
            .map(|(item, weight)| {
                Ok(Row {
                    item,
                    goal: goal_code(item, goal, goal_index)?,
                    weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SplitSearch {
            rows,
            goal,
            pre_split_entropy,
            criterion: InfoGainSplitCriterion::new(),
        })
    }

    pub(crate) fn best_split_test(
        &self,
        attribute: &Attribute,
        attribute_index: usize,
    ) -> Result<TestScore> {
        if self.rows.is_empty() {
            return Ok(TestScore::new(Test::trivial(attribute), 0.0));
        }
        let found = match attribute {
            Attribute::Symbolic(s) => self.best_symbolic_split(s, attribute_index)?,
            Attribute::Numerical(n) => self.best_numerical_split(n, attribute_index)?,
        };
        let score = found.score();
        if !score.is_finite() {
            return Ok(TestScore::new(Test::trivial(attribute), 0.0));
        }
        let score = if score < MIN_GAIN {
            0.0
        } else {
            score.min(self.criterion.range_of_merit(self.goal.num_of_values()))
        };
        Ok(TestScore::new(found.into_test(), score))
    }

    fn goal_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.goal.num_of_values()];
        for row in &self.rows {
            totals[row.goal] += row.weight;
        }
        totals
    }
}

fn symbolic_code(item: &Item, index: usize, attribute: &SymbolicAttribute) -> Result<usize> {
    match item.value_of(index) {
        Some(AttributeValue::KnownSymbolic(code)) if code < attribute.num_of_values() => Ok(code),
        Some(AttributeValue::KnownSymbolic(code)) => Err(TreeError::SymbolicValueOutOfDomain {
            attribute: attribute.name().to_string(),
            code,
            num_of_values: attribute.num_of_values(),
        }),
        Some(AttributeValue::UnknownSymbolic) => {
            Err(TreeError::UnknownValue(attribute.name().to_string()))
        }
        _ => Err(TreeError::ValueKindMismatch {
            attribute: attribute.name().to_string(),
            expected: "symbolic",
        }),
    }
}

fn numerical_value(item: &Item, index: usize, attribute: &NumericalAttribute) -> Result<f64> {
    match item.value_of(index) {
        Some(AttributeValue::KnownNumerical(v)) => Ok(v),
        Some(AttributeValue::UnknownNumerical) => {
            Err(TreeError::UnknownValue(attribute.name().to_string()))
        }
        _ => Err(TreeError::ValueKindMismatch {
            attribute: attribute.name().to_string(),
            expected: "numerical",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entropy::cal_entropy;

    fn sym(code: usize) -> AttributeValue {
        AttributeValue::KnownSymbolic(code)
    }

    fn search<'a>(items: &'a [Item], weights: &[f64], goal: &'a SymbolicAttribute) -> SplitSearch<'a> {
        let mut freq = vec![0.0; goal.num_of_values()];
        for (it, w) in items.iter().zip(weights) {
            freq[it.value_of(1).unwrap().symbolic_code().unwrap()] += w;
        }
        SplitSearch::new(
            items.iter().zip(weights.iter().copied()),
            goal,
            1,
            cal_entropy(&freq).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_rounding_noise_scores_exactly_zero() {
        let attr: Attribute = SymbolicAttribute::new("a", 3).into();
        let goal = SymbolicAttribute::new("goal", 3);
        let pieces = [(0, 0.1), (1, 0.7), (2, 0.3), (0, 0.05), (1, 1.0 / 3.0), (2, 0.2)];
        let mut items = Vec::new();
        let mut weights = Vec::new();
        for code in [0, 1] {
            for &(g, w) in &pieces {
                items.push(Item::new(vec![sym(code), sym(g)]));
                weights.push(w);
            }
        }
        let best = search(&items, &weights, &goal)
            .best_split_test(&attr, 0)
            .unwrap();
        assert_eq!(best.score(), 0.0);
    }

    #[test]
    fn test_score_bounded_by_range_of_merit() {
        let attr: Attribute = SymbolicAttribute::new("a", 2).into();
        let goal = SymbolicAttribute::new("goal", 2);
        let items: Vec<Item> = [(0, 0), (1, 1), (0, 0), (1, 1)]
            .iter()
            .map(|&(a, g)| Item::new(vec![sym(a), sym(g)]))
            .collect();
        let best = search(&items, &[0.3, 0.7, 1.1, 0.9], &goal)
            .best_split_test(&attr, 0)
            .unwrap();
        let range = InfoGainSplitCriterion::new().range_of_merit(2);
        assert!(best.score() > 0.0 && best.score() <= range);
    }
}
