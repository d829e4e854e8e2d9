use super::{SplitSearch, numerical_value};
use crate::classifiers::decision_tree::split_criteria::SplitCriterion;
use crate::classifiers::decision_tree::split_tests::{NumericalTest, TestScore};
use crate::core::attributes::NumericalAttribute;
use crate::core::error::Result;

/// Midpoint of two distinct sorted values, kept strictly above `low` so that
/// `low` still falls on the "Yes" side.
fn threshold_between(low: f64, high: f64) -> f64 {
    let mid = low / 2.0 + high / 2.0;
    if mid > low && mid <= high { mid } else { high }
}

impl SplitSearch<'_> {
    /// Sweeps the sorted values once, moving weight from the upper to the
    /// lower bucket and scoring every boundary between distinct values.
    pub(super) fn best_numerical_split(
        &self,
        attribute: &NumericalAttribute,
        attribute_index: usize,
    ) -> Result<TestScore> {
        let mut sorted = self
            .rows
            .iter()
            .map(|row| Ok((numerical_value(row.item, attribute_index, attribute)?, row.goal, row.weight)))
            .collect::<Result<Vec<(f64, usize, f64)>>>()?;
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut lower = vec![0.0; self.goal.num_of_values()];
        let mut higher = self.goal_totals();

        let mut best_score = 0.0;
        let mut best_threshold = sorted.first().map_or(0.0, |s| s.0);

        for pair in sorted.windows(2) {
            let (value, goal, weight) = pair[0];
            let next_value = pair[1].0;

            lower[goal] += weight;
            higher[goal] = (higher[goal] - weight).max(0.0);

            if value != next_value {
                let score = self
                    .criterion
                    .merit_of_split(self.pre_split_entropy, &[&lower, &higher])?;
                if score > best_score {
                    best_score = score;
                    best_threshold = threshold_between(value, next_value);
                }
            }
        }

        let test = NumericalTest::new(attribute.clone(), best_threshold);
        Ok(TestScore::new(test.into(), best_score))
    }
}
