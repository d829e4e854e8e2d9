use crate::classifiers::Classifier;
use crate::core::attribute_value::AttributeValue;
use crate::core::error::{Result, TreeError};
use crate::core::items::ItemCollection;
use crate::evaluation::Snapshot;
use log::warn;

/// Weighted confusion matrix over the goal codes, rows indexed by the true
/// code and columns by the predicted one.
#[derive(Debug, Clone)]
pub struct ClassificationEvaluator {
    confusion: Vec<Vec<f64>>,
    weight_seen: f64,
    items_seen: u64,
    items_skipped: u64,
}

impl ClassificationEvaluator {
    pub fn new(num_classes: usize) -> ClassificationEvaluator {
        ClassificationEvaluator {
            confusion: vec![vec![0.0; num_classes]; num_classes],
            weight_seen: 0.0,
            items_seen: 0,
            items_skipped: 0,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.confusion.len()
    }

    pub fn add_result(&mut self, true_code: usize, predicted: usize, weight: f64) -> Result<()> {
        let n = self.num_classes();
        for code in [true_code, predicted] {
            if code >= n {
                return Err(TreeError::InvalidIssue(code));
            }
        }
        if weight.is_nan() || weight < 0.0 {
            return Err(TreeError::NegativeWeight(weight));
        }
        self.confusion[true_code][predicted] += weight;
        self.weight_seen += weight;
        self.items_seen += 1;
        Ok(())
    }

    pub fn add_skipped(&mut self) {
        self.items_skipped += 1;
    }

    pub fn confusion_matrix(&self) -> &[Vec<f64>] {
        &self.confusion
    }

    pub fn weight_seen(&self) -> f64 {
        self.weight_seen
    }

    pub fn items_seen(&self) -> u64 {
        self.items_seen
    }

    pub fn items_skipped(&self) -> u64 {
        self.items_skipped
    }

    /// Share of weight on the diagonal; NaN before any result.
    pub fn accuracy(&self) -> f64 {
        if self.weight_seen == 0.0 {
            return f64::NAN;
        }
        let correct: f64 = (0..self.num_classes()).map(|i| self.confusion[i][i]).sum();
        correct / self.weight_seen
    }

    /// Cohen's kappa; NaN before any result or when chance agreement is
    /// already perfect.
    pub fn kappa(&self) -> f64 {
        if self.weight_seen == 0.0 {
            return f64::NAN;
        }
        let total = self.weight_seen;
        let chance: f64 = (0..self.num_classes())
            .map(|i| {
                let row: f64 = self.confusion[i].iter().sum();
                let col: f64 = self.confusion.iter().map(|r| r[i]).sum();
                (row / total) * (col / total)
            })
            .sum();
        (self.accuracy() - chance) / (1.0 - chance)
    }

    pub fn snapshot(&self, seconds: f64) -> Snapshot {
        Snapshot {
            items_seen: self.items_seen,
            items_skipped: self.items_skipped,
            accuracy: self.accuracy(),
            kappa: self.kappa(),
            seconds,
        }
    }
}

/// Scores `classifier` on every item of `items` whose goal value is known.
pub fn evaluate<C: ItemCollection + ?Sized>(
    classifier: &dyn Classifier,
    items: &C,
) -> Result<ClassificationEvaluator> {
    let goal = classifier.goal_attribute();
    let goal_index = items.attribute_set().require_name(goal.name())?;
    let item_goal = items.attribute_set().symbolic_by_name(goal.name())?;
    if item_goal.num_of_values() != goal.num_of_values() {
        return Err(TreeError::InvalidInput(format!(
            "goal '{}' has {} values in the data but {} in the classifier",
            goal.name(),
            item_goal.num_of_values(),
            goal.num_of_values()
        )));
    }

    let mut evaluator = ClassificationEvaluator::new(goal.num_of_values());
    for (index, (item, weight)) in items.rows().enumerate() {
        match item.value_of(goal_index) {
            Some(AttributeValue::KnownSymbolic(true_code)) => {
                let predicted = classifier.guess_goal_attribute(item)?;
                evaluator.add_result(true_code, predicted, weight)?;
            }
            _ => {
                warn!("item {index} has no known '{}' value, skipped", goal.name());
                evaluator.add_skipped();
            }
        }
    }
    Ok(evaluator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::items::{Item, ItemSet};
    use crate::testing::{OracleClassifier, known_symbolic, separable_set};
    use std::sync::Arc;

    #[test]
    fn empty_evaluator_reports_nan() {
        let e = ClassificationEvaluator::new(2);
        assert!(e.accuracy().is_nan());
        assert!(e.kappa().is_nan());
    }

    #[test]
    fn accuracy_and_kappa_from_confusion() {
        let mut e = ClassificationEvaluator::new(2);
        // 20 agree on 0, 15 agree on 1, 10 true-0 predicted 1, 5 true-1 predicted 0
        e.add_result(0, 0, 20.0).unwrap();
        e.add_result(1, 1, 15.0).unwrap();
        e.add_result(0, 1, 10.0).unwrap();
        e.add_result(1, 0, 5.0).unwrap();

        assert!((e.accuracy() - 0.7).abs() < 1e-12);
        // chance = 0.6 * 0.5 + 0.4 * 0.5 = 0.5
        assert!((e.kappa() - 0.4).abs() < 1e-12);
        assert_eq!(e.confusion_matrix()[0], vec![20.0, 10.0]);
        assert_eq!(e.items_seen(), 4);
    }

    #[test]
    fn add_result_rejects_bad_input() {
        let mut e = ClassificationEvaluator::new(2);
        assert!(matches!(e.add_result(2, 0, 1.0), Err(TreeError::InvalidIssue(2))));
        assert!(matches!(
            e.add_result(0, 0, -1.0),
            Err(TreeError::NegativeWeight(_))
        ));
        assert_eq!(e.weight_seen(), 0.0);
    }

    #[test]
    fn evaluate_oracle_is_perfect_and_skips_unknown_goals() {
        let (attrs, items, goal) = separable_set();
        let mut set = ItemSet::new(Arc::clone(&attrs));
        set.add_all(items).unwrap();
        set.add(Item::new(vec![
            known_symbolic(0),
            AttributeValue::UnknownSymbolic,
        ]))
        .unwrap();

        let oracle = OracleClassifier::new(goal, 1);
        let e = evaluate(&oracle, &set).unwrap();
        assert_eq!(e.items_seen(), 4);
        assert_eq!(e.items_skipped(), 1);
        assert!((e.accuracy() - 1.0).abs() < 1e-12);
        assert!((e.kappa() - 1.0).abs() < 1e-12);
        assert_eq!(e.snapshot(0.0).items_skipped, 1);
    }
}
