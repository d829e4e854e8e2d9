use super::item_collection::{ItemCollection, entropy_of};
use super::{Item, ItemSet};
use crate::classifiers::decision_tree::split_search::SplitSearch;
use crate::classifiers::decision_tree::split_tests::{SplitTest, Test, TestScore};
use crate::core::attribute_set::AttributeSet;
use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use std::cell::Cell;
use std::sync::Arc;

/// Item set where every item carries a non-negative weight.
///
/// Items whose tested value is unknown are spread over the sons of a split
/// in proportion to the weight each son received from the known items, so a
/// single item can live fractionally in several subsets.
#[derive(Debug, Clone)]
pub struct WeightedItemSet {
    attribute_set: Arc<AttributeSet>,
    items: Vec<Arc<Item>>,
    weights: Vec<f64>,
    weights_sum: f64,
    entropy: Cell<Option<(usize, f64)>>,
}

impl WeightedItemSet {
    pub fn new(attribute_set: Arc<AttributeSet>) -> WeightedItemSet {
        WeightedItemSet {
            attribute_set,
            items: Vec::new(),
            weights: Vec::new(),
            weights_sum: 0.0,
            entropy: Cell::new(None),
        }
    }

    pub fn add(&mut self, item: impl Into<Arc<Item>>, weight: f64) -> Result<()> {
        if weight.is_nan() || weight < 0.0 {
            return Err(TreeError::NegativeWeight(weight));
        }
        let item = item.into();
        item.check_against(&self.attribute_set)?;
        self.push(item, weight);
        Ok(())
    }

    /// Adds `item` with weight 1.
    pub fn add_unit(&mut self, item: impl Into<Arc<Item>>) -> Result<()> {
        self.add(item, 1.0)
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = (Item, f64)>) -> Result<()> {
        for (item, weight) in items {
            self.add(item, weight)?;
        }
        Ok(())
    }

    fn push(&mut self, item: Arc<Item>, weight: f64) {
        self.items.push(item);
        self.weights.push(weight);
        self.weights_sum += weight;
        self.entropy.set(None);
    }

    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// New set holding the items at `indices`, in that order, with their
    /// weights.
    pub fn select(&self, indices: &[usize]) -> Result<WeightedItemSet> {
        let mut selected = WeightedItemSet::new(Arc::clone(&self.attribute_set));
        for &i in indices {
            let item = self
                .items
                .get(i)
                .ok_or_else(|| TreeError::InvalidInput(format!("no item at index {i}")))?;
            selected.push(Arc::clone(item), self.weights[i]);
        }
        Ok(selected)
    }

    /// Splits by issue. Items with a known value go to the son picked by the
    /// test; items with an unknown value go to every son, with their weight
    /// scaled by that son's share of the known weight (evenly when no known
    /// weight exists).
    pub fn split(&self, test: &Test) -> Result<Vec<WeightedItemSet>> {
        let index = self.attribute_set.require_name(test.attribute_name())?;
        let issues = test.num_of_issues();
        let mut sets: Vec<WeightedItemSet> = (0..issues)
            .map(|_| WeightedItemSet::new(Arc::clone(&self.attribute_set)))
            .collect();
        let mut unknown: Vec<(&Arc<Item>, f64)> = Vec::new();

        for (item, &weight) in self.items.iter().zip(&self.weights) {
            let value = item.value_of(index).ok_or(TreeError::IncompatibleItem {
                expected: self.attribute_set.size(),
                found: item.num_of_attributes(),
            })?;
            if value.is_unknown() {
                unknown.push((item, weight));
            } else {
                sets[test.perform(&value)?].push(Arc::clone(item), weight);
            }
        }

        let sizes: Vec<f64> = sets.iter().map(|s| s.size()).collect();
        let size_sum: f64 = sizes.iter().sum();
        for (item, weight) in unknown {
            for (set, &size) in sets.iter_mut().zip(&sizes) {
                let share = if size_sum > 0.0 {
                    weight * size / size_sum
                } else {
                    weight / issues as f64
                };
                if share > 0.0 {
                    set.push(Arc::clone(item), share);
                }
            }
        }
        Ok(sets)
    }

    fn known_subset(&self, attribute_index: usize) -> WeightedItemSet {
        let mut known = WeightedItemSet::new(Arc::clone(&self.attribute_set));
        for (item, &weight) in self.items.iter().zip(&self.weights) {
            if item.value_of(attribute_index).is_some_and(|v| !v.is_unknown()) {
                known.push(Arc::clone(item), weight);
            }
        }
        known
    }

    fn search_known(
        &self,
        attribute: &Attribute,
        attribute_index: usize,
        goal: &SymbolicAttribute,
    ) -> Result<TestScore> {
        let goal_index = self.attribute_set.require_name(goal.name())?;
        let pre_split_entropy = self.cal_entropy(goal)?;
        SplitSearch::new(self.rows(), goal, goal_index, pre_split_entropy)?
            .best_split_test(attribute, attribute_index)
    }
}

impl ItemCollection for WeightedItemSet {
    fn attribute_set(&self) -> &Arc<AttributeSet> {
        &self.attribute_set
    }

    fn num_of_items(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index).map(|it| it.as_ref())
    }

    fn weight(&self, index: usize) -> f64 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    fn size(&self) -> f64 {
        self.weights_sum
    }

    fn cal_entropy(&self, goal: &SymbolicAttribute) -> Result<f64> {
        let goal_index = self.attribute_set.require_name(goal.name())?;
        if let Some((cached_index, entropy)) = self.entropy.get() {
            if cached_index == goal_index {
                return Ok(entropy);
            }
        }
        let goal = self.attribute_set.symbolic_by_name(goal.name())?;
        let entropy = entropy_of(self.rows(), goal, goal_index)?;
        self.entropy.set(Some((goal_index, entropy)));
        Ok(entropy)
    }

    /// Searches only the items whose tested value is known, then scales the
    /// score by the share of items (not weight) whose value is known.
    fn best_split_test_on(
        &self,
        test_attribute: &Attribute,
        goal: &SymbolicAttribute,
    ) -> Result<TestScore> {
        let test_index = self.attribute_set.require_index(test_attribute)?;
        let attribute = self
            .attribute_set
            .attribute(test_index)
            .ok_or_else(|| TreeError::UnknownAttribute(test_attribute.name().to_string()))?;
        let goal = self.attribute_set.symbolic_by_name(goal.name())?;

        let has_unknown = self
            .items
            .iter()
            .any(|it| it.value_of(test_index).is_some_and(|v| v.is_unknown()));
        if !has_unknown {
            return self.search_known(attribute, test_index, goal);
        }

        let known = self.known_subset(test_index);
        if known.is_empty() || known.size() <= 0.0 {
            return Ok(TestScore::new(Test::trivial(attribute), 0.0));
        }
        let fraction = known.num_of_items() as f64 / self.num_of_items() as f64;
        Ok(known
            .search_known(attribute, test_index, goal)?
            .scaled(fraction))
    }
}

impl From<ItemSet> for WeightedItemSet {
    fn from(set: ItemSet) -> Self {
        let mut weighted = WeightedItemSet::new(Arc::clone(set.attribute_set()));
        for item in set.items() {
            weighted.push(Arc::clone(item), 1.0);
        }
        weighted
    }
}
