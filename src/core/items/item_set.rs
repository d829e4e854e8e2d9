use super::item_collection::{ItemCollection, entropy_of};
use super::Item;
use crate::classifiers::decision_tree::split_search::SplitSearch;
use crate::classifiers::decision_tree::split_tests::{SplitTest, Test, TestScore};
use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Unweighted, ordered collection of items sharing one attribute set.
///
/// The goal entropy is cached per goal attribute and dropped on every
/// mutation.
#[derive(Debug, Clone)]
pub struct ItemSet {
    attribute_set: Arc<AttributeSet>,
    items: Vec<Arc<Item>>,
    entropy: Cell<Option<(usize, f64)>>,
}

impl ItemSet {
    pub fn new(attribute_set: Arc<AttributeSet>) -> ItemSet {
        ItemSet {
            attribute_set,
            items: Vec::new(),
            entropy: Cell::new(None),
        }
    }

    pub fn add(&mut self, item: impl Into<Arc<Item>>) -> Result<()> {
        let item = item.into();
        item.check_against(&self.attribute_set)?;
        self.items.push(item);
        self.entropy.set(None);
        Ok(())
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = Item>) -> Result<()> {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Arc<Item>> {
        if index >= self.items.len() {
            return None;
        }
        self.entropy.set(None);
        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn value_of(&self, index: usize, attribute: &Attribute) -> Result<AttributeValue> {
        let item = self
            .items
            .get(index)
            .ok_or_else(|| TreeError::InvalidInput(format!("no item at index {index}")))?;
        item.value_of_attribute(&self.attribute_set, attribute)
    }

    /// Partitions the items by issue. Every item must have a known value for
    /// the tested attribute.
    pub fn split(&self, test: &Test) -> Result<Vec<ItemSet>> {
        let index = self.attribute_set.require_name(test.attribute_name())?;
        let mut sets: Vec<ItemSet> = (0..test.num_of_issues())
            .map(|_| ItemSet::new(Arc::clone(&self.attribute_set)))
            .collect();
        for item in &self.items {
            let value = item.value_of(index).ok_or(TreeError::IncompatibleItem {
                expected: self.attribute_set.size(),
                found: item.num_of_attributes(),
            })?;
            let issue = test.perform(&value)?;
            sets[issue].items.push(Arc::clone(item));
        }
        Ok(sets)
    }
}

impl ItemCollection for ItemSet {
    fn attribute_set(&self) -> &Arc<AttributeSet> {
        &self.attribute_set
    }

    fn num_of_items(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index).map(|it| it.as_ref())
    }

    fn weight(&self, _index: usize) -> f64 {
        1.0
    }

    fn size(&self) -> f64 {
        self.items.len() as f64
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

    fn best_split_test_on(
        &self,
        test_attribute: &Attribute,
        goal: &SymbolicAttribute,
    ) -> Result<TestScore> {
        let test_index = self.attribute_set.require_index(test_attribute)?;
        let goal_index = self.attribute_set.require_name(goal.name())?;
        let goal = self.attribute_set.symbolic_by_name(goal.name())?;
        let pre_split_entropy = self.cal_entropy(goal)?;
        let search = SplitSearch::new(self.rows(), goal, goal_index, pre_split_entropy)?;
        match self.attribute_set.attribute(test_index) {
            Some(attribute) => search.best_split_test(attribute, test_index),
            None => Err(TreeError::UnknownAttribute(test_attribute.name().to_string())),
        }
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::NumericalTest;
    use crate::core::attributes::NumericalAttribute;
    use crate::testing::{known_numerical, known_symbolic, no_information_set, separable_set};

    #[test]
    fn test_add_rejects_incompatible_item() {
        let (attrs, _, _) = separable_set();
        let mut set = ItemSet::new(attrs);
        let err = set.add(Item::new(vec![known_symbolic(0)])).unwrap_err();
        assert!(matches!(err, TreeError::IncompatibleItem { .. }));
    }

    #[test]
    fn test_entropy_cache_invalidated_on_mutation() {
        let (attrs, items, goal) = separable_set();
        let mut set = ItemSet::new(attrs);
        set.add_all(items).unwrap();
        assert!((set.cal_entropy(&goal).unwrap() - 1.0).abs() < 1e-12);

        // keep only goal-0 items
        while let Some(pos) = set
            .items()
            .iter()
            .position(|it| it.value_of(1) == Some(known_symbolic(1)))
        {
            set.remove(pos);
        }
        assert_eq!(set.cal_entropy(&goal).unwrap(), 0.0);
        assert!(set.remove(99).is_none());
    }

    #[test]
    fn test_best_split_on_separable_set() {
        let (attrs, items, goal) = separable_set();
        let mut set = ItemSet::new(Arc::clone(&attrs));
        set.add_all(items).unwrap();
        let candidates = AttributeSet::new(vec![attrs.attribute(0).unwrap().clone()]).unwrap();
        let best = set.best_split_test(&candidates, &goal).unwrap();
        assert!((best.score() - 1.0).abs() < 1e-12);
        assert_eq!(best.test().attribute_name(), "A");
    }

    #[test]
    fn test_best_split_tests_require_candidates() {
        let (attrs, items, goal) = no_information_set();
        let mut set = ItemSet::new(attrs);
        set.add_all(items).unwrap();
        let empty = AttributeSet::new(vec![]).unwrap();
        assert!(matches!(
            set.best_split_tests(&empty, &goal),
            Err(TreeError::EmptyAttributeSet)
        ));
    }

    #[test]
    fn test_best_split_prefers_first_on_ties() {
        let (attrs, items, goal) = no_information_set();
        let mut set = ItemSet::new(Arc::clone(&attrs));
        set.add_all(items).unwrap();
        let candidates = AttributeSet::new(vec![
            attrs.attribute(0).unwrap().clone(),
            attrs.attribute(1).unwrap().clone(),
        ])
        .unwrap();
        let best = set.best_split_test(&candidates, &goal).unwrap();
        assert!(best.score().abs() < 1e-9);
        assert_eq!(best.test().attribute_name(), "A");
    }

    #[test]
    fn test_split_partitions_by_issue() {
        let attrs = Arc::new(
            AttributeSet::new(vec![
                NumericalAttribute::new("x").into(),
                SymbolicAttribute::new("goal", 2).into(),
            ])
            .unwrap(),
        );
        let mut set = ItemSet::new(Arc::clone(&attrs));
        for v in [1.0, 2.0, 3.0, 4.0] {
            set.add(Item::new(vec![known_numerical(v), known_symbolic(0)]))
                .unwrap();
        }
        let test: Test = NumericalTest::new(NumericalAttribute::new("x"), 2.5).into();
        let parts = set.split(&test).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].num_of_items(), 2);
        assert_eq!(parts[1].num_of_items(), 2);
        assert_eq!(
            parts[1].items()[0].value_of(0),
            Some(known_numerical(1.0))
        );
    }

    #[test]
    fn test_split_rejects_unknown_values() {
        let attrs = Arc::new(
            AttributeSet::new(vec![
                NumericalAttribute::new("x").into(),
                SymbolicAttribute::new("goal", 2).into(),
            ])
            .unwrap(),
        );
        let mut set = ItemSet::new(attrs);
        set.add(Item::new(vec![
            AttributeValue::UnknownNumerical,
            known_symbolic(0),
        ]))
        .unwrap();
        let test: Test = NumericalTest::new(NumericalAttribute::new("x"), 2.5).into();
        assert!(matches!(set.split(&test), Err(TreeError::UnknownValue(_))));
    }
}
