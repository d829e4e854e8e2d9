//! Fixtures and stubs shared by unit tests.

mod stubs;

pub use stubs::oracle_classifier::OracleClassifier;

use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, NumericalAttribute, SymbolicAttribute};
use crate::core::items::{Item, WeightedItemSet};
use std::sync::Arc;

pub fn known_symbolic(code: usize) -> AttributeValue {
    AttributeValue::KnownSymbolic(code)
}

pub fn known_numerical(value: f64) -> AttributeValue {
    AttributeValue::KnownNumerical(value)
}

fn goal_of(attrs: &Arc<AttributeSet>) -> SymbolicAttribute {
    match attrs.symbolic_by_name("Goal") {
        Ok(goal) => goal.clone(),
        Err(e) => panic!("fixture without goal: {e}"),
    }
}

/// Every attribute of `attrs` except `goal`.
pub fn candidates_without_goal(attrs: &AttributeSet, goal: &SymbolicAttribute) -> AttributeSet {
    let goal = Attribute::from(goal.clone());
    let candidates = attrs.iter().filter(|a| **a != goal).cloned().collect();
    AttributeSet::new(candidates).unwrap()
}

/// `A` fully determines `Goal`.
pub fn separable_set() -> (Arc<AttributeSet>, Vec<Item>, SymbolicAttribute) {
    let attrs = Arc::new(
        AttributeSet::new(vec![
            SymbolicAttribute::new("A", 2).into(),
            SymbolicAttribute::new("Goal", 2).into(),
        ])
        .unwrap(),
    );
    let items = [(0, 0), (0, 0), (1, 1), (1, 1)]
        .iter()
        .map(|&(a, g)| Item::new(vec![known_symbolic(a), known_symbolic(g)]))
        .collect();
    let goal = goal_of(&attrs);
    (attrs, items, goal)
}

/// Neither `A` nor the constant `B` tells anything about `Goal`.
pub fn no_information_set() -> (Arc<AttributeSet>, Vec<Item>, SymbolicAttribute) {
    let attrs = Arc::new(
        AttributeSet::new(vec![
            SymbolicAttribute::new("A", 2).into(),
            NumericalAttribute::new("B").into(),
            SymbolicAttribute::new("Goal", 2).into(),
        ])
        .unwrap(),
    );
    let items = [(0, 0), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(a, g)| {
            Item::new(vec![
                known_symbolic(a),
                known_numerical(1.0),
                known_symbolic(g),
            ])
        })
        .collect();
    let goal = goal_of(&attrs);
    (attrs, items, goal)
}

/// Four known items plus one whose `A` is unknown, all of unit weight.
pub fn unknown_value_set() -> (Arc<AttributeSet>, WeightedItemSet, SymbolicAttribute) {
    let attrs = Arc::new(
        AttributeSet::new(vec![
            SymbolicAttribute::new("A", 2).into(),
            SymbolicAttribute::new("Goal", 2).into(),
        ])
        .unwrap(),
    );
    let mut set = WeightedItemSet::new(Arc::clone(&attrs));
    let rows = [
        (known_symbolic(0), 0),
        (known_symbolic(0), 0),
        (known_symbolic(0), 1),
        (known_symbolic(1), 1),
        (AttributeValue::UnknownSymbolic, 0),
    ];
    for (a, g) in rows {
        set.add_unit(Item::new(vec![a, known_symbolic(g)])).unwrap();
    }
    let goal = goal_of(&attrs);
    (attrs, set, goal)
}

/// The fourteen-day weather table, with one unknown humidity.
pub fn weather_set() -> (Arc<AttributeSet>, Vec<Item>, SymbolicAttribute) {
    let labels = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
    let attrs = Arc::new(
        AttributeSet::new(vec![
            SymbolicAttribute::with_labels("Outlook", labels(&["sunny", "overcast", "rainy"]))
                .into(),
            NumericalAttribute::new("Temperature").into(),
            NumericalAttribute::new("Humidity").into(),
            SymbolicAttribute::with_labels("Windy", labels(&["false", "true"])).into(),
            SymbolicAttribute::with_labels("Goal", labels(&["no", "yes"])).into(),
        ])
        .unwrap(),
    );
    let rows: [(usize, f64, Option<f64>, usize, usize); 14] = [
        (0, 85.0, Some(85.0), 0, 0),
        (0, 80.0, Some(90.0), 1, 0),
        (1, 83.0, Some(86.0), 0, 1),
        (2, 70.0, Some(96.0), 0, 1),
        (2, 68.0, Some(80.0), 0, 1),
        (2, 65.0, Some(70.0), 1, 0),
        (1, 64.0, Some(65.0), 1, 1),
        (0, 72.0, Some(95.0), 0, 0),
        (0, 69.0, Some(70.0), 0, 1),
        (2, 75.0, None, 0, 1),
        (0, 75.0, Some(70.0), 1, 1),
        (1, 72.0, Some(90.0), 1, 1),
        (1, 81.0, Some(75.0), 0, 1),
        (2, 71.0, Some(91.0), 1, 0),
    ];
    let items = rows
        .iter()
        .map(|&(outlook, temperature, humidity, windy, goal)| {
            Item::new(vec![
                known_symbolic(outlook),
                known_numerical(temperature),
                humidity.map_or(AttributeValue::UnknownNumerical, known_numerical),
                known_symbolic(windy),
                known_symbolic(goal),
            ])
        })
        .collect();
    let goal = goal_of(&attrs);
    (attrs, items, goal)
}

/// The weather table as an ARFF document, goal last.
pub const WEATHER_ARFF: &str = "% weather
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {FALSE, TRUE}
@attribute play {no, yes}
@data
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
rainy,68,80,FALSE,yes
rainy,65,70,TRUE,no
overcast,64,65,TRUE,yes
sunny,72,95,FALSE,no
sunny,69,70,FALSE,yes
rainy,75,?,FALSE,yes
sunny,75,70,TRUE,yes
overcast,72,90,TRUE,yes
overcast,81,75,FALSE,yes
rainy,71,91,TRUE,no
";
