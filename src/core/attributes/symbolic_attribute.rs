use super::attribute::names_match;
use crate::core::attribute_value::AttributeValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An attribute with a finite domain of `num_of_values` codes.
///
/// When a label table is present, `labels[code]` is the display string of
/// `code`; it is owned by the attribute and travels with it into a model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SymbolicAttribute {
    name: String,
    num_of_values: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
}

impl SymbolicAttribute {
    pub fn new(name: impl Into<String>, num_of_values: usize) -> SymbolicAttribute {
        SymbolicAttribute {
            name: name.into(),
            num_of_values,
            labels: None,
        }
    }

    pub fn with_labels(name: impl Into<String>, labels: Vec<String>) -> SymbolicAttribute {
        SymbolicAttribute {
            name: name.into(),
            num_of_values: labels.len(),
            labels: Some(labels),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_of_values(&self) -> usize {
        self.num_of_values
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn label(&self, code: usize) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|l| l.get(code))
            .map(String::as_str)
    }

    pub fn index_of_label(&self, label: &str) -> Option<usize> {
        self.labels.as_ref()?.iter().position(|l| l == label)
    }

    pub fn value_to_string(&self, value: &AttributeValue) -> String {
        match value {
            AttributeValue::KnownSymbolic(code) => match self.label(*code) {
                Some(label) => label.to_string(),
                None => code.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl PartialEq for SymbolicAttribute {
    fn eq(&self, other: &Self) -> bool {
        names_match(&self.name, &other.name)
    }
}
