use super::attribute::names_match;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NumericalAttribute {
    name: String,
}

impl NumericalAttribute {
    pub fn new(name: impl Into<String>) -> NumericalAttribute {
        NumericalAttribute { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for NumericalAttribute {
    fn eq(&self, other: &Self) -> bool {
        names_match(&self.name, &other.name)
    }
}
