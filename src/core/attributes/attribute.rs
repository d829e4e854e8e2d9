use super::{IdSymbolicAttribute, NumericalAttribute, SymbolicAttribute};
use crate::core::attribute_value::AttributeValue;
use crate::core::error::{Result, TreeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named, typed column of an item.
///
/// Attributes are identified by name alone, compared case-insensitively: two
/// attributes with the same name are equal even when their domains differ.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Attribute {
    Symbolic(SymbolicAttribute),
    Numerical(NumericalAttribute),
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl Attribute {
    pub fn name(&self) -> &str {
        match self {
            Attribute::Symbolic(s) => s.name(),
            Attribute::Numerical(n) => n.name(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Attribute::Symbolic(_) => "symbolic",
            Attribute::Numerical(_) => "numerical",
        }
    }

    pub fn as_symbolic(&self) -> Option<&SymbolicAttribute> {
        match self {
            Attribute::Symbolic(s) => Some(s),
            Attribute::Numerical(_) => None,
        }
    }

    pub fn as_numerical(&self) -> Option<&NumericalAttribute> {
        match self {
            Attribute::Numerical(n) => Some(n),
            Attribute::Symbolic(_) => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Attribute::Symbolic(_))
    }

    /// The unknown value matching this attribute's kind.
    pub fn unknown_value(&self) -> AttributeValue {
        match self {
            Attribute::Symbolic(_) => AttributeValue::UnknownSymbolic,
            Attribute::Numerical(_) => AttributeValue::UnknownNumerical,
        }
    }

    /// Checks that `value` can be stored in a column of this attribute.
    pub fn check_value(&self, value: &AttributeValue) -> Result<()> {
        match (self, value) {
            (Attribute::Symbolic(s), AttributeValue::KnownSymbolic(code)) => {
                if *code >= s.num_of_values() {
                    Err(TreeError::SymbolicValueOutOfDomain {
                        attribute: s.name().to_string(),
                        code: *code,
                        num_of_values: s.num_of_values(),
                    })
                } else {
                    Ok(())
                }
            }
            (Attribute::Symbolic(_), AttributeValue::UnknownSymbolic) => Ok(()),
            (Attribute::Numerical(_), AttributeValue::KnownNumerical(v)) if !v.is_nan() => Ok(()),
            (Attribute::Numerical(_), AttributeValue::UnknownNumerical) => Ok(()),
            _ => Err(TreeError::ValueKindMismatch {
                attribute: self.name().to_string(),
                expected: self.kind_name(),
            }),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name().trim().is_empty() {
            return Err(TreeError::InvalidInput("attribute name is empty".into()));
        }
        if let Attribute::Symbolic(s) = self {
            if let Some(labels) = s.labels() {
                if labels.len() != s.num_of_values() {
                    return Err(TreeError::InvalidInput(format!(
                        "attribute '{}' declares {} values but {} labels",
                        s.name(),
                        s.num_of_values(),
                        labels.len()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn arff_representation(&self) -> String {
        match self {
            Attribute::Symbolic(s) => {
                let values: Vec<String> = (0..s.num_of_values())
                    .map(|code| s.value_to_string(&AttributeValue::KnownSymbolic(code)))
                    .collect();
                format!("@attribute {} {{ {} }}", s.name(), values.join(", "))
            }
            Attribute::Numerical(n) => format!("@attribute {} numeric", n.name()),
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        names_match(self.name(), other.name())
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().to_lowercase().hash(state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SymbolicAttribute> for Attribute {
    fn from(value: SymbolicAttribute) -> Self {
        Attribute::Symbolic(value)
    }
}

impl From<NumericalAttribute> for Attribute {
    fn from(value: NumericalAttribute) -> Self {
        Attribute::Numerical(value)
    }
}

impl From<IdSymbolicAttribute> for Attribute {
    fn from(value: IdSymbolicAttribute) -> Self {
        Attribute::Symbolic(value.into())
    }
}
