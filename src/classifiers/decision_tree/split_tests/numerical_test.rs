use super::SplitTest;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, NumericalAttribute};
use crate::core::error::{Result, TreeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// "Is the value below the threshold?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumericalTest {
    attribute: NumericalAttribute,
    threshold: f64,
}

impl NumericalTest {
    pub fn new(attribute: NumericalAttribute, threshold: f64) -> NumericalTest {
        NumericalTest {
            attribute,
            threshold,
        }
    }

    pub fn attribute(&self) -> &NumericalAttribute {
        &self.attribute
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl SplitTest for NumericalTest {
    fn attribute(&self) -> Attribute {
        self.attribute.clone().into()
    }

    fn perform(&self, value: &AttributeValue) -> Result<usize> {
        match value {
            AttributeValue::KnownNumerical(v) => Ok(usize::from(*v < self.threshold)),
            AttributeValue::UnknownNumerical => {
                Err(TreeError::UnknownValue(self.attribute.name().to_string()))
            }
            _ => Err(TreeError::ValueKindMismatch {
                attribute: self.attribute.name().to_string(),
                expected: "numerical",
            }),
        }
    }
}

impl fmt::Display for NumericalTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} < {}", self.attribute.name(), self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perform_below_threshold_is_yes() {
        let test = NumericalTest::new(NumericalAttribute::new("px"), 2.5);
        assert_eq!(test.perform(&AttributeValue::KnownNumerical(1.0)).unwrap(), 1);
        assert_eq!(test.perform(&AttributeValue::KnownNumerical(2.5)).unwrap(), 0);
        assert_eq!(test.perform(&AttributeValue::KnownNumerical(7.0)).unwrap(), 0);
    }

    #[test]
    fn test_perform_rejects_unknown() {
        let test = NumericalTest::new(NumericalAttribute::new("px"), 2.5);
        assert!(matches!(
            test.perform(&AttributeValue::UnknownNumerical),
            Err(TreeError::UnknownValue(_))
        ));
        assert!(test.perform(&AttributeValue::KnownSymbolic(1)).is_err());
    }

    #[test]
    fn test_display() {
        let test = NumericalTest::new(NumericalAttribute::new("Duration"), 0.5);
        assert_eq!(test.to_string(), "Duration < 0.5");
    }
}
