use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::Attribute;
use crate::core::error::{Result, TreeError};
use std::fmt;

/// A fixed-width vector of attribute values, one per attribute of the
/// attribute set it was built against.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    values: Box<[AttributeValue]>,
}

impl Item {
    pub fn new(values: Vec<AttributeValue>) -> Item {
        Item {
            values: values.into_boxed_slice(),
        }
    }

    /// Builds an item after checking arity and value kinds against
    /// `attribute_set`.
    pub fn checked(attribute_set: &AttributeSet, values: Vec<AttributeValue>) -> Result<Item> {
        let item = Item::new(values);
        item.check_against(attribute_set)?;
        Ok(item)
    }

    pub(crate) fn check_against(&self, attribute_set: &AttributeSet) -> Result<()> {
        if self.values.len() != attribute_set.size() {
            return Err(TreeError::IncompatibleItem {
                expected: attribute_set.size(),
                found: self.values.len(),
            });
        }
        for (attr, value) in attribute_set.iter().zip(self.values.iter()) {
            attr.check_value(value)?;
        }
        Ok(())
    }

    pub fn value_of(&self, index: usize) -> Option<AttributeValue> {
        self.values.get(index).copied()
    }

    pub fn value_of_attribute(
        &self,
        attribute_set: &AttributeSet,
        attribute: &Attribute,
    ) -> Result<AttributeValue> {
        let index = attribute_set.require_index(attribute)?;
        self.value_of(index).ok_or(TreeError::IncompatibleItem {
            expected: attribute_set.size(),
            found: self.values.len(),
        })
    }

    pub fn num_of_attributes(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.values.iter() {
            write!(f, "[{value}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::{NumericalAttribute, SymbolicAttribute};

    fn attrs() -> AttributeSet {
        AttributeSet::new(vec![
            NumericalAttribute::new("x").into(),
            SymbolicAttribute::new("y", 2).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_checked_accepts_matching_values() {
        let item = Item::checked(
            &attrs(),
            vec![AttributeValue::KnownNumerical(1.0), AttributeValue::UnknownSymbolic],
        )
        .unwrap();
        assert_eq!(item.num_of_attributes(), 2);
        assert_eq!(item.value_of(1), Some(AttributeValue::UnknownSymbolic));
        assert_eq!(item.value_of(2), None);
    }

    #[test]
    fn test_checked_rejects_wrong_arity() {
        let err = Item::checked(&attrs(), vec![AttributeValue::KnownNumerical(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::IncompatibleItem {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_checked_rejects_unknown_of_wrong_kind() {
        let err = Item::checked(
            &attrs(),
            vec![AttributeValue::UnknownSymbolic, AttributeValue::KnownSymbolic(0)],
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::ValueKindMismatch { .. }));
    }

    #[test]
    fn test_value_of_attribute() {
        let set = attrs();
        let item = Item::new(vec![
            AttributeValue::KnownNumerical(3.5),
            AttributeValue::KnownSymbolic(1),
        ]);
        let y = set.attribute(1).unwrap().clone();
        assert_eq!(
            item.value_of_attribute(&set, &y).unwrap(),
            AttributeValue::KnownSymbolic(1)
        );
        assert_eq!(item.to_string(), "[3.5][1]");
    }
}
