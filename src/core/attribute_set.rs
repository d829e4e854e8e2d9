use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use std::fmt;

/// Immutable, insertion-ordered set of distinct attributes.
///
/// Items and tests address attributes by their position in this set, so the
/// set never changes once built.
#[derive(Clone, PartialEq)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new(attributes: Vec<Attribute>) -> Result<AttributeSet> {
        for (i, attr) in attributes.iter().enumerate() {
            attr.validate()?;
            if attributes[..i].contains(attr) {
                return Err(TreeError::DuplicateAttribute(attr.name().to_string()));
            }
        }
        Ok(AttributeSet { attributes })
    }

    pub fn size(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn index_of(&self, attribute: &Attribute) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.find_by_name(name)
            .and_then(|attr| self.index_of(attr))
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.index_of(attribute).is_some()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name().to_lowercase() == name.to_lowercase())
    }

    /// Index of `attribute`, or an `UnknownAttribute` error.
    pub fn require_index(&self, attribute: &Attribute) -> Result<usize> {
        self.index_of(attribute)
            .ok_or_else(|| TreeError::UnknownAttribute(attribute.name().to_string()))
    }

    pub fn require_name(&self, name: &str) -> Result<usize> {
        self.index_of_name(name)
            .ok_or_else(|| TreeError::UnknownAttribute(name.to_string()))
    }

    /// Looks up a symbolic attribute by name.
    pub fn symbolic_by_name(&self, name: &str) -> Result<&SymbolicAttribute> {
        let attr = self
            .find_by_name(name)
            .ok_or_else(|| TreeError::UnknownAttribute(name.to_string()))?;
        attr.as_symbolic()
            .ok_or_else(|| TreeError::NotSymbolic(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSet")
            .field(
                "attributes",
                &self.attributes.iter().map(Attribute::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.attributes {
            writeln!(f, "{}", attr.arff_representation())?;
        }
        Ok(())
    }
}
