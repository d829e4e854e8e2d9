use super::SymbolicAttribute;
use crate::core::attribute_value::AttributeValue;
use std::fmt;

/// Growable label table used while features are being assembled. Converts
/// into a [`SymbolicAttribute`] once the domain is final.
#[derive(Debug, Clone, Default)]
pub struct IdSymbolicAttribute {
    name: String,
    ids: Vec<String>,
}

impl IdSymbolicAttribute {
    pub fn new(name: impl Into<String>, ids: Vec<String>) -> IdSymbolicAttribute {
        IdSymbolicAttribute {
            name: name.into(),
            ids,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_of_values(&self) -> usize {
        self.ids.len()
    }

    /// Returns the code of `value`, appending it to the table if unseen.
    pub fn add_value(&mut self, value: &str) -> usize {
        match self.ids.iter().position(|id| id == value) {
            Some(code) => code,
            None => {
                self.ids.push(value.to_string());
                self.ids.len() - 1
            }
        }
    }

    pub fn value_to_string(&self, value: &AttributeValue) -> String {
        match value {
            AttributeValue::KnownSymbolic(code) => self
                .ids
                .get(*code)
                .cloned()
                .unwrap_or_else(|| code.to_string()),
            other => other.to_string(),
        }
    }
}

impl From<IdSymbolicAttribute> for SymbolicAttribute {
    fn from(value: IdSymbolicAttribute) -> Self {
        SymbolicAttribute::with_labels(value.name, value.ids)
    }
}

impl fmt::Display for IdSymbolicAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        for (i, id) in self.ids.iter().enumerate() {
            write!(f, "{i}-{id};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_value_appends_only_new_ids() {
        let mut attr = IdSymbolicAttribute::new("protocol", vec!["TCP".into(), "UDP".into()]);
        assert_eq!(attr.add_value("UDP"), 1);
        assert_eq!(attr.add_value("Mixed"), 2);
        assert_eq!(attr.add_value("Mixed"), 2);
        assert_eq!(attr.num_of_values(), 3);
    }

    #[test]
    fn test_converts_into_symbolic_with_labels() {
        let mut attr = IdSymbolicAttribute::new("type", Vec::new());
        attr.add_value("normal");
        attr.add_value("scan");
        let symbolic: SymbolicAttribute = attr.into();
        assert_eq!(symbolic.num_of_values(), 2);
        assert_eq!(symbolic.label(1), Some("scan"));
    }

    #[test]
    fn test_display_lists_codes() {
        let attr = IdSymbolicAttribute::new("p", vec!["TCP".into(), "UDP".into()]);
        assert_eq!(attr.to_string(), "p: 0-TCP;1-UDP;");
        assert_eq!(attr.value_to_string(&AttributeValue::KnownSymbolic(0)), "TCP");
    }
}
