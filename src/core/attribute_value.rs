use std::fmt;

/// The value of one attribute of an item.
///
/// Unknown values carry no payload; an unknown must always be represented by
/// the variant matching its attribute's kind, never by a sentinel number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    KnownNumerical(f64),
    KnownSymbolic(usize),
    UnknownNumerical,
    UnknownSymbolic,
}

impl AttributeValue {
    pub fn is_unknown(&self) -> bool {
        matches!(
            self,
            AttributeValue::UnknownNumerical | AttributeValue::UnknownSymbolic
        )
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(
            self,
            AttributeValue::KnownSymbolic(_) | AttributeValue::UnknownSymbolic
        )
    }

    pub fn symbolic_code(&self) -> Option<usize> {
        match self {
            AttributeValue::KnownSymbolic(code) => Some(*code),
            _ => None,
        }
    }

    pub fn numerical_value(&self) -> Option<f64> {
        match self {
            AttributeValue::KnownNumerical(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::KnownNumerical(v) => write!(f, "{v}"),
            AttributeValue::KnownSymbolic(code) => write!(f, "{code}"),
            AttributeValue::UnknownNumerical | AttributeValue::UnknownSymbolic => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variants_report_unknown() {
        assert!(AttributeValue::UnknownNumerical.is_unknown());
        assert!(AttributeValue::UnknownSymbolic.is_unknown());
        assert!(!AttributeValue::KnownNumerical(0.0).is_unknown());
        assert!(!AttributeValue::KnownSymbolic(0).is_unknown());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(AttributeValue::KnownSymbolic(4).symbolic_code(), Some(4));
        assert_eq!(AttributeValue::KnownNumerical(2.5).symbolic_code(), None);
        assert_eq!(AttributeValue::KnownNumerical(2.5).numerical_value(), Some(2.5));
        assert!(AttributeValue::UnknownSymbolic.is_symbolic());
        assert!(!AttributeValue::UnknownNumerical.is_symbolic());
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::KnownNumerical(1.5).to_string(), "1.5");
        assert_eq!(AttributeValue::KnownSymbolic(2).to_string(), "2");
        assert_eq!(AttributeValue::UnknownNumerical.to_string(), "?");
    }
}
