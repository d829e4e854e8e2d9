use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::{Attribute, NumericalAttribute, SymbolicAttribute};
use crate::core::items::Item;
use crate::utils::file_parsing::{split_csv_preserving_quotes, strip_surrounding_quotes};
use std::io::{BufRead, Error, ErrorKind, Seek};

#[derive(Debug)]
pub(super) enum AttributeKind {
    Numerical,
    Symbolic(Vec<String>),
}

pub(super) struct ArffHeader {
    pub relation: String,
    pub attribute_set: AttributeSet,
    pub data_start_pos: u64,
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidData, msg.into())
}

pub(super) fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}

fn read_directive<R: BufRead>(reader: &mut R, line: &mut String) -> Result<(), Error> {
    loop {
        line.clear();
        if reader.read_line(line)? == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "ARFF file ended before @data",
            ));
        }
        if !is_comment_or_empty(line) {
            return Ok(());
        }
    }
}

pub(super) fn parse_header<R: BufRead + Seek>(reader: &mut R) -> Result<ArffHeader, Error> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut line = String::new();

    loop {
        read_directive(reader, &mut line)?;
        let low = line.trim_start().to_ascii_lowercase();

        if low.starts_with("@relation") {
            if relation.is_some() || !attributes.is_empty() {
                return Err(invalid("@relation must come first and only once"));
            }
            let raw = line.trim()["@relation".len()..].trim();
            relation = Some(strip_surrounding_quotes(raw).to_string());
        } else if low.starts_with("@attribute") {
            let (name, kind) = parse_attribute_line(&line)?;
            attributes.push(match kind {
                AttributeKind::Numerical => NumericalAttribute::new(name).into(),
                AttributeKind::Symbolic(labels) => {
                    SymbolicAttribute::with_labels(name, labels).into()
                }
            });
        } else if low.starts_with("@data") {
            break;
        } else {
            return Err(invalid(format!(
                "Unsupported header directive: {}",
                line.trim()
            )));
        }
    }

    if attributes.is_empty() {
        return Err(invalid("ARFF header declares no attribute"));
    }
    let attribute_set = AttributeSet::new(attributes).map_err(|e| invalid(e.to_string()))?;

    Ok(ArffHeader {
        relation: relation.unwrap_or_else(|| "unnamed_relation".to_string()),
        attribute_set,
        data_start_pos: reader.stream_position()?,
    })
}

pub(super) fn parse_attribute_line(line: &str) -> Result<(String, AttributeKind), Error> {
    let trimmed = line.trim();
    let rest = trimmed
        .get(.."@attribute".len())
        .filter(|head| head.eq_ignore_ascii_case("@attribute"))
        .map(|_| trimmed["@attribute".len()..].trim())
        .ok_or_else(|| invalid("Line is not '@attribute'"))?;

    let (name, after_name) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let end = rest[1..]
                .find(quote)
                .map(|i| i + 1)
                .ok_or_else(|| invalid("Attribute name without closing quote marks"))?;
            (rest[1..end].to_string(), rest[end + 1..].trim())
        }
        _ => {
            let mut it = rest.splitn(2, char::is_whitespace);
            let name = it.next().unwrap_or_default().to_string();
            let after = it
                .next()
                .ok_or_else(|| invalid("Attribute type is missing"))?;
            (name, after.trim())
        }
    };

    let low = after_name.to_ascii_lowercase();
    if low.starts_with("numeric") || low.starts_with("real") || low.starts_with("integer") {
        return Ok((name, AttributeKind::Numerical));
    }

    if let Some(inside) = after_name.strip_prefix('{') {
        let close = inside
            .rfind('}')
            .ok_or_else(|| invalid("Symbolic domain without closing '}'"))?;
        let labels = split_csv_preserving_quotes(&inside[..close])
            .iter()
            .map(|s| strip_surrounding_quotes(s).to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if labels.is_empty() {
            return Err(invalid("Empty symbolic domain"));
        }
        return Ok((name, AttributeKind::Symbolic(labels)));
    }

    Err(invalid(format!("Attribute kind not supported: {after_name}")))
}

pub(super) fn parse_item(attribute_set: &AttributeSet, line: &str) -> Result<Item, Error> {
    let tokens = split_csv_preserving_quotes(line);
    if tokens.len() != attribute_set.size() {
        return Err(invalid(format!(
            "Number of columns ({}) differs from number of attributes ({})",
            tokens.len(),
            attribute_set.size()
        )));
    }

    let mut values = Vec::with_capacity(tokens.len());
    for (attr, raw) in attribute_set.iter().zip(tokens.iter()) {
        let raw = raw.trim();
        if raw == "?" {
            values.push(attr.unknown_value());
            continue;
        }
        values.push(match attr {
            Attribute::Numerical(n) => {
                let v: f64 = raw.parse().map_err(|_| {
                    invalid(format!(
                        "Invalid numeric value '{raw}' for attribute '{}'",
                        n.name()
                    ))
                })?;
                if v.is_nan() {
                    return Err(invalid(format!("NaN given for attribute '{}'", n.name())));
                }
                AttributeValue::KnownNumerical(v)
            }
            Attribute::Symbolic(s) => {
                let key = strip_surrounding_quotes(raw);
                let code = s.index_of_label(key).ok_or_else(|| {
                    invalid(format!(
                        "Value '{key}' not found in domain of attribute '{}'",
                        s.name()
                    ))
                })?;
                AttributeValue::KnownSymbolic(code)
            }
        });
    }

    Ok(Item::new(values))
}
