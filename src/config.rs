use crate::core::attribute_set::AttributeSet;
use crate::core::attributes::{Attribute, SymbolicAttribute};
use crate::core::error::{Result, TreeError};
use anyhow::{Context, bail};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Training parameters, read from an optional JSON file and `key=value`
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    #[schemars(
        title = "Goal",
        description = "Symbolic attribute to predict (None = last attribute)"
    )]
    pub goal: Option<String>,

    #[schemars(
        title = "Candidates",
        description = "Attributes the tree may test (None = every attribute but the goal)"
    )]
    pub candidates: Option<Vec<String>>,

    #[schemars(
        title = "Entropy Threshold",
        description = "Nodes whose goal entropy is at most this become leaves",
        range(min = 0.0)
    )]
    pub entropy_threshold: f64,

    #[schemars(
        title = "Score Threshold",
        description = "Minimum absolute information gain for a test node",
        range(min = 0.0)
    )]
    pub score_threshold: f64,

    #[schemars(
        title = "Holdout Fraction",
        description = "Share of items held out for testing by `evaluate`",
        range(min = 0.0, max = 1.0)
    )]
    pub holdout_fraction: f64,

    #[schemars(title = "Seed", description = "Shuffle seed used by `evaluate`")]
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            goal: None,
            candidates: None,
            entropy_threshold: 0.0,
            score_threshold: 0.0,
            holdout_fraction: 0.3,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl TrainConfig {
    /// Defaults, then the JSON file at `path`, then `overrides` in order.
    pub fn load(path: Option<&Path>, overrides: &[KeyValue]) -> anyhow::Result<TrainConfig> {
        let mut value = match path {
            Some(path) => {
                let reader = BufReader::new(
                    File::open(path)
                        .with_context(|| format!("failed to open config {}", path.display()))?,
                );
                serde_json::from_reader(reader)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => Value::Object(Map::new()),
        };
        apply_overrides(&mut value, overrides)?;

        let config: TrainConfig =
            serde_json::from_value(value).context("invalid training configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("entropy_threshold", self.entropy_threshold),
            ("score_threshold", self.score_threshold),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(TreeError::NegativeThreshold { name, value });
            }
        }
        if !(self.holdout_fraction > 0.0 && self.holdout_fraction < 1.0) {
            return Err(TreeError::InvalidInput(format!(
                "holdout_fraction must be in (0, 1) (got {})",
                self.holdout_fraction
            )));
        }
        Ok(())
    }

    /// Resolves the goal and candidate names against `attribute_set`.
    pub fn resolve(&self, attribute_set: &AttributeSet) -> Result<(SymbolicAttribute, AttributeSet)> {
        let goal = match &self.goal {
            Some(name) => attribute_set.symbolic_by_name(name)?,
            None => {
                let last = attribute_set
                    .attributes()
                    .last()
                    .ok_or(TreeError::EmptyAttributeSet)?;
                last.as_symbolic()
                    .ok_or_else(|| TreeError::NotSymbolic(last.name().to_string()))?
            }
        }
        .clone();
        let goal_attribute = Attribute::from(goal.clone());

        let candidates: Vec<Attribute> = match &self.candidates {
            Some(names) => names
                .iter()
                .map(|name| {
                    let attr = attribute_set
                        .find_by_name(name)
                        .ok_or_else(|| TreeError::UnknownAttribute(name.clone()))?;
                    if *attr == goal_attribute {
                        return Err(TreeError::InvalidInput(format!(
                            "goal attribute '{}' cannot also be a candidate",
                            goal.name()
                        )));
                    }
                    Ok(attr.clone())
                })
                .collect::<Result<_>>()?,
            None => attribute_set
                .iter()
                .filter(|a| **a != goal_attribute)
                .cloned()
                .collect(),
        };

        Ok((goal, AttributeSet::new(candidates)?))
    }

    pub fn schema() -> Schema {
        schema_for!(TrainConfig)
    }
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> anyhow::Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> anyhow::Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }
    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> anyhow::Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

/// Parses `KEY=VALUE`; the value is read as a JSON literal, falling back to
/// a plain string.
pub fn parse_key_value(raw: &str) -> std::result::Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::weather_set;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn kv(raw: &str) -> KeyValue {
        parse_key_value(raw).unwrap()
    }

    #[test]
    fn defaults() {
        let config = TrainConfig::load(None, &[]).unwrap();
        assert_eq!(config, TrainConfig::default());
        assert_eq!(config.holdout_fraction, 0.3);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn parse_key_value_literals() {
        assert_eq!(kv("seed=7").value, Value::from(7));
        assert_eq!(kv("goal = Play ").value, Value::from("Play"));
        assert_eq!(kv("candidates=[\"a\",\"b\"]").value, serde_json::json!(["a", "b"]));
        assert_eq!(kv("goal=").value, Value::from(""));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value(" =1").is_err());
    }

    #[test]
    fn file_then_overrides() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, r#"{{"score_threshold": 0.5, "seed": 1}}"#).unwrap();
        f.flush().unwrap();

        let config =
            TrainConfig::load(Some(f.path()), &[kv("seed=9"), kv("goal=Goal")]).unwrap();
        assert_eq!(config.score_threshold, 0.5);
        assert_eq!(config.seed, 9);
        assert_eq!(config.goal.as_deref(), Some("Goal"));
        assert_eq!(config.entropy_threshold, 0.0);
    }

    #[test]
    fn unknown_keys_and_bad_values_rejected() {
        assert!(TrainConfig::load(None, &[kv("depth=3")]).is_err());
        assert!(TrainConfig::load(None, &[kv("score_threshold=-1")]).is_err());
        assert!(TrainConfig::load(None, &[kv("holdout_fraction=1")]).is_err());
        assert!(TrainConfig::load(None, &[kv("seed.inner=1")]).is_err());
    }

    #[test]
    fn set_path_builds_nested_objects() {
        let mut v = Value::Null;
        set_path(&mut v, "a.b", Value::from(1)).unwrap();
        assert_eq!(v, serde_json::json!({"a": {"b": 1}}));
        assert!(set_path(&mut v, "", Value::from(1)).is_err());
        assert!(set_path(&mut v, "a.b.c", Value::from(1)).is_err());
    }

    #[test]
    fn validate_reports_threshold_name() {
        let config = TrainConfig {
            entropy_threshold: -0.5,
            ..TrainConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TreeError::NegativeThreshold {
                name: "entropy_threshold",
                ..
            })
        ));
    }

    #[test]
    fn resolve_defaults_to_last_attribute_and_the_rest() {
        let (attrs, _, _) = weather_set();
        let (goal, candidates) = TrainConfig::default().resolve(&attrs).unwrap();
        assert_eq!(goal.name(), "Goal");
        assert_eq!(candidates.size(), 4);
        assert!(candidates.find_by_name("goal").is_none());
    }

    #[test]
    fn resolve_explicit_names() {
        let (attrs, _, _) = weather_set();
        let config = TrainConfig {
            goal: Some("windy".into()),
            candidates: Some(vec!["outlook".into(), "Humidity".into()]),
            ..TrainConfig::default()
        };
        let (goal, candidates) = config.resolve(&attrs).unwrap();
        assert_eq!(goal.name(), "Windy");
        assert_eq!(candidates.attribute(1).unwrap().name(), "Humidity");
    }

    #[test]
    fn resolve_rejections() {
        let (attrs, _, _) = weather_set();
        let numerical_goal = TrainConfig {
            goal: Some("Temperature".into()),
            ..TrainConfig::default()
        };
        assert!(matches!(
            numerical_goal.resolve(&attrs),
            Err(TreeError::NotSymbolic(_))
        ));

        let goal_as_candidate = TrainConfig {
            candidates: Some(vec!["Goal".into()]),
            ..TrainConfig::default()
        };
        assert!(matches!(
            goal_as_candidate.resolve(&attrs),
            Err(TreeError::InvalidInput(_))
        ));

        let missing = TrainConfig {
            candidates: Some(vec!["Pressure".into()]),
            ..TrainConfig::default()
        };
        assert!(matches!(
            missing.resolve(&attrs),
            Err(TreeError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn schema_lists_fields() {
        let schema = serde_json::to_value(TrainConfig::schema()).unwrap();
        let props = schema.get("properties").unwrap();
        assert!(props.get("score_threshold").is_some());
        assert!(props.get("holdout_fraction").is_some());
    }
}
