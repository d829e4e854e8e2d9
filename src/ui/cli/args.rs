use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueHint};
use schemars::Schema;
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::classifiers::decision_tree::ModelDocument;
use crate::config::{KeyValue, TrainConfig, parse_key_value};
use crate::tasks::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Entropy-driven decision tree induction over ARFF data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a tree from an ARFF file and save it as a JSON model
    Train(TrainArgs),
    /// Predict the goal value of every item of an ARFF file
    Classify(ClassifyArgs),
    /// Train on part of an ARFF file and score the held-out rest
    Evaluate(EvaluateArgs),
    /// Print a saved model's header, statistics and tree
    Inspect(InspectArgs),
    /// Print a JSON Schema (model document or training configuration)
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// JSON file with training parameters
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override training parameters (key=value, nested keys with dots)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<KeyValue>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<TrainConfig> {
        TrainConfig::load(self.config.as_deref(), &self.params)
    }
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// ARFF file with the learning set
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Where to write the model
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Model written by `train`
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub model: PathBuf,

    /// ARFF file with the items to classify
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Prediction file (omit for stdout)
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Prediction format (csv, json)
    #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// ARFF file to split into training and test items
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Model written by `train`
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub model: PathBuf,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Which document to describe (model, train-config)
    #[arg(value_name = "KIND", default_value = "model", value_parser = parse_kind::<SchemaKind>)]
    pub kind: SchemaKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SchemaKind {
    /// Model document written by `train`
    Model,
    /// Training configuration read by `--config`
    TrainConfig,
}

impl SchemaKind {
    pub fn schema(self) -> Schema {
        match self {
            SchemaKind::Model => ModelDocument::schema(),
            SchemaKind::TrainConfig => TrainConfig::schema(),
        }
    }
}

/// Parses `raw` trying a few spellings (as typed, lowercase, kebab-case).
pub fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    for cand in candidate_spellings(raw) {
        if let Ok(parsed) = cand.parse::<T>() {
            return Ok(parsed);
        }
    }
    Err(anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return out;
    }

    out.push(trimmed.to_string());
    out.push(trimmed.to_lowercase());
    out.push(kebab_from_token(trimmed));
    out.push(trimmed.replace('_', "-"));
    out.sort();
    out.dedup();
    out
}

fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            buf.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    if buf.is_empty() {
        token.to_lowercase()
    } else {
        buf
    }
}
