use crate::classifiers::Classifier;
use crate::classifiers::classifier::most_probable;
use crate::classifiers::decision_tree::TestDecisionTree;
use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_value::AttributeValue;
use crate::core::attributes::Attribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;
use crate::evaluation::{ClassificationEvaluator, Snapshot};
use crate::streams::{ArffFileStream, ItemStream};
use anyhow::{Context, anyhow};
use cpu_time::ThreadTime;
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use strum_macros::{Display, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub probability: f64,
    pub distribution: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Column {
    source: Option<usize>,
    /// Input code to model code, for symbolic columns whose label tables
    /// both exist.
    recode: Option<Vec<Option<usize>>>,
}

/// Maps the columns of an input file onto a model's attribute set by name.
/// Columns the input lacks become unknown values.
#[derive(Debug, Clone)]
pub(crate) struct ColumnMapping {
    model: AttributeSet,
    columns: Vec<Column>,
}

impl ColumnMapping {
    pub(crate) fn new(model: &AttributeSet, input: &AttributeSet) -> Result<ColumnMapping> {
        let mut columns = Vec::with_capacity(model.size());
        for attr in model.iter() {
            let Some(source) = input.index_of_name(attr.name()) else {
                debug!("input has no column '{}'", attr.name());
                columns.push(Column {
                    source: None,
                    recode: None,
                });
                continue;
            };
            let recode = match (attr, input.attribute(source)) {
                (Attribute::Numerical(_), Some(Attribute::Numerical(_))) => None,
                (Attribute::Symbolic(m), Some(Attribute::Symbolic(i))) => {
                    match (m.labels(), i.labels()) {
                        (Some(_), Some(labels)) => Some(
                            labels.iter().map(|l| m.index_of_label(l)).collect::<Vec<_>>(),
                        ),
                        _ => None,
                    }
                }
                _ => {
                    return Err(TreeError::ValueKindMismatch {
                        attribute: attr.name().to_string(),
                        expected: attr.kind_name(),
                    });
                }
            };
            columns.push(Column {
                source: Some(source),
                recode,
            });
        }
        Ok(ColumnMapping {
            model: model.clone(),
            columns,
        })
    }

    pub(crate) fn has_column(&self, model_index: usize) -> bool {
        self.columns
            .get(model_index)
            .is_some_and(|c| c.source.is_some())
    }

    /// Rewrites an input item in model order. Labels the model never saw
    /// become unknown values.
    pub(crate) fn map(&self, item: &Item) -> Item {
        let values = self
            .model
            .iter()
            .zip(self.columns.iter())
            .map(|(attr, column)| {
                let value = column.source.and_then(|s| item.value_of(s));
                match (value, attr) {
                    (Some(AttributeValue::KnownSymbolic(code)), Attribute::Symbolic(s)) => {
                        let code = match &column.recode {
                            Some(table) => table.get(code).copied().flatten(),
                            None => Some(code).filter(|c| *c < s.num_of_values()),
                        };
                        code.map_or(AttributeValue::UnknownSymbolic, AttributeValue::KnownSymbolic)
                    }
                    (Some(v @ AttributeValue::KnownNumerical(_)), Attribute::Numerical(_)) => v,
                    _ => attr.unknown_value(),
                }
            })
            .collect();
        Item::new(values)
    }
}

#[derive(Debug, Clone)]
pub struct ClassifyReport {
    pub predictions: usize,
    /// Present when the input carries the goal column.
    pub evaluation: Option<Snapshot>,
}

pub struct ClassifyTask {
    model: PathBuf,
    input: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
}

impl ClassifyTask {
    pub fn new(
        model: PathBuf,
        input: PathBuf,
        output: Option<PathBuf>,
        format: OutputFormat,
    ) -> ClassifyTask {
        ClassifyTask {
            model,
            input,
            output,
            format,
        }
    }

    pub fn run(&self) -> anyhow::Result<ClassifyReport> {
        let start_cpu = ThreadTime::now();
        let model = TestDecisionTree::load(&self.model)
            .with_context(|| format!("failed to load model {}", self.model.display()))?;
        let mut stream = ArffFileStream::new(self.input.clone())
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let mapping = ColumnMapping::new(model.attribute_set(), stream.attribute_set())
            .context("input does not match the model")?;

        let goal = model.goal_attribute().clone();
        let goal_index = model.goal_index();
        let mut evaluator = mapping
            .has_column(goal_index)
            .then(|| ClassificationEvaluator::new(goal.num_of_values()));

        let mut predictions = Vec::new();
        let mut index = 0;
        while let Some(raw) = stream.next_item() {
            let item = mapping.map(&raw);
            let distribution = model
                .goal_value_distribution(&item)
                .with_context(|| format!("failed to classify item {index}"))?;
            let code = most_probable(&distribution)
                .ok_or_else(|| anyhow!("goal '{}' has no values", goal.name()))?;

            if let Some(evaluator) = evaluator.as_mut() {
                match item.value_of(goal_index) {
                    Some(AttributeValue::KnownSymbolic(truth)) => {
                        evaluator.add_result(truth, code, 1.0)?
                    }
                    _ => {
                        warn!("item {index} has no known '{}' value, skipped", goal.name());
                        evaluator.add_skipped();
                    }
                }
            }

            predictions.push(Prediction {
                index,
                label: goal.value_to_string(&AttributeValue::KnownSymbolic(code)),
                probability: distribution[code],
                distribution,
            });
            index += 1;
        }

        self.write_predictions(&predictions)?;
        info!("classified {} items", predictions.len());

        let seconds = start_cpu.elapsed().as_secs_f64();
        Ok(ClassifyReport {
            predictions: predictions.len(),
            evaluation: evaluator.map(|e| e.snapshot(seconds)),
        })
    }

    fn write_predictions(&self, predictions: &[Prediction]) -> anyhow::Result<()> {
        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer = BufWriter::new(sink);
        write_predictions(&mut writer, predictions, self.format)?;
        writer.flush()?;
        Ok(())
    }
}

pub fn write_predictions<W: Write>(
    writer: &mut W,
    predictions: &[Prediction],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => {
            writeln!(writer, "index,label,probability")?;
            for p in predictions {
                writeln!(writer, "{},{},{}", p.index, csv_field(&p.label), p.probability)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, predictions)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainConfig;
    use crate::core::attributes::{NumericalAttribute, SymbolicAttribute};
    use crate::tasks::TrainTask;
    use crate::testing::WEATHER_ARFF;
    use std::str::FromStr;
    use tempfile::{NamedTempFile, tempdir};

    fn labelled(name: &str, labels: &[&str]) -> Attribute {
        SymbolicAttribute::with_labels(name, labels.iter().map(|l| l.to_string()).collect()).into()
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn mapping_reorders_columns_and_recodes_labels() {
        let model = AttributeSet::new(vec![
            labelled("color", &["red", "green"]),
            NumericalAttribute::new("size").into(),
            labelled("goal", &["no", "yes"]),
        ])
        .unwrap();
        let input = AttributeSet::new(vec![
            NumericalAttribute::new("SIZE").into(),
            labelled("color", &["green", "blue", "red"]),
        ])
        .unwrap();
        let mapping = ColumnMapping::new(&model, &input).unwrap();
        assert!(mapping.has_column(0));
        assert!(!mapping.has_column(2));

        let item = Item::new(vec![
            AttributeValue::KnownNumerical(3.0),
            AttributeValue::KnownSymbolic(0),
        ]);
        assert_eq!(
            mapping.map(&item).values(),
            &[
                AttributeValue::KnownSymbolic(1),
                AttributeValue::KnownNumerical(3.0),
                AttributeValue::UnknownSymbolic,
            ]
        );

        let blue = Item::new(vec![
            AttributeValue::UnknownNumerical,
            AttributeValue::KnownSymbolic(1),
        ]);
        assert_eq!(
            mapping.map(&blue).value_of(0),
            Some(AttributeValue::UnknownSymbolic)
        );
    }

    #[test]
    fn mapping_rejects_kind_change() {
        let model = AttributeSet::new(vec![NumericalAttribute::new("x").into()]).unwrap();
        let input = AttributeSet::new(vec![labelled("x", &["a"])]).unwrap();
        assert!(matches!(
            ColumnMapping::new(&model, &input),
            Err(TreeError::ValueKindMismatch { .. })
        ));
    }

    #[test]
    fn csv_output_quotes_labels() {
        let predictions = vec![Prediction {
            index: 0,
            label: "a,b".into(),
            probability: 0.75,
            distribution: vec![0.75, 0.25],
        }];
        let mut buf = Vec::new();
        write_predictions(&mut buf, &predictions, OutputFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "index,label,probability\n0,\"a,b\",0.75\n"
        );
    }

    #[test]
    fn classify_task_scores_training_file() {
        let mut data = NamedTempFile::new().unwrap();
        data.write_all(WEATHER_ARFF.as_bytes()).unwrap();
        data.flush().unwrap();
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("model.json");
        TrainTask::new(
            data.path().to_path_buf(),
            model_path.clone(),
            TrainConfig::default(),
        )
        .run()
        .unwrap();

        let out = dir.path().join("predictions.json");
        let report = ClassifyTask::new(
            model_path,
            data.path().to_path_buf(),
            Some(out.clone()),
            OutputFormat::Json,
        )
        .run()
        .unwrap();
        assert_eq!(report.predictions, 14);
        let evaluation = report.evaluation.unwrap();
        assert_eq!(evaluation.items_seen, 14);
        assert!(evaluation.accuracy > 0.9);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        let first = &written.as_array().unwrap()[0];
        assert_eq!(first["label"], "no");
        assert_eq!(first["index"], 0);
    }
}
