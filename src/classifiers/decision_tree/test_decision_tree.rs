use crate::classifiers::classifier::Classifier;
use crate::classifiers::decision_tree::decision_tree::DecisionTree;
use crate::classifiers::decision_tree::model_document::{
    FORMAT_VERSION, ModelDocument, ModelMetadata,
};
use crate::classifiers::decision_tree::node_record::NodeRecord;
use crate::core::attribute_set::AttributeSet;
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::{Result, TreeError};
use crate::core::items::Item;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

/// A finished tree used for classification only.
#[derive(Debug, Clone)]
pub struct TestDecisionTree {
    tree: DecisionTree,
    metadata: ModelMetadata,
}

impl TestDecisionTree {
    /// Rebuilds a tree from its breadth-first record array.
    pub fn from_nodes(
        attribute_set: Arc<AttributeSet>,
        goal: &SymbolicAttribute,
        records: &[NodeRecord],
    ) -> Result<TestDecisionTree> {
        Ok(TestDecisionTree {
            tree: DecisionTree::from_records(attribute_set, goal, records)?,
            metadata: ModelMetadata::default(),
        })
    }

    pub fn nodes(&self) -> Vec<NodeRecord> {
        self.tree.flatten()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn with_metadata(mut self, metadata: ModelMetadata) -> TestDecisionTree {
        self.metadata = metadata;
        self
    }

    pub fn to_document(&self) -> ModelDocument {
        ModelDocument {
            format_version: FORMAT_VERSION,
            metadata: self.metadata.clone(),
            attributes: self.tree.attribute_set().attributes().to_vec(),
            goal_attribute: self.tree.goal_attribute().name().to_string(),
            nodes: self.nodes(),
        }
    }

    pub fn from_document(document: ModelDocument) -> Result<TestDecisionTree> {
        if document.format_version != FORMAT_VERSION {
            return Err(TreeError::InvalidInput(format!(
                "unsupported model format version {} (expected {FORMAT_VERSION})",
                document.format_version
            )));
        }
        let attribute_set = Arc::new(AttributeSet::new(document.attributes)?);
        let goal = attribute_set
            .symbolic_by_name(&document.goal_attribute)?
            .clone();
        Ok(TestDecisionTree::from_nodes(attribute_set, &goal, &document.nodes)?
            .with_metadata(document.metadata))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> Result<TestDecisionTree> {
        TestDecisionTree::from_document(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.to_document())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("model saved to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<TestDecisionTree> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let document: ModelDocument = serde_json::from_reader(reader)?;
        let tree = TestDecisionTree::from_document(document)?;
        info!(
            "model loaded from {} ({} nodes)",
            path.display(),
            tree.stats().nodes
        );
        Ok(tree)
    }
}

impl Deref for TestDecisionTree {
    type Target = DecisionTree;

    fn deref(&self) -> &DecisionTree {
        &self.tree
    }
}

impl Classifier for TestDecisionTree {
    fn goal_attribute(&self) -> &SymbolicAttribute {
        self.tree.goal_attribute()
    }

    fn goal_value_distribution(&self, item: &Item) -> Result<Vec<f64>> {
        self.tree.goal_value_distribution(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::{NumericalTest, Test};
    use crate::core::attribute_value::AttributeValue;
    use crate::core::attributes::NumericalAttribute;
    use tempfile::NamedTempFile;

    fn small_model() -> TestDecisionTree {
        let attrs = Arc::new(
            AttributeSet::new(vec![
                NumericalAttribute::new("x").into(),
                SymbolicAttribute::with_labels("goal", vec!["lo".into(), "hi".into()]).into(),
            ])
            .unwrap(),
        );
        let goal = attrs.symbolic_by_name("goal").unwrap().clone();
        let test: Test = NumericalTest::new(NumericalAttribute::new("x"), 0.1 + 0.2).into();
        let records = vec![
            NodeRecord::Anchor,
            NodeRecord::Test {
                weight: 3.0,
                sons: 2,
                test,
                score: Some(2.7548875021634687),
            },
            NodeRecord::Leaf {
                weight: 2.0,
                distribution: vec![0.0, 1.0],
                entropy: 0.0,
            },
            NodeRecord::Leaf {
                weight: 1.0,
                distribution: vec![1.0 / 3.0, 2.0 / 3.0],
                entropy: 0.9182958340544896,
            },
        ];
        TestDecisionTree::from_nodes(attrs, &goal, &records)
            .unwrap()
            .with_metadata(ModelMetadata {
                trained_at: Some("2024-01-01T00:00:00Z".into()),
                entropy_threshold: Some(0.0),
                score_threshold: Some(0.0001),
                training_weight: Some(3.0),
            })
    }

    #[test]
    fn test_json_roundtrip_is_exact() {
        let model = small_model();
        let json = model.to_json().unwrap();
        let back = TestDecisionTree::from_json(&json).unwrap();
        assert_eq!(back.nodes(), model.nodes());
        assert_eq!(back.metadata(), model.metadata());
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn test_save_and_load() {
        let model = small_model();
        let file = NamedTempFile::new().unwrap();
        model.save(file.path()).unwrap();
        let loaded = TestDecisionTree::load(file.path()).unwrap();

        let item = Item::new(vec![
            AttributeValue::KnownNumerical(5.0),
            AttributeValue::UnknownSymbolic,
        ]);
        assert_eq!(
            loaded.goal_value_distribution(&item).unwrap(),
            model.goal_value_distribution(&item).unwrap()
        );
        assert_eq!(loaded.guess_goal_attribute(&item).unwrap(), 1);
    }

    #[test]
    fn test_rejects_unknown_format_version() {
        let mut doc = small_model().to_document();
        doc.format_version = 99;
        assert!(matches!(
            TestDecisionTree::from_document(doc),
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_numerical_goal() {
        let mut doc = small_model().to_document();
        doc.goal_attribute = "x".into();
        assert!(matches!(
            TestDecisionTree::from_document(doc),
            Err(TreeError::NotSymbolic(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            TestDecisionTree::load("/definitely/not/here.json"),
            Err(TreeError::Io(_))
        ));
    }
}
