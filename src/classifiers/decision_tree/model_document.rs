use crate::classifiers::decision_tree::node_record::NodeRecord;
use crate::core::attributes::Attribute;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: u32 = 1;

/// How a model was trained. Every field is optional so hand-assembled trees
/// can be saved too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ModelMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(title = "Trained At", description = "RFC 3339 timestamp of training")]
    pub trained_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Total weight of the learning set")]
    pub training_weight: Option<f64>,
}

/// Persisted form of a finished tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModelDocument {
    pub format_version: u32,

    #[serde(default)]
    pub metadata: ModelMetadata,

    /// Every attribute an item must carry, in column order.
    pub attributes: Vec<Attribute>,

    /// Name of the symbolic attribute the tree guesses.
    pub goal_attribute: String,

    /// Breadth-first node array, anchor first.
    pub nodes: Vec<NodeRecord>,
}

impl ModelDocument {
    pub fn schema() -> Schema {
        schema_for!(ModelDocument)
    }
}
