use crate::classifiers::decision_tree::{SimpleDecisionTreeBuilder, TestDecisionTree, TreeStats};
use crate::config::TrainConfig;
use crate::core::error::Result;
use crate::core::items::{ItemCollection, WeightedItemSet};
use crate::streams::read_item_set;
use anyhow::Context;
use cpu_time::ThreadTime;
use log::info;
use std::path::PathBuf;

/// Resolves goal and candidates from `config`, then grows and freezes a tree.
pub fn train_model(learning_set: WeightedItemSet, config: &TrainConfig) -> Result<TestDecisionTree> {
    config.validate()?;
    let (goal, candidates) = config.resolve(learning_set.attribute_set())?;
    SimpleDecisionTreeBuilder::new(learning_set, candidates, &goal)?
        .with_config(config)?
        .build_model()
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub goal: String,
    pub items: usize,
    pub weight: f64,
    pub stats: TreeStats,
    pub cpu_seconds: f64,
}

pub struct TrainTask {
    input: PathBuf,
    output: PathBuf,
    config: TrainConfig,
}

impl TrainTask {
    pub fn new(input: PathBuf, output: PathBuf, config: TrainConfig) -> TrainTask {
        TrainTask {
            input,
            output,
            config,
        }
    }

    pub fn run(&self) -> anyhow::Result<TrainReport> {
        let start_cpu = ThreadTime::now();

        let learning_set = read_item_set(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let items = learning_set.num_of_items();
        let weight = learning_set.size();

        let model = train_model(learning_set, &self.config).context("failed to build tree")?;
        model
            .save(&self.output)
            .with_context(|| format!("failed to save model to {}", self.output.display()))?;

        let report = TrainReport {
            goal: model.goal_attribute().name().to_string(),
            items,
            weight,
            stats: model.stats(),
            cpu_seconds: start_cpu.elapsed().as_secs_f64(),
        };
        info!(
            "trained on {} items in {:.3}s of CPU time",
            report.items, report.cpu_seconds
        );
        Ok(report)
    }
}
