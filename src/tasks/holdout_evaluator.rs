use crate::classifiers::decision_tree::TreeStats;
use crate::config::TrainConfig;
use crate::core::error::{Result, TreeError};
use crate::core::items::{ItemCollection, WeightedItemSet};
use crate::evaluation::{Snapshot, evaluate};
use crate::streams::read_item_set;
use crate::tasks::train_model;
use anyhow::Context;
use cpu_time::ThreadTime;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::PathBuf;

/// Shuffles item positions with `seed` and holds out `fraction` of them.
/// Both parts keep at least one item and stay in file order.
pub fn holdout_split(
    set: &WeightedItemSet,
    fraction: f64,
    seed: u64,
) -> Result<(WeightedItemSet, WeightedItemSet)> {
    let n = set.num_of_items();
    if n < 2 {
        return Err(TreeError::InvalidInput(format!(
            "need at least 2 items to hold some out (got {n})"
        )));
    }
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(TreeError::InvalidInput(format!(
            "holdout fraction must be in (0, 1) (got {fraction})"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = ((n as f64 * fraction).round() as usize).clamp(1, n - 1);
    let (test, train) = indices.split_at_mut(test_len);
    test.sort_unstable();
    train.sort_unstable();
    Ok((set.select(train)?, set.select(test)?))
}

#[derive(Debug, Clone)]
pub struct HoldoutReport {
    pub train_items: usize,
    pub test_items: usize,
    pub stats: TreeStats,
    pub snapshot: Snapshot,
}

pub struct HoldoutEvaluator {
    input: PathBuf,
    config: TrainConfig,
}

impl HoldoutEvaluator {
    pub fn new(input: PathBuf, config: TrainConfig) -> HoldoutEvaluator {
        HoldoutEvaluator { input, config }
    }

    pub fn run(&self) -> anyhow::Result<HoldoutReport> {
        let start_cpu = ThreadTime::now();
        let set = read_item_set(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let (train, test) = holdout_split(&set, self.config.holdout_fraction, self.config.seed)?;
        let (train_items, test_items) = (train.num_of_items(), test.num_of_items());

        let model = train_model(train, &self.config).context("failed to build tree")?;
        let evaluator = evaluate(&model, &test).context("failed to evaluate tree")?;
        let snapshot = evaluator.snapshot(start_cpu.elapsed().as_secs_f64());
        info!("holdout evaluation: {snapshot}");

        Ok(HoldoutReport {
            train_items,
            test_items,
            stats: model.stats(),
            snapshot,
        })
    }
}
