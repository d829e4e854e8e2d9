mod classify_task;
mod holdout_evaluator;
mod train_task;

pub use classify_task::{ClassifyReport, ClassifyTask, OutputFormat, Prediction, write_predictions};
pub use holdout_evaluator::{HoldoutEvaluator, HoldoutReport, holdout_split};
pub use train_task::{TrainReport, TrainTask, train_model};
