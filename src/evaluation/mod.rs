mod classification_evaluator;
mod snapshot;

pub use classification_evaluator::{ClassificationEvaluator, evaluate};
pub use snapshot::Snapshot;
