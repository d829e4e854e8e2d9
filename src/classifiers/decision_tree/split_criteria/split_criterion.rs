use crate::core::error::Result;

pub trait SplitCriterion {
    /// Upper bound of [`merit_of_split`](Self::merit_of_split) for a goal with
    /// `num_of_classes` values.
    fn range_of_merit(&self, num_of_classes: usize) -> f64;

    /// Merit of splitting a set whose goal entropy is `pre_split_entropy`
    /// into subsets with the given weighted goal frequencies.
    fn merit_of_split(&self, pre_split_entropy: f64, post_split_dists: &[&[f64]]) -> Result<f64>;
}
