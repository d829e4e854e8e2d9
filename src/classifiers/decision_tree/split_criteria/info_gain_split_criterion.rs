use super::SplitCriterion;
use crate::core::entropy::cal_entropy;
use crate::core::error::Result;

/// Information gain in bits: the pre-split entropy minus the weighted mean
/// entropy of the subsets.
#[derive(Debug, Default, Clone, Copy)]
pub struct InfoGainSplitCriterion;

impl InfoGainSplitCriterion {
    pub fn new() -> Self {
        Self
    }
}

impl SplitCriterion for InfoGainSplitCriterion {
    fn range_of_merit(&self, num_of_classes: usize) -> f64 {
        if num_of_classes > 1 {
            (num_of_classes as f64).log2()
        } else {
            0.0
        }
    }

    fn merit_of_split(&self, pre_split_entropy: f64, post_split_dists: &[&[f64]]) -> Result<f64> {
        let dist_weights: Vec<f64> = post_split_dists.iter().map(|d| d.iter().sum()).collect();
        let total_weight: f64 = dist_weights.iter().sum();
        if total_weight <= 0.0 {
            return Ok(0.0);
        }

        let mut post_entropy = 0.0;
        for (dist, weight) in post_split_dists.iter().zip(dist_weights) {
            if weight > 0.0 {
                post_entropy += (weight / total_weight) * cal_entropy(dist)?;
            }
        }
        Ok(pre_split_entropy - post_entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_split_recovers_full_entropy() {
        let criterion = InfoGainSplitCriterion::new();
        let merit = criterion
            .merit_of_split(1.0, &[&[2.0, 0.0], &[0.0, 2.0]])
            .unwrap();
        assert!((merit - 1.0).abs() < 1e-12);
        assert!(merit <= criterion.range_of_merit(2) + 1e-12);
    }

    #[test]
    fn test_uninformative_split_scores_zero() {
        let criterion = InfoGainSplitCriterion::new();
        let merit = criterion
            .merit_of_split(1.0, &[&[1.0, 1.0], &[1.0, 1.0]])
            .unwrap();
        assert!(merit.abs() < 1e-12);
    }

    #[test]
    fn test_empty_side_is_ignored() {
        let criterion = InfoGainSplitCriterion::new();
        let merit = criterion
            .merit_of_split(1.0, &[&[3.0, 3.0], &[0.0, 0.0]])
            .unwrap();
        assert!(merit.abs() < 1e-12);
        assert_eq!(criterion.merit_of_split(0.7, &[&[], &[]]).unwrap(), 0.0);
    }

    #[test]
    fn test_range_of_merit() {
        let criterion = InfoGainSplitCriterion::new();
        assert_eq!(criterion.range_of_merit(1), 0.0);
        assert_eq!(criterion.range_of_merit(4), 2.0);
    }
}
