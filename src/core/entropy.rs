use crate::core::error::{Result, TreeError};

/// Shannon entropy (bits) of the distribution implied by an unnormalized
/// weight vector.
///
/// Entries equal to zero are ignored. A zero total yields `0.0`.
pub fn cal_entropy(weights: &[f64]) -> Result<f64> {
    let mut sum = 0.0;
    let mut result = 0.0;

    for &w in weights {
        if w < 0.0 {
            return Err(TreeError::NegativeWeight(w));
        }
        if w > 0.0 {
            result -= w * w.ln();
            sum += w;
        }
    }

    if sum == 0.0 {
        return Ok(0.0);
    }

    result += sum * sum.ln();

    Ok(result / (std::f64::consts::LN_2 * sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_two_equal_weights_is_one_bit() {
        assert!((cal_entropy(&[1.0, 1.0]).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_single_weight_is_zero() {
        assert_eq!(cal_entropy(&[5.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_all_zero_weights_is_zero() {
        assert_eq!(cal_entropy(&[0.0, 0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cal_entropy(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_scale_invariant() {
        let a = cal_entropy(&[1.0, 2.0, 3.0]).unwrap();
        let b = cal_entropy(&[10.0, 20.0, 30.0]).unwrap();
        assert!((a - b).abs() < EPS);
    }

    #[test]
    fn test_bounded_by_log2_of_positive_count() {
        let weights = [3.0, 0.0, 1.0, 7.0, 0.5];
        let h = cal_entropy(&weights).unwrap();
        assert!(h >= 0.0);
        assert!(h <= 4f64.log2() + EPS);

        let uniform = cal_entropy(&[2.0, 2.0, 2.0, 2.0]).unwrap();
        assert!((uniform - 2.0).abs() < EPS);
    }

    #[test]
    fn test_matches_textbook_formula() {
        let weights = [1.0, 3.0];
        let expected = -(0.25f64 * 0.25f64.log2() + 0.75 * 0.75f64.log2());
        assert!((cal_entropy(&weights).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = cal_entropy(&[1.0, -0.5]).unwrap_err();
        assert!(matches!(err, TreeError::NegativeWeight(w) if w == -0.5));
    }
}
