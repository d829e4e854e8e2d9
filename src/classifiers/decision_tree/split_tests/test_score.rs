use super::Test;
use std::cmp::Ordering;

/// A candidate test paired with its information gain. Compared by score only.
#[derive(Debug, Clone)]
pub struct TestScore {
    test: Test,
    score: f64,
}

impl TestScore {
    pub fn new(test: Test, score: f64) -> TestScore {
        TestScore { test, score }
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn into_test(self) -> Test {
        self.test
    }

    pub(crate) fn scaled(self, factor: f64) -> TestScore {
        TestScore {
            test: self.test,
            score: self.score * factor,
        }
    }
}

impl PartialEq for TestScore {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score
    }
}

impl PartialOrd for TestScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.score.partial_cmp(&other.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::decision_tree::split_tests::NumericalTest;
    use crate::core::attributes::NumericalAttribute;

    #[test]
    fn test_ordering_ignores_test() {
        let a = TestScore::new(NumericalTest::new(NumericalAttribute::new("a"), 1.0).into(), 0.2);
        let b = TestScore::new(NumericalTest::new(NumericalAttribute::new("b"), 9.0).into(), 0.2);
        let c = TestScore::new(NumericalTest::new(NumericalAttribute::new("a"), 1.0).into(), 0.7);
        assert_eq!(a, b);
        assert!(c > a);
        assert_eq!(a.clone().scaled(0.5).score(), 0.1);
    }
}
