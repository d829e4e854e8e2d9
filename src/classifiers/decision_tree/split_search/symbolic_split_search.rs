use super::{SplitSearch, symbolic_code};
use crate::classifiers::decision_tree::split_criteria::SplitCriterion;
use crate::classifiers::decision_tree::split_tests::{SymbolicTest, TestScore};
use crate::core::attributes::SymbolicAttribute;
use crate::core::error::Result;

impl SplitSearch<'_> {
    /// Greedy value grouping: start from the single code that splits best,
    /// then keep folding in whichever remaining code gives the best split,
    /// until one code is left on the "No" side. The best prefix of that
    /// ordering wins.
    pub(super) fn best_symbolic_split(
        &self,
        attribute: &SymbolicAttribute,
        attribute_index: usize,
    ) -> Result<TestScore> {
        let num_of_values = attribute.num_of_values();
        let goal_values = self.goal.num_of_values();

        // freq_match[code][goal]: weight of items whose tested value is `code`.
        let mut freq_match = vec![vec![0.0; goal_values]; num_of_values];
        for row in &self.rows {
            let code = symbolic_code(row.item, attribute_index, attribute)?;
            freq_match[code][row.goal] += row.weight;
        }
        // Both sides are summed from `freq_match` so that a side holding no
        // weight is exactly empty and scores 0.
        let score_of = |in_prefix: &[bool]| -> Result<f64> {
            let mut matched = vec![0.0; goal_values];
            let mut rest = vec![0.0; goal_values];
            for (code, freq) in freq_match.iter().enumerate() {
                let side = if in_prefix[code] { &mut matched } else { &mut rest };
                for (s, f) in side.iter_mut().zip(freq) {
                    *s += f;
                }
            }
            if matched.iter().sum::<f64>() <= 0.0 || rest.iter().sum::<f64>() <= 0.0 {
                return Ok(0.0);
            }
            self.criterion
                .merit_of_split(self.pre_split_entropy, &[&matched, &rest])
        };

        let mut in_prefix = vec![false; num_of_values];
        let mut best: Option<(usize, f64)> = None;
        for code in 0..num_of_values {
            in_prefix[code] = true;
            let score = score_of(&in_prefix)?;
            in_prefix[code] = false;
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((code, score));
            }
        }
        let Some((first, first_score)) = best else {
            return Ok(TestScore::new(SymbolicTest::trivial(attribute.clone()).into(), 0.0));
        };

        let mut ordered = vec![first];
        let mut scores = vec![first_score];
        in_prefix[first] = true;
        let mut remaining: Vec<usize> = (0..num_of_values).filter(|&c| c != first).collect();

        while remaining.len() >= 2 {
            let mut best: Option<(usize, f64)> = None;
            for (pos, &code) in remaining.iter().enumerate() {
                in_prefix[code] = true;
                let score = score_of(&in_prefix)?;
                in_prefix[code] = false;
                if best.is_none_or(|(_, b)| score > b) {
                    best = Some((pos, score));
                }
            }
            let Some((pos, score)) = best else { break };
            let code = remaining.remove(pos);
            in_prefix[code] = true;
            ordered.push(code);
            scores.push(score);
        }

        let mut best_index = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best_index] {
                best_index = i;
            }
        }
        let best_score = scores[best_index].max(0.0);
        ordered.truncate(best_index + 1);

        let test = SymbolicTest::new(attribute.clone(), ordered)?;
        Ok(TestScore::new(test.into(), best_score))
    }
}
