//! Scoring functions used by model selection and validation reporting.

use std::collections::BTreeSet;

use linfa::prelude::ToConfusionMatrix;
use ndarray::ArrayView1;

use crate::error::Result;

/// Fraction of predictions equal to the truth, read off linfa's confusion
/// matrix.
pub fn accuracy(truth: ArrayView1<'_, usize>, predicted: ArrayView1<'_, usize>) -> Result<f64> {
    let matrix = predicted.confusion_matrix(truth)?;
    Ok(f64::from(matrix.accuracy()))
}

/// Per-class F1 averaged with weights equal to each class's support in
/// `truth`. Classes that are only predicted contribute with zero weight, and
/// undefined precision or recall counts as zero.
pub fn weighted_f1(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let labels: BTreeSet<usize> = truth.iter().chain(predicted).copied().collect();
    let mut weighted = 0.0;
    for label in labels {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t == label, p == label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let support = tp + fn_;
        let denom = 2 * tp + fp + fn_;
        if support == 0 || denom == 0 {
            continue;
        }
        let f1 = 2.0 * tp as f64 / denom as f64;
        weighted += f1 * support as f64;
    }
    weighted / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn perfect_predictions_score_one() {
        let truth = array![0, 1, 1, 2];
        assert_eq!(accuracy(truth.view(), truth.view()).unwrap(), 1.0);
        assert!((weighted_f1(&[0, 1, 1, 2], &[0, 1, 1, 2]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_f1_matches_hand_computation() {
        // class 0: tp=1 fp=1 fn=1 -> f1 = 0.5, support 2
        // class 1: tp=1 fp=1 fn=1 -> f1 = 0.5, support 2
        let truth = [0, 0, 1, 1];
        let predicted = [0, 1, 1, 0];
        assert!((weighted_f1(&truth, &predicted) - 0.5).abs() < 1e-12);
        let accuracy = accuracy(array![0, 0, 1, 1].view(), array![0, 1, 1, 0].view()).unwrap();
        assert!((accuracy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_input_has_zero_f1() {
        assert_eq!(weighted_f1(&[], &[]), 0.0);
    }
}
