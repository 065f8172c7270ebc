// ============================================================
// Confusion Counts and Derived Metrics
// ============================================================
// Counts are taken by exact equality over the full label set:
//
//                    predicted 1   predicted 0
//     actual 1           TP            FN
//     actual 0           FP            TN
//
// Zero-denominator policy (kept bit-for-bit stable so results
// stay comparable across the experiment series): when FP == 0 the
// positive precision and negative recall are exactly 1.0, and
// when FN == 0 the positive recall and negative precision are
// exactly 1.0 — without looking at TP/TN at all. F1 from a
// zero precision+recall sum is defined as 0.0, never NaN.

/// Binary confusion-matrix counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tn: usize,
}

/// Precision, recall, and F1 for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ConfusionCounts {
    pub fn new(tp: usize, fp: usize, fn_: usize, tn: usize) -> Self {
        Self { tp, fp, fn_, tn }
    }

    /// Count TP/FP/FN/TN over paired label sequences.
    /// Class 1 is the positive class; anything else counts as 0.
    ///
    /// Panics in debug builds if the slices differ in length —
    /// a length mismatch means the positional zip against ground
    /// truth was broken upstream.
    pub fn from_labels(truth: &[usize], predicted: &[usize]) -> Self {
        debug_assert_eq!(truth.len(), predicted.len());

        let mut counts = Self::default();
        for (&y, &p) in truth.iter().zip(predicted.iter()) {
            match (y, p) {
                (1, 1) => counts.tp += 1,
                (0, 1) => counts.fp += 1,
                (1, 0) => counts.fn_ += 1,
                (0, 0) => counts.tn += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.fn_ + self.tn
    }

    /// Precision/recall/F1 treating label 1 as positive.
    pub fn positive_scores(&self) -> ClassScores {
        let precision = if self.fp == 0 {
            1.0
        } else {
            self.tp as f64 / (self.tp + self.fp) as f64
        };
        let recall = if self.fn_ == 0 {
            1.0
        } else {
            self.tp as f64 / (self.tp + self.fn_) as f64
        };
        ClassScores {
            precision,
            recall,
            f1: harmonic_f1(precision, recall),
        }
    }

    /// Precision/recall/F1 treating label 0 as positive.
    /// Mirrors the positive-class formulas with TN/FN/FP
    /// swapped into the corresponding roles.
    pub fn negative_scores(&self) -> ClassScores {
        let precision = if self.fn_ == 0 {
            1.0
        } else {
            self.tn as f64 / (self.tn + self.fn_) as f64
        };
        let recall = if self.fp == 0 {
            1.0
        } else {
            self.tn as f64 / (self.tn + self.fp) as f64
        };
        ClassScores {
            precision,
            recall,
            f1: harmonic_f1(precision, recall),
        }
    }

    /// Fraction of exactly-correct predictions.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// Matthews correlation coefficient over the full matrix.
    ///
    /// Counts are widened to f64 before multiplying; the products
    /// overflow usize on realistic dataset sizes. A zero
    /// denominator (any empty row or column) yields 0.0.
    pub fn matthews(&self) -> f64 {
        let (tp, fp, fn_, tn) = (
            self.tp as f64,
            self.fp as f64,
            self.fn_ as f64,
            self.tn as f64,
        );
        let denom = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);
        if denom == 0.0 {
            return 0.0;
        }
        (tp * tn - fp * fn_) / denom.sqrt()
    }
}

/// Harmonic mean of precision and recall. Defined as 0.0 when
/// both inputs are zero.
pub fn harmonic_f1(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum == 0.0 {
        return 0.0;
    }
    (2.0 * precision * recall) / sum
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_by_exact_equality() {
        let truth = [1, 1, 0, 0, 1, 0];
        let predicted = [1, 0, 1, 0, 1, 0];
        let c = ConfusionCounts::from_labels(&truth, &predicted);
        assert_eq!(c, ConfusionCounts::new(2, 1, 1, 2));
        assert_eq!(c.total(), 6);
    }

    #[test]
    fn test_perfect_prediction_all_ones() {
        // TP=5, FP=0, FN=0, TN=5: every zero denominator defaults
        // to 1, and the F1 follows as exactly 1.
        let c = ConfusionCounts::new(5, 0, 0, 5);
        let pos = c.positive_scores();
        assert_eq!(pos.precision, 1.0);
        assert_eq!(pos.recall, 1.0);
        assert_eq!(pos.f1, 1.0);
        let neg = c.negative_scores();
        assert_eq!(neg.precision, 1.0);
        assert_eq!(neg.recall, 1.0);
        assert_eq!(neg.f1, 1.0);
    }

    #[test]
    fn test_zero_fp_rule_with_missed_positives() {
        // TP=0, FP=0, FN=5, TN=5: FP==0 forces precision to 1.0
        // even though no positive was ever predicted; recall is
        // the plain 0/(0+5) = 0. The F1 must match the harmonic
        // formula applied to those two values exactly.
        let c = ConfusionCounts::new(0, 0, 5, 5);
        let pos = c.positive_scores();
        assert_eq!(pos.precision, 1.0);
        assert_eq!(pos.recall, 0.0);
        assert_eq!(pos.f1, harmonic_f1(1.0, 0.0));
        assert_eq!(pos.f1, 0.0);
    }

    #[test]
    fn test_f1_zero_sum_is_zero_not_nan() {
        // precision = 0 and recall = 0 makes the harmonic mean's
        // denominator zero; the defined result is 0.0.
        assert_eq!(harmonic_f1(0.0, 0.0), 0.0);
        assert!(!harmonic_f1(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_plain_scores() {
        let c = ConfusionCounts::new(6, 2, 3, 9);
        let pos = c.positive_scores();
        assert!((pos.precision - 0.75).abs() < 1e-12);
        assert!((pos.recall - 6.0 / 9.0).abs() < 1e-12);
        assert!((c.accuracy() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_matthews_sign_and_zero() {
        // Perfect prediction → +1, perfectly inverted → -1.
        assert!((ConfusionCounts::new(5, 0, 0, 5).matthews() - 1.0).abs() < 1e-12);
        assert!((ConfusionCounts::new(0, 5, 5, 0).matthews() + 1.0).abs() < 1e-12);
        // A degenerate matrix (never predicts positive) → 0, not NaN.
        let m = ConfusionCounts::new(0, 0, 5, 5).matthews();
        assert_eq!(m, 0.0);
    }
}
