// ============================================================
// Precision-Recall Curves and AUC
// ============================================================
// One-vs-rest curve for a chosen class: rank examples by the
// class probability, sweep a threshold down through the distinct
// scores, and record (recall, precision) after each group of
// tied scores. The curve is closed with the conventional
// (recall = 0, precision = 1) endpoint and integrated with the
// trapezoid rule over the recall axis.
//
// Thresholds sit at distinct score values only: ties move across
// the threshold together, so a tied group contributes a single
// curve point.

/// One point on a precision-recall curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
}

/// Precision-recall curve treating `positive` as the target
/// class, ordered by descending threshold (recall non-decreasing).
///
/// Returns an empty curve when the target class never occurs in
/// the ground truth — there is no recall axis to sweep.
pub fn precision_recall_points(
    truth: &[usize],
    scores: &[f64],
    positive: usize,
) -> Vec<PrPoint> {
    debug_assert_eq!(truth.len(), scores.len());

    let total_positive = truth.iter().filter(|&&y| y == positive).count();
    if total_positive == 0 {
        return Vec::new();
    }

    // Rank by score, highest first. Scores are finite
    // probabilities here, so total_cmp is a plain sort key.
    let mut order: Vec<usize> = (0..truth.len()).collect();
    order.sort_unstable_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;

    let mut i = 0;
    while i < order.len() {
        // Consume the whole tied-score group before emitting a point.
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if truth[order[i]] == positive {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(PrPoint {
            recall: tp as f64 / total_positive as f64,
            precision: tp as f64 / (tp + fp) as f64,
        });
    }

    points
}

/// Area under the precision-recall curve for `positive`,
/// integrated trapezoidally over recall from the (0, 1) endpoint.
///
/// Defined as 0.0 when the class never occurs in the ground
/// truth, so the macro average over both classes stays finite.
pub fn pr_auc(truth: &[usize], scores: &[f64], positive: usize) -> f64 {
    let points = precision_recall_points(truth, scores, positive);
    if points.is_empty() {
        return 0.0;
    }

    let mut area = 0.0;
    let mut prev = PrPoint {
        recall: 0.0,
        precision: 1.0,
    };
    for point in points {
        area += (point.recall - prev.recall) * (point.precision + prev.precision) / 2.0;
        prev = point;
    }
    area
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_ranking_has_unit_auc() {
        let truth = [0, 0, 1, 1];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert!((pr_auc(&truth, &scores, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_ranking_trapezoid_value() {
        // The positive example is ranked last: the curve is the
        // single segment from (0, 1) through (0, 0) to (1, 0.5),
        // whose trapezoid area is 0.25.
        let truth = [1, 0];
        let scores = [0.1, 0.9];
        assert!((pr_auc(&truth, &scores, 1) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_curve_points_walk_distinct_thresholds() {
        let truth = [0, 1];
        let scores = [0.1, 0.9];
        let points = precision_recall_points(&truth, &scores, 1);
        assert_eq!(
            points,
            vec![
                PrPoint { recall: 1.0, precision: 1.0 },
                PrPoint { recall: 1.0, precision: 0.5 },
            ]
        );
    }

    #[test]
    fn test_tied_scores_share_one_point() {
        let truth = [1, 0, 1];
        let scores = [0.5, 0.5, 0.5];
        let points = precision_recall_points(&truth, &scores, 1);
        assert_eq!(points.len(), 1);
        assert!((points[0].recall - 1.0).abs() < 1e-12);
        assert!((points[0].precision - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_class_as_target() {
        // Symmetric use: class 0 is the target, scored by its
        // own probability. Perfectly ranked → AUC 1.
        let truth = [0, 0, 1, 1];
        let prob_negative = [0.9, 0.8, 0.2, 0.1];
        assert!((pr_auc(&truth, &prob_negative, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_absent_class_yields_zero() {
        let truth = [0, 0, 0];
        let scores = [0.4, 0.5, 0.6];
        assert_eq!(pr_auc(&truth, &scores, 1), 0.0);
    }
}
