// ============================================================
// Metric Aggregation Core
// ============================================================
// Converts raw predictions into the fully-specified set of
// binary-classification metrics the experiment reports:
//
//   confusion.rs — TP/FP/FN/TN counts, per-class precision /
//                  recall / F1, Matthews correlation
//   curve.rs     — precision-recall curves and trapezoidal AUC
//   aggregate.rs — BinaryScores: everything for one split,
//                  plus softmax/argmax helpers
//
// Two conventions in here are deliberate and load-bearing for
// reproducibility against prior experiment results:
//
//   1. When a precision/recall denominator is zero the metric
//      is defined as exactly 1.0 (not NaN), so downstream
//      aggregates are never poisoned by a division by zero.
//   2. Macro-F1 is the harmonic mean of macro-precision and
//      macro-recall — NOT the arithmetic mean of the per-class
//      F1 scores. The two differ in general.
//
// Pure arithmetic over slices; no framework types, no I/O.

pub mod aggregate;
pub mod confusion;
pub mod curve;

pub use aggregate::BinaryScores;
pub use confusion::ConfusionCounts;
