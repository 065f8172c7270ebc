// ============================================================
// Layer 2 — Application (use-case orchestration)
// ============================================================

pub mod run_experiment;

pub use run_experiment::{run_experiment, ModelFamily, OptimizerKind, RunConfig};
