// ============================================================
// Layer 6 — Infrastructure (checkpoints, report files)
// ============================================================

pub mod checkpoint;
pub mod report;

pub use checkpoint::CheckpointManager;
pub use report::{ReportWriter, SplitSection};
