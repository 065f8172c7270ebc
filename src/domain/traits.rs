// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// the application layer can swap implementations without
// changing the code that uses them:
//
//   - GlueLoader implements ExampleSource
//   - TextEncoder implements ExampleEncoder
//   - FineTuner (Burn) implements Orchestrator
//   - test stubs implement all three without any ML stack
//
// Orchestrator is the important one: it is the entire surface
// this crate relies on from the training framework. Exactly
// three operations, nothing else. Everything behind it
// (device placement, batching, checkpoint scheduling) is the
// implementation's business. The split/metric/report core is
// fully exercisable against a stub, which is the point.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::domain::example::{EncodedExample, Example};

/// Named metric values as returned by an orchestrator's `evaluate`.
/// BTreeMap so iteration (and logging) order is stable.
pub type MetricMap = BTreeMap<String, f64>;

/// Raw model outputs for a dataset, in dataset order.
///
/// Ordering is part of the contract: `logits[i]` and `labels[i]`
/// belong to the i-th example of the dataset passed to `predict`,
/// so callers may zip positionally against known ground truth.
#[derive(Debug, Clone)]
pub struct PredictOutput {
    /// One row of raw (pre-softmax) class scores per example
    pub logits: Vec<Vec<f32>>,

    /// Ground-truth labels echoed back in the same order
    pub labels: Vec<usize>,
}

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can produce the full labelled example set
/// for a task.
///
/// Implementations:
///   - GlueLoader → downloads and concatenates the upstream
///     train + validation splits
pub trait ExampleSource {
    /// Load all available examples from this source.
    fn load(&self) -> Result<Vec<Example>>;
}

// ─── ExampleEncoder ───────────────────────────────────────────────────────────
/// Any component that can turn a raw example into token sequences.
///
/// Implementations:
///   - TextEncoder → wraps a pretrained subword tokenizer
pub trait ExampleEncoder {
    /// Tokenise one example. Output is unpadded; padding happens
    /// at batch collation.
    fn encode(&self, example: &Example) -> Result<EncodedExample>;
}

// ─── Orchestrator ─────────────────────────────────────────────────────────────
/// The training framework, reduced to the three calls this crate
/// actually needs. All calls are blocking and synchronous: they
/// return a complete result or fail.
///
/// Implementations must not be assumed deterministic across runs
/// unless the same seed was explicitly propagated to them.
pub trait Orchestrator {
    /// Run the full training budget. Side effect: the best model
    /// by validation loss is kept (and checkpointed) for later
    /// `evaluate`/`predict` calls.
    fn train(&mut self) -> Result<()>;

    /// Compute the orchestrator's built-in metrics (including
    /// `matthews_correlation`) over a dataset. Callers should
    /// invoke this once per split and read keys from the cached
    /// result rather than re-evaluating per key.
    fn evaluate(&mut self, examples: &[EncodedExample]) -> Result<MetricMap>;

    /// Raw per-example outputs in dataset order.
    fn predict(&mut self, examples: &[EncodedExample]) -> Result<PredictOutput>;
}
