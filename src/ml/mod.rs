// ============================================================
// Layer 5 — ML / Training Layer (Burn)
// ============================================================
// All Burn framework specific code lives here (plus the tensor
// collation in data/batcher.rs). The rest of the crate only
// sees this layer through the Orchestrator trait, so the
// split/metric/report core never touches a tensor.
//
// What's in this layer:
//
//   model.rs   — Transformer encoder classifier: token and
//                position embeddings, pre-norm encoder blocks
//                with padding-mask-aware self-attention,
//                first-token pooling, linear class head
//
//   adamax.rs  — Adamax (infinity-norm Adam) as a Burn
//                SimpleOptimizer; Burn ships Adam/AdamW/SGD
//                but not Adamax, and the experiment grid
//                needs all five variants
//
//   trainer.rs — FineTuner: the Orchestrator implementation.
//                Optimizer dispatch, warmup + linear-decay
//                schedule, best-model tracking by validation
//                loss, checkpointing

/// Transformer encoder classification model
pub mod model;

/// Adamax optimizer (not provided by Burn)
pub mod adamax;

/// Training loop and Orchestrator implementation
pub mod trainer;
