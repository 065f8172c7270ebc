// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw benchmark download to tensor batches.
//
// The pipeline flows in this order:
//
//   GLUE task (upstream train + validation splits)
//       │
//       ▼
//   GlueLoader        → downloads rows, maps columns to Examples
//       │
//       ▼
//   TextEncoder       → pretrained subword tokenisation,
//                       truncation, NO padding yet
//       │
//       ▼
//   three_way_split   → seeded stratified train/valid/test
//       │
//       ▼
//   DynamicBatcher    → pads each mini-batch to its own longest
//                       sequence and stacks into tensors
//
// Each module is responsible for exactly one step, which keeps
// each step independently testable and replaceable.

/// Downloads GLUE rows and maps them to domain Examples
pub mod loader;

/// Pretrained-tokenizer adapter producing EncodedExamples
pub mod encoder;

/// Seeded, stratified train/valid/test splitting
pub mod splitter;

/// Batch-level dynamic padding into Burn tensors
pub mod batcher;
