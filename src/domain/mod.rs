// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the experiment runner.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Why keep this layer pure?
//   - Easy to unit test (no GPU needed)
//   - Easy to understand (no framework noise)
//   - Easy to swap implementations (just implement the trait)
//
// The split/metric/report core programs against these types,
// which is what keeps it testable without touching the
// training stack at all.

// The fixed GLUE task catalogue: text-field schema and label counts
pub mod task;

// Labelled examples, before and after tokenisation
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
