// ============================================================
// Layer 3 — Example Domain Types
// ============================================================
// A labelled instance exists in two forms:
//
//   Example        — raw text as loaded from the benchmark,
//                    one or two sentence fields plus a label
//   EncodedExample — the same instance after tokenisation:
//                    token ids, attention mask, optional
//                    type ids, and the label
//
// EncodedExample deliberately keeps sequences UNPADDED.
// Padding to a common length is deferred to batch collation so
// each mini-batch only pays for its own longest sequence
// (dynamic padding), instead of every sequence paying for the
// corpus-wide maximum.
//
// The label field is called `labels` on the encoded form — the
// plural name is what the training orchestrator expects, and
// renaming at encode time keeps that quirk in exactly one place.

use serde::{Deserialize, Serialize};

/// One raw labelled instance from a GLUE task.
/// Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    /// First (or only) text field
    pub text_a: String,

    /// Second text field for sentence-pair tasks
    pub text_b: Option<String>,

    /// Integer class label
    pub label: usize,
}

impl Example {
    pub fn new(text_a: impl Into<String>, text_b: Option<String>, label: usize) -> Self {
        Self {
            text_a: text_a.into(),
            text_b,
            label,
        }
    }
}

/// One tokenised instance, ready for batch collation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodedExample {
    /// Subword token ids, truncated but not padded
    pub input_ids: Vec<u32>,

    /// 1 = real token, 0 = padding (all 1s before collation)
    pub attention_mask: Vec<u32>,

    /// Segment ids for sentence-pair inputs; None for models
    /// that don't use them (RoBERTa family)
    pub type_ids: Option<Vec<u32>>,

    /// Ground-truth class label, renamed from `label` for
    /// orchestrator compatibility
    pub labels: usize,
}

impl EncodedExample {
    /// Unpadded sequence length in tokens.
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}
