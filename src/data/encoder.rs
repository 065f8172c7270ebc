// ============================================================
// Layer 4 — Tokenization Adapter
// ============================================================
// Wraps a pretrained subword tokenizer from the `tokenizers`
// crate. The vocabulary is fetched from the Hugging Face hub on
// first use (cached locally afterwards), so the exact same
// subword segmentation the pretrained model was trained with is
// applied here.
//
// Sentence-pair tasks encode both fields in one sequence with
// the model's separator convention; single-sentence tasks encode
// one field. Sequences are truncated to the model maximum but
// NOT padded — padding is deferred to batch collation, where
// each mini-batch pads to its own longest member.

use anyhow::Result;
use tokenizers::{Tokenizer, TruncationParams};

use crate::domain::example::{EncodedExample, Example};
use crate::domain::traits::ExampleEncoder;

/// Pretrained tokenizer wrapper producing unpadded encodings.
pub struct TextEncoder {
    tokenizer: Tokenizer,
    /// BERT-family models consume segment ids; the RoBERTa family
    /// does not, and feeding them anyway would be wrong.
    keep_type_ids: bool,
    pad_id: u32,
}

impl TextEncoder {
    /// Download (or load from cache) the tokenizer of a pretrained
    /// checkpoint and configure truncation at `max_length`.
    pub fn from_pretrained(
        checkpoint: &str,
        keep_type_ids: bool,
        max_length: usize,
    ) -> Result<Self> {
        let mut tokenizer = Tokenizer::from_pretrained(checkpoint, None)
            .map_err(|e| anyhow::anyhow!("cannot load tokenizer '{checkpoint}': {e}"))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("cannot configure truncation: {e}"))?;

        // BERT checkpoints call it [PAD], RoBERTa checkpoints <pad>.
        let pad_id = tokenizer
            .token_to_id("[PAD]")
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .unwrap_or(0);

        tracing::info!(
            "Tokenizer '{}' ready (pad id {}, max length {})",
            checkpoint,
            pad_id,
            max_length,
        );

        Ok(Self {
            tokenizer,
            keep_type_ids,
            pad_id,
        })
    }

    /// The padding token id, needed by the batch collator.
    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Vocabulary size including added special tokens; sizes the
    /// classifier's embedding table.
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}

impl ExampleEncoder for TextEncoder {
    fn encode(&self, example: &Example) -> Result<EncodedExample> {
        let encoding = match &example.text_b {
            Some(text_b) => self
                .tokenizer
                .encode((example.text_a.as_str(), text_b.as_str()), true),
            None => self.tokenizer.encode(example.text_a.as_str(), true),
        }
        .map_err(|e| anyhow::anyhow!("tokenisation error: {e}"))?;

        Ok(EncodedExample {
            input_ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            type_ids: self
                .keep_type_ids
                .then(|| encoding.get_type_ids().to_vec()),
            labels: example.label,
        })
    }
}
