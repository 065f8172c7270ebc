// ============================================================
// Layer 4 — Dynamic-Padding Batcher
// ============================================================
// Stacks a slice of EncodedExamples into device tensors.
//
// Padding is decided HERE, per batch: every sequence in the
// batch is padded to the batch's own longest member, not to a
// corpus-wide maximum. Short batches stay short, which is the
// whole point of keeping EncodedExample unpadded upstream.
//
// Output shapes:
//   input_ids      [batch_size, batch_max_len]
//   attention_mask [batch_size, batch_max_len]  (1 real, 0 pad)
//   labels         [batch_size]

use burn::prelude::*;

use crate::domain::example::EncodedExample;

/// A collated batch ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ClassifierBatch<B: Backend> {
    pub input_ids: Tensor<B, 2, Int>,
    pub attention_mask: Tensor<B, 2, Int>,
    pub labels: Tensor<B, 1, Int>,
}

/// Collates examples with batch-level padding. Holds the pad
/// token id of the tokenizer vocabulary in use.
#[derive(Debug, Clone)]
pub struct DynamicBatcher {
    pad_id: u32,
}

impl DynamicBatcher {
    pub fn new(pad_id: u32) -> Self {
        Self { pad_id }
    }

    pub fn batch<B: Backend>(
        &self,
        items: &[EncodedExample],
        device: &B::Device,
    ) -> ClassifierBatch<B> {
        debug_assert!(!items.is_empty());

        let batch_size = items.len();
        let (ids_flat, mask_flat, max_len) = flatten_padded(items, self.pad_id);

        let input_ids = Tensor::<B, 1, Int>::from_ints(ids_flat.as_slice(), device)
            .reshape([batch_size, max_len]);
        let attention_mask = Tensor::<B, 1, Int>::from_ints(mask_flat.as_slice(), device)
            .reshape([batch_size, max_len]);

        let labels: Vec<i32> = items.iter().map(|s| s.labels as i32).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), device);

        ClassifierBatch {
            input_ids,
            attention_mask,
            labels,
        }
    }
}

/// Pad every sequence to the batch maximum and flatten row-major,
/// ready for a [batch, seq] reshape. Burn Int tensors are built
/// from i32.
fn flatten_padded(items: &[EncodedExample], pad_id: u32) -> (Vec<i32>, Vec<i32>, usize) {
    let max_len = items.iter().map(|s| s.len()).max().unwrap_or(0);

    let mut ids_flat = Vec::with_capacity(items.len() * max_len);
    let mut mask_flat = Vec::with_capacity(items.len() * max_len);

    for item in items {
        ids_flat.extend(item.input_ids.iter().map(|&t| t as i32));
        mask_flat.extend(item.attention_mask.iter().map(|&t| t as i32));
        for _ in item.len()..max_len {
            ids_flat.push(pad_id as i32);
            mask_flat.push(0);
        }
    }

    (ids_flat, mask_flat, max_len)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(ids: &[u32], label: usize) -> EncodedExample {
        EncodedExample {
            input_ids: ids.to_vec(),
            attention_mask: vec![1; ids.len()],
            type_ids: None,
            labels: label,
        }
    }

    #[test]
    fn test_pads_to_longest_in_batch() {
        let items = vec![encoded(&[5, 6], 1), encoded(&[7, 8, 9, 10], 0)];
        let (ids, mask, max_len) = flatten_padded(&items, 0);

        assert_eq!(max_len, 4);
        assert_eq!(ids, vec![5, 6, 0, 0, 7, 8, 9, 10]);
        assert_eq!(mask, vec![1, 1, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_uses_vocabulary_pad_id() {
        // RoBERTa vocabularies pad with 1, not 0.
        let items = vec![encoded(&[5], 0), encoded(&[7, 8], 1)];
        let (ids, _, _) = flatten_padded(&items, 1);
        assert_eq!(ids, vec![5, 1, 7, 8]);
    }

    #[test]
    fn test_no_padding_for_uniform_lengths() {
        let items = vec![encoded(&[1, 2], 0), encoded(&[3, 4], 1)];
        let (ids, mask, max_len) = flatten_padded(&items, 0);
        assert_eq!(max_len, 2);
        assert_eq!(ids.len(), 4);
        assert!(mask.iter().all(|&m| m == 1));
    }
}
