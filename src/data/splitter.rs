// ============================================================
// Layer 4 — Stratified Splitter
// ============================================================
// Splits a labelled dataset into held-in and held-out parts
// while preserving the class-label proportions of the source,
// deterministically for a given seed.
//
// Why stratify instead of a plain shuffle-and-cut?
//   GLUE class balances are skewed (CoLA is roughly 70/30).
//   A plain random cut of a small held-out fraction can land a
//   badly unrepresentative class mix, and every optimizer/seed
//   combination would then be scored against a different class
//   balance. Stratification pins the mix so runs are comparable.
//
// How the sizes are chosen:
//   held-out total = ceil(N * fraction), then distributed over
//   the classes by largest remainder, which keeps every per-class
//   count within one example of its exact proportional share.
//
// Determinism:
//   classes are visited in label order and each class's indices
//   are shuffled by a single StdRng seeded from the run seed,
//   so the same inputs, fraction, and seed always reproduce the
//   same partition, element for element. Both outputs preserve
//   the source ordering of the elements they keep.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a requested stratified split cannot be produced.
#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    /// A class would end up with an empty bucket on one side of
    /// the split — it has too few examples to stratify at the
    /// requested fraction.
    #[error(
        "class {label} has {count} example(s): too few to stratify \
         at held-out fraction {fraction}"
    )]
    Infeasible {
        label: usize,
        count: usize,
        fraction: f64,
    },

    #[error("held-out fraction must be strictly between 0 and 1, got {0}")]
    BadFraction(f64),

    #[error("cannot split an empty dataset")]
    Empty,
}

/// Stratified split of `items` into (held-in, held-out) parts.
///
/// `label_of` extracts the class label used for stratification.
/// Re-running with identical items, fraction, and seed yields
/// identical partitions; the two parts are disjoint and their
/// union is exactly the input.
pub fn stratified_split<T, F>(
    items: Vec<T>,
    label_of: F,
    heldout_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>), SplitError>
where
    F: Fn(&T) -> usize,
{
    if !(heldout_fraction > 0.0 && heldout_fraction < 1.0) {
        return Err(SplitError::BadFraction(heldout_fraction));
    }
    let total = items.len();
    if total == 0 {
        return Err(SplitError::Empty);
    }

    // ── Group indices by class, in label order ────────────────────────────────
    // BTreeMap keeps class iteration deterministic, which matters
    // because all classes share one RNG stream below.
    let mut classes: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        classes.entry(label_of(item)).or_default().push(index);
    }

    // ── Decide how many of each class go to the held-out side ─────────────────
    let heldout_total = (total as f64 * heldout_fraction).ceil() as usize;
    let allocation = allocate_per_class(&classes, heldout_total, total);

    for (&label, indices) in &classes {
        let take = allocation[&label];
        // An empty bucket on either side means the class cannot
        // be stratified at this fraction.
        if take == 0 || take == indices.len() {
            return Err(SplitError::Infeasible {
                label,
                count: indices.len(),
                fraction: heldout_fraction,
            });
        }
    }

    // ── Pick held-out members per class, seeded ───────────────────────────────
    let mut rng = StdRng::seed_from_u64(seed);
    let mut is_heldout = vec![false; total];
    for (&label, indices) in &classes {
        let mut shuffled = indices.clone();
        shuffled.shuffle(&mut rng);
        for &index in shuffled.iter().take(allocation[&label]) {
            is_heldout[index] = true;
        }
    }

    // ── Partition, preserving source order ────────────────────────────────────
    let mut held_in = Vec::with_capacity(total - heldout_total);
    let mut held_out = Vec::with_capacity(heldout_total);
    for (index, item) in items.into_iter().enumerate() {
        if is_heldout[index] {
            held_out.push(item);
        } else {
            held_in.push(item);
        }
    }

    tracing::debug!(
        "Stratified split: {} held in, {} held out (fraction {:.4}, seed {})",
        held_in.len(),
        held_out.len(),
        heldout_fraction,
        seed,
    );

    Ok((held_in, held_out))
}

/// Three-way split for the experiment: a first-level split at
/// `heldout_fraction`, then a 50/50 second-level split of the
/// held-out part with the same seed.
///
/// Returns (train, valid, test).
pub fn three_way_split<T, F>(
    items: Vec<T>,
    label_of: F,
    heldout_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>, Vec<T>), SplitError>
where
    F: Fn(&T) -> usize,
{
    let (train, heldout) = stratified_split(items, &label_of, heldout_fraction, seed)?;
    let (valid, test) = stratified_split(heldout, &label_of, 0.5, seed)?;
    Ok((train, valid, test))
}

/// Largest-remainder allocation of `heldout_total` slots over the
/// classes, proportional to class size. Ties broken by larger
/// remainder, then larger class, then smaller label.
fn allocate_per_class(
    classes: &BTreeMap<usize, Vec<usize>>,
    heldout_total: usize,
    total: usize,
) -> BTreeMap<usize, usize> {
    let mut allocation: BTreeMap<usize, usize> = BTreeMap::new();
    let mut remainders: Vec<(f64, usize, usize)> = Vec::new(); // (remainder, count, label)

    let mut assigned = 0usize;
    for (&label, indices) in classes {
        let exact = heldout_total as f64 * indices.len() as f64 / total as f64;
        let floor = exact.floor() as usize;
        allocation.insert(label, floor);
        assigned += floor;
        remainders.push((exact - floor as f64, indices.len(), label));
    }

    remainders.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then(b.1.cmp(&a.1))
            .then(a.2.cmp(&b.2))
    });

    let mut leftover = heldout_total.saturating_sub(assigned);
    for (_, _, label) in remainders {
        if leftover == 0 {
            break;
        }
        *allocation.get_mut(&label).unwrap() += 1;
        leftover -= 1;
    }

    allocation
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// (unique id, class label) — enough to check identity,
    /// disjointness, and stratification.
    fn labelled(counts: &[(usize, usize)]) -> Vec<(usize, usize)> {
        // counts: (label, how many)
        let mut items = Vec::new();
        let mut id = 0;
        for &(label, n) in counts {
            for _ in 0..n {
                items.push((id, label));
                id += 1;
            }
        }
        items
    }

    fn label_of(item: &(usize, usize)) -> usize {
        item.1
    }

    #[test]
    fn test_same_seed_reproduces_identical_partitions() {
        let items = labelled(&[(0, 40), (1, 20)]);
        let a = stratified_split(items.clone(), label_of, 0.25, 7).unwrap();
        let b = stratified_split(items, label_of, 0.25, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let items = labelled(&[(0, 40), (1, 20)]);
        let a = stratified_split(items.clone(), label_of, 0.25, 1).unwrap();
        let b = stratified_split(items, label_of, 0.25, 2).unwrap();
        assert_ne!(a.1, b.1);
    }

    #[test]
    fn test_disjoint_and_complete() {
        let items = labelled(&[(0, 30), (1, 30)]);
        let all: BTreeSet<usize> = items.iter().map(|i| i.0).collect();
        let (held_in, held_out) = stratified_split(items, label_of, 0.2, 3).unwrap();

        let in_ids: BTreeSet<usize> = held_in.iter().map(|i| i.0).collect();
        let out_ids: BTreeSet<usize> = held_out.iter().map(|i| i.0).collect();
        assert!(in_ids.is_disjoint(&out_ids));

        let union: BTreeSet<usize> = in_ids.union(&out_ids).copied().collect();
        assert_eq!(union, all);
        assert_eq!(held_in.len() + held_out.len(), all.len());
    }

    #[test]
    fn test_proportions_within_one_example() {
        let items = labelled(&[(0, 70), (1, 30)]);
        let (_, held_out) = stratified_split(items, label_of, 0.2, 11).unwrap();
        // ceil(100 * 0.2) = 20 held out; exact shares 14 / 6.
        assert_eq!(held_out.len(), 20);
        let ones = held_out.iter().filter(|i| i.1 == 1).count() as f64;
        assert!((ones - 6.0).abs() <= 1.0);
    }

    #[test]
    fn test_small_skewed_pool_keeps_minority_represented() {
        // The 20-example end-to-end case: 3 positives, 17
        // negatives, held-out fraction 1/6 → ceil(20/6) = 4 held
        // out, minority share 0.6 → within one example of its
        // exact proportion, and never an empty bucket.
        let items = labelled(&[(0, 17), (1, 3)]);
        let (held_in, held_out) =
            stratified_split(items, label_of, 1.0 / 6.0, 42).unwrap();
        assert_eq!(held_out.len(), 4);
        assert_eq!(held_in.len(), 16);

        let minority = held_out.iter().filter(|i| i.1 == 1).count() as f64;
        assert!((minority - 0.6).abs() <= 1.0);
        assert!(minority >= 1.0);
    }

    #[test]
    fn test_singleton_class_is_infeasible() {
        let items = labelled(&[(0, 9), (1, 1)]);
        let err = stratified_split(items, label_of, 1.0 / 6.0, 1).unwrap_err();
        match err {
            SplitError::Infeasible { label: 1, count: 1, .. } => {}
            other => panic!("expected Infeasible for class 1, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_fraction_and_empty_input() {
        let items = labelled(&[(0, 4), (1, 4)]);
        assert_eq!(
            stratified_split(items.clone(), label_of, 0.0, 1).unwrap_err(),
            SplitError::BadFraction(0.0)
        );
        assert_eq!(
            stratified_split(items, label_of, 1.0, 1).unwrap_err(),
            SplitError::BadFraction(1.0)
        );
        assert_eq!(
            stratified_split(Vec::new(), label_of, 0.5, 1).unwrap_err(),
            SplitError::Empty
        );
    }

    #[test]
    fn test_three_way_split_is_disjoint_and_stratified() {
        let items = labelled(&[(0, 40), (1, 20)]);
        let all: BTreeSet<usize> = items.iter().map(|i| i.0).collect();
        let (train, valid, test) =
            three_way_split(items, label_of, 1.0 / 6.0, 10).unwrap();

        // ceil(60/6) = 10 held out, re-split 50/50.
        assert_eq!(valid.len() + test.len(), 10);
        assert_eq!(train.len(), 50);

        let mut union = BTreeSet::new();
        for part in [&train, &valid, &test] {
            for item in part.iter() {
                // insert() returning false would mean a duplicate
                assert!(union.insert(item.0));
            }
        }
        assert_eq!(union, all);

        // Every part keeps both classes.
        for part in [&train, &valid, &test] {
            assert!(part.iter().any(|i| i.1 == 0));
            assert!(part.iter().any(|i| i.1 == 1));
        }
    }

    #[test]
    fn test_three_way_split_deterministic() {
        let items = labelled(&[(0, 40), (1, 20)]);
        let a = three_way_split(items.clone(), label_of, 1.0 / 6.0, 100).unwrap();
        let b = three_way_split(items, label_of, 1.0 / 6.0, 100).unwrap();
        assert_eq!(a, b);
    }
}
