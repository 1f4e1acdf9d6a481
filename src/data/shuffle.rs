// ============================================================
// Layer 4 — Partition Reordering
// ============================================================
// Two small operations on a partition:
//
//   seeded_shuffle — Fisher-Yates with a StdRng seeded from a
//                    fixed u64, so every run produces the same
//                    permutation (used for the Hindi partition)
//   drop_tail      — remove the last `n` records (the training
//                    split is trained on without its final rows)
//
// Reference: rand crate documentation (SliceRandom, SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `items` with an RNG seeded from `seed`.
/// Same seed, same input → same output order.
pub fn seeded_shuffle<T>(mut items: Vec<T>, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
    items
}

/// Drop the last `n` items. Drops everything if `n >= len`.
pub fn drop_tail<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let keep = items.len().saturating_sub(n);
    items.truncate(keep);

    tracing::debug!("Kept {} items after dropping a tail of {}", items.len(), n);
    items
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_permutation() {
        let items: Vec<usize> = (0..100).collect();
        let a = seeded_shuffle(items.clone(), 42);
        let b = seeded_shuffle(items, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let items: Vec<usize> = (0..50).collect();
        let mut shuffled = seeded_shuffle(items.clone(), 7);
        assert_ne!(shuffled, items);
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_different_seeds_differ() {
        let items: Vec<usize> = (0..100).collect();
        assert_ne!(seeded_shuffle(items.clone(), 1), seeded_shuffle(items, 2));
    }

    #[test]
    fn test_drop_tail() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(drop_tail(items, 3), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_drop_tail_longer_than_input() {
        let items: Vec<usize> = (0..5).collect();
        assert!(drop_tail(items, 10).is_empty());
    }
}
