//! Reproducible row shuffling applied before the first build

use crate::dataset::RowVector;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Shuffle a copy of `rows` with a generator seeded from `seed`
///
/// The same seed always yields the same permutation, so runs and tests can
/// reproduce exact orderings.
pub fn shuffle_rows(rows: &[RowVector], seed: u64) -> Vec<RowVector> {
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle_rows_with(rows, &mut rng)
}

/// Shuffle a copy of `rows` with a caller-supplied generator
pub fn shuffle_rows_with<R: Rng + ?Sized>(rows: &[RowVector], rng: &mut R) -> Vec<RowVector> {
    let mut shuffled = rows.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
