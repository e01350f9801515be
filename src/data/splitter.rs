// ============================================================
// Layer 4 — Splitters
// ============================================================
// Seeded shuffling and splitting:
//   - split_train_test:  one shuffled holdout split
//   - kfold_indices:     contiguous, unshuffled K-fold splits
//   - subsample_indices: a seeded random subset, used by the
//                        halving search to cap per-round resources
//
// Every function takes an explicit seed so a training run is
// reproducible end to end.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and hold out `test_fraction` of them.
///
/// The holdout size is rounded up, like a percentage-based test split,
/// and never exceeds the number of samples.
///
/// # Returns
/// A tuple (train_samples, test_samples)
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total  = samples.len();
    let n_test = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_test = n_test.min(total);

    // split_off(n) keeps [0..n) and returns [n..total)
    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Dataset split: {} train, {} test (seed {})",
        samples.len(),
        test.len(),
        seed
    );

    (samples, test)
}

/// Index pairs (train, validation) for `k` contiguous folds over `n` items.
///
/// The first `n % k` folds get one extra item.
pub fn kfold_indices(n: usize, k: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    let k = k.max(1);
    let base  = n / k;
    let extra = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let end  = start + size;
        let valid: Vec<usize> = (start..end).collect();
        let train: Vec<usize> = (0..start).chain(end..n).collect();
        folds.push((train, valid));
        start = end;
    }
    folds
}

/// `count` distinct indices drawn from `0..n` with `seed`, in draw order.
pub fn subsample_indices(n: usize, count: usize, seed: u64) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);
    idx.truncate(count.min(n));
    idx
}
