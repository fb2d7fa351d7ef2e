//! Seeded sample partitioning: the validation hold-out and CV folds.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Index partition of a dataset into training and validation rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Shuffle `0..n` with a fixed seed and hold out `ceil(n * fraction)` rows.
/// The shuffle is not stratified; at least one row always stays in training.
pub fn shuffle_split(n: usize, validation_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let held_out = ((n as f64) * validation_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let held_out = held_out.min(n.saturating_sub(1));
    let train = indices.split_off(held_out);
    tracing::debug!(
        train = train.len(),
        validation = indices.len(),
        "split samples"
    );
    Split {
        train,
        validation: indices,
    }
}

/// Stratified k-fold test sets over `targets`, without shuffling.
///
/// Samples of each class are dealt to the folds in order, continuing the
/// rotation across classes so fold sizes differ by at most one.
pub fn stratified_folds(targets: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut folds = vec![Vec::new(); k];
    if k == 0 {
        return folds;
    }
    let n_classes = targets.iter().copied().max().map_or(0, |m| m + 1);
    let mut slot = 0usize;
    for class in 0..n_classes {
        for (idx, _) in targets.iter().enumerate().filter(|(_, t)| **t == class) {
            folds[slot % k].push(idx);
            slot += 1;
        }
    }
    folds.iter_mut().for_each(|fold| fold.sort_unstable());
    folds
}
