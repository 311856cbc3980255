use rand::Rng;

/// Draw `count` distinct indices from `0..pool_size`, none of which
/// appear in `exclude`.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: &[usize],
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count + exclude.len() <= pool_size);
    let mut selected: Vec<usize> = Vec::with_capacity(count);
    while selected.len() < count {
        let idx = rng.random_range(0..pool_size);
        if !exclude.contains(&idx) && !selected.contains(&idx) {
            selected.push(idx);
        }
    }
    selected
}
