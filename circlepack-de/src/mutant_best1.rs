use ndarray::{Array1, Array2, Zip};
use rand::Rng;

use crate::distinct_indices::distinct_indices;

pub(crate) fn mutant_best1<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    best_idx: usize,
    f: f64,
    rng: &mut R,
) -> Array1<f64> {
    let idxs = distinct_indices(&[i, best_idx], 2, pop.nrows(), rng);
    let r1 = idxs[0];
    let r2 = idxs[1];

    Zip::from(pop.row(best_idx))
        .and(pop.row(r1))
        .and(pop.row(r2))
        .map_collect(|&b, &x1, &x2| b + f * (x1 - x2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_factor_returns_best() {
        let pop = Array2::from_shape_fn((6, 3), |(i, j)| (i * 3 + j) as f64);
        let mut rng = StdRng::seed_from_u64(1);
        let m = mutant_best1(0, &pop, 4, 0.0, &mut rng);
        assert_eq!(m, pop.row(4).to_owned());
    }
}
