use ndarray::{Array1, Array2};
use rand::Rng;

pub(crate) fn init_random<R: Rng + ?Sized>(
    n: usize,
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            let u: f64 = rng.random::<f64>();
            pop[(i, j)] = lower[j] + u * (upper[j] - lower[j]);
        }
    }
    pop
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_population_within_bounds() {
        let lower = array![-2.0, 0.0, 10.0];
        let upper = array![2.0, 1.0, 20.0];
        let mut rng = StdRng::seed_from_u64(3);
        let pop = init_random(3, 25, &lower, &upper, &mut rng);
        for i in 0..25 {
            for j in 0..3 {
                assert!(pop[(i, j)] >= lower[j] && pop[(i, j)] <= upper[j]);
            }
        }
    }
}
