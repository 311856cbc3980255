use ndarray::Array1;

/// Wrap periodic dimensions back into their bound interval.
///
/// Non-periodic dimensions are left untouched; callers clamp those
/// separately. Wrapping (rather than clamping) avoids biasing angular
/// variables toward the interval endpoints.
pub(crate) fn apply_periodic(
    x: &mut Array1<f64>,
    mask: &[bool],
    lower: &Array1<f64>,
    upper: &Array1<f64>,
) {
    for i in 0..x.len() {
        if i < mask.len() && mask[i] {
            let span = upper[i] - lower[i];
            if span > 0.0 {
                let mut v = (x[i] - lower[i]) % span;
                if v < 0.0 {
                    v += span;
                }
                x[i] = lower[i] + v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn test_wraps_above_and_below() {
        let lower = array![0.0, 0.0];
        let upper = array![PI, PI];
        let mask = [true, true];

        let mut x = array![PI + 0.5, -0.25];
        apply_periodic(&mut x, &mask, &lower, &upper);
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!((x[1] - (PI - 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_non_periodic_untouched() {
        let lower = array![0.0, 0.0];
        let upper = array![1.0, 1.0];
        let mask = [false, true];

        let mut x = array![5.0, 1.5];
        apply_periodic(&mut x, &mask, &lower, &upper);
        assert_eq!(x[0], 5.0);
        assert!((x[1] - 0.5).abs() < 1e-12);
    }
}
