//! Separating Axis Theorem oracle for rotated rectangles

use crate::rect::edge_axes;
use crate::types::Vec2;

/// Project a set of corners onto a unit axis, returning the interval
/// `(min, max)` of the dot products.
pub fn project(corners: &[Vec2; 4], axis: &Vec2) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in corners {
        let d = p.dot(axis);
        if d < min {
            min = d;
        }
        if d > max {
            max = d;
        }
    }
    (min, max)
}

/// Signed separation of two projection intervals.
///
/// Positive means the intervals are disjoint by that distance; negative
/// means they overlap by that amount.
fn interval_separation(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.1).max(a.0 - b.1)
}

/// SAT clearance oracle for a pair of rectangles.
///
/// Candidate axes are the edge normals of both rectangles (4 total).
/// A pair is separated when some axis shows a separation of at least
/// `min_gap`; in that case the violation is 0. Otherwise every axis
/// falls short of the required clearance and the returned violation is
/// the minimum shortfall `min_gap - separation` over the axes, the
/// amount by which the pair most-closely fails to be separated.
///
/// Separation of exactly `min_gap` counts as separated.
pub fn pair_clearance_violation(a: &[Vec2; 4], b: &[Vec2; 4], min_gap: f64) -> f64 {
    let axes_a = edge_axes(a);
    let axes_b = edge_axes(b);

    let mut min_violation = f64::INFINITY;
    for axis in axes_a.iter().chain(axes_b.iter()) {
        let pa = project(a, axis);
        let pb = project(b, axis);
        let sep = interval_separation(pa, pb);
        if sep >= min_gap {
            return 0.0;
        }
        let violation = min_gap - sep;
        if violation < min_violation {
            min_violation = violation;
        }
    }
    min_violation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::rect_corners;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_project_unit_square() {
        let c = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let (min, max) = project(&c, &Vec2::new(1.0, 0.0));
        assert!((min + 1.0).abs() < 1e-12);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_pair_has_no_violation() {
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect_corners(5.0, 0.0, 2.0, 2.0, 0.0);
        assert_eq!(pair_clearance_violation(&a, &b, 0.0), 0.0);
    }

    #[test]
    fn test_overlapping_pair_violation_depth() {
        // Unit gap would be 1.0 between edges at x=1 and x=2, but centers
        // at distance 2.0 leave the 2x2 squares overlapping by 1.0 in x.
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect_corners(1.0, 0.0, 2.0, 2.0, 0.0);
        let v = pair_clearance_violation(&a, &b, 0.0);
        assert!((v - 1.0).abs() < 1e-9, "violation = {}", v);
    }

    #[test]
    fn test_touching_pair_counts_as_separated() {
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect_corners(2.0, 0.0, 2.0, 2.0, 0.0);
        assert_eq!(pair_clearance_violation(&a, &b, 0.0), 0.0);
    }

    #[test]
    fn test_gap_exactly_min_gap_is_valid() {
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect_corners(2.5, 0.0, 2.0, 2.0, 0.0);
        assert_eq!(pair_clearance_violation(&a, &b, 0.5), 0.0);
    }

    #[test]
    fn test_gap_below_min_gap_violates() {
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let b = rect_corners(2.4, 0.0, 2.0, 2.0, 0.0);
        let v = pair_clearance_violation(&a, &b, 0.5);
        assert!((v - 0.1).abs() < 1e-9, "violation = {}", v);
    }

    #[test]
    fn test_rotated_diamond_clears_corner_gap() {
        // A square rotated 45 degrees narrows along the x axis, so it can
        // sit closer to an axis-aligned neighbor than an unrotated one.
        let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
        let rotated = rect_corners(2.5, 0.0, 2.0, 2.0, FRAC_PI_4);
        let unrotated = rect_corners(2.5, 0.0, 2.0, 2.0, 0.0);
        assert_eq!(pair_clearance_violation(&a, &rotated, 0.0), 0.0);
        assert!(pair_clearance_violation(&a, &unrotated, 0.0) > 0.0);
    }

    #[test]
    fn test_violation_is_symmetric() {
        let a = rect_corners(0.0, 0.0, 3.0, 1.0, 0.2);
        let b = rect_corners(1.0, 0.5, 2.0, 2.0, 1.1);
        let ab = pair_clearance_violation(&a, &b, 0.3);
        let ba = pair_clearance_violation(&b, &a, 0.3);
        assert!((ab - ba).abs() < 1e-12);
    }
}
