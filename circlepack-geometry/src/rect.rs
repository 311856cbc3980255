//! Rotated rectangle primitives

use crate::types::Vec2;

/// Four corners of a rectangle of size `(w, h)` centered at `(cx, cy)`,
/// rotated by `theta` radians about its center.
///
/// Corners are returned in counter-clockwise order starting from the
/// unrotated top-right corner, so consecutive pairs form the edges.
pub fn rect_corners(cx: f64, cy: f64, w: f64, h: f64, theta: f64) -> [Vec2; 4] {
    let (s, c) = theta.sin_cos();
    let hw = w / 2.0;
    let hh = h / 2.0;
    // CCW local corners: (+,+), (-,+), (-,-), (+,-)
    let locals = [(hw, hh), (-hw, hh), (-hw, -hh), (hw, -hh)];
    locals.map(|(dx, dy)| Vec2::new(cx + dx * c - dy * s, cy + dx * s + dy * c))
}

/// The two distinct unit edge normals of a rectangle given its corners.
///
/// Opposite edges of a rectangle share a normal direction, so only the
/// normals of the first two edges are needed as SAT candidate axes.
pub fn edge_axes(corners: &[Vec2; 4]) -> [Vec2; 2] {
    let e0 = corners[1].sub(&corners[0]);
    let e1 = corners[2].sub(&corners[1]);
    [
        e0.perp().normalized().unwrap_or(Vec2::new(1.0, 0.0)),
        e1.perp().normalized().unwrap_or(Vec2::new(0.0, 1.0)),
    ]
}

/// Half the diagonal of a `(w, h)` rectangle: the radius of its
/// circumscribed circle.
pub fn half_diagonal(w: f64, h: f64) -> f64 {
    (w / 2.0).hypot(h / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_axis_aligned_corners() {
        let c = rect_corners(0.0, 0.0, 4.0, 2.0, 0.0);
        assert_close(c[0].x, 2.0);
        assert_close(c[0].y, 1.0);
        assert_close(c[1].x, -2.0);
        assert_close(c[1].y, 1.0);
        assert_close(c[2].x, -2.0);
        assert_close(c[2].y, -1.0);
        assert_close(c[3].x, 2.0);
        assert_close(c[3].y, -1.0);
    }

    #[test]
    fn test_corners_translate_with_center() {
        let at_origin = rect_corners(0.0, 0.0, 3.0, 1.0, 0.3);
        let shifted = rect_corners(10.0, -5.0, 3.0, 1.0, 0.3);
        for (a, b) in at_origin.iter().zip(shifted.iter()) {
            assert_close(b.x - a.x, 10.0);
            assert_close(b.y - a.y, -5.0);
        }
    }

    #[test]
    fn test_quarter_turn_swaps_extent() {
        // A 4x2 rectangle rotated 90 degrees spans 2 in x and 4 in y.
        let c = rect_corners(0.0, 0.0, 4.0, 2.0, FRAC_PI_2);
        let max_x = c.iter().map(|p| p.x.abs()).fold(0.0, f64::max);
        let max_y = c.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
        assert_close(max_x, 1.0);
        assert_close(max_y, 2.0);
    }

    #[test]
    fn test_edge_axes_are_unit_and_orthogonal() {
        let corners = rect_corners(1.0, 2.0, 5.0, 3.0, FRAC_PI_4);
        let axes = edge_axes(&corners);
        assert_close(axes[0].norm(), 1.0);
        assert_close(axes[1].norm(), 1.0);
        assert_close(axes[0].dot(&axes[1]), 0.0);
    }

    #[test]
    fn test_half_diagonal() {
        assert_close(half_diagonal(6.0, 8.0), 5.0);
        assert_close(half_diagonal(10.0, 10.0), 50.0_f64.sqrt());
    }
}
