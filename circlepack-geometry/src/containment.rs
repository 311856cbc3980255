//! Circle containment oracle

use crate::types::Vec2;

/// Excess distance of a corner beyond a containment limit.
///
/// `limit` is the effective radius (enclosing radius minus the outer
/// padding). Positive return means the corner lies outside the allowed
/// circle by that distance; zero or negative means it is contained.
pub fn containment_excess(corner: &Vec2, limit: f64) -> f64 {
    corner.norm() - limit
}

/// Largest containment excess over a rectangle's corners.
pub fn max_containment_excess(corners: &[Vec2; 4], limit: f64) -> f64 {
    corners
        .iter()
        .map(|c| containment_excess(c, limit))
        .fold(f64::NEG_INFINITY, f64::max)
}
