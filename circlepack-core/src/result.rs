//! Solve result representation

use crate::rotation::Stage;
use serde::{Deserialize, Serialize};

/// Placement of one rectangle: center coordinates and rotation angle
/// in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Center x coordinate
    pub x: f64,
    /// Center y coordinate
    pub y: f64,
    /// Rotation angle in radians, in [0, pi)
    pub theta: f64,
}

impl Pose {
    /// Create a new pose
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

/// Result of a packing solve.
///
/// Always present, even when no feasible layout was found: `valid`
/// distinguishes a proven-feasible layout from the best infeasible
/// attempt. Poses are in input rectangle order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Radius of the enclosing circle
    pub radius: f64,
    /// Whether the layout satisfies containment and pairwise clearance
    pub valid: bool,
    /// One pose per input rectangle, in input order
    pub poses: Vec<Pose>,
    /// The stage that produced this layout
    pub stage: Stage,
    /// Generations consumed by the DE run that produced this layout
    pub generations: usize,
    /// Total angle permutations attempted across all stages run
    pub permutations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_serde_roundtrip() {
        let sol = Solution {
            radius: 12.5,
            valid: true,
            poses: vec![Pose::new(0.0, 1.0, 0.5), Pose::new(-3.0, 2.0, 0.0)],
            stage: Stage::Discrete90,
            generations: 420,
            permutations: 17,
        };
        let json = serde_json::to_string(&sol).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back.radius, sol.radius);
        assert_eq!(back.poses, sol.poses);
        assert_eq!(back.stage, sol.stage);
    }
}
