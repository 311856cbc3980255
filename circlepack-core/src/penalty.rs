//! Penalty evaluator: state vector to scalar cost
//!
//! The evaluator turns a candidate state vector into the objective
//! `R + weighted squared violations`. Violations come from two oracles:
//! circle containment of every rectangle corner and SAT clearance
//! between every rectangle pair. A state with zero violation has cost
//! exactly `R`, so selection pressure alone drives the population
//! toward feasible layouts.

use crate::instance::Instance;
use crate::result::Pose;
use circlepack_geometry::{Vec2, containment_excess, pair_clearance_violation, rect_corners};
use ndarray::Array1;

/// Weight on squared containment excess.
pub const CONTAINMENT_WEIGHT: f64 = 1e3;
/// Weight on squared pairwise penetration depth.
pub const OVERLAP_WEIGHT: f64 = 1e4;
/// Penalty threshold under which a state counts as feasible.
pub const VALIDITY_TOL: f64 = 1e-4;

/// Evaluator for one angle regime: either a fixed per-rectangle angle
/// assignment (FIXED_0 and the discrete stages) or free angles encoded
/// in the state vector.
///
/// Pure: evaluation has no side effects and depends only on the state
/// vector and the construction-time inputs.
#[derive(Debug, Clone)]
pub struct PenaltyEvaluator {
    sizes: Vec<(f64, f64)>,
    outer_padding: f64,
    inner_padding: f64,
    /// `Some(angles)` pins each rectangle's angle; `None` reads angles
    /// from the state vector (FREE mode).
    angles: Option<Vec<f64>>,
}

impl PenaltyEvaluator {
    /// Evaluator for a fixed angle assignment (dim `1 + 2N`).
    pub fn fixed(instance: &Instance, angles: Vec<f64>) -> Self {
        debug_assert_eq!(angles.len(), instance.len());
        Self {
            sizes: instance.rects.iter().map(|r| (r.width, r.height)).collect(),
            outer_padding: instance.outer_padding,
            inner_padding: instance.inner_padding,
            angles: Some(angles),
        }
    }

    /// Evaluator with free angles (dim `1 + 3N`).
    pub fn free(instance: &Instance) -> Self {
        Self {
            sizes: instance.rects.iter().map(|r| (r.width, r.height)).collect(),
            outer_padding: instance.outer_padding,
            inner_padding: instance.inner_padding,
            angles: None,
        }
    }

    /// Number of rectangles.
    pub fn n_rects(&self) -> usize {
        self.sizes.len()
    }

    /// State vector dimension.
    pub fn dim(&self) -> usize {
        if self.angles.is_some() {
            1 + 2 * self.n_rects()
        } else {
            1 + 3 * self.n_rects()
        }
    }

    fn corners_of(&self, x: &Array1<f64>) -> Vec<[Vec2; 4]> {
        let n = self.n_rects();
        let mut all = Vec::with_capacity(n);
        for i in 0..n {
            let (w, h) = self.sizes[i];
            let (cx, cy, theta) = match &self.angles {
                Some(angles) => (x[1 + 2 * i], x[2 + 2 * i], angles[i]),
                None => (x[1 + 3 * i], x[2 + 3 * i], x[3 + 3 * i]),
            };
            all.push(rect_corners(cx, cy, w, h, theta));
        }
        all
    }

    /// Weighted violation sum: containment excesses and pairwise
    /// penetration depths, squared and weighted. Zero iff feasible.
    pub fn penalty(&self, x: &Array1<f64>) -> f64 {
        let effective_r = x[0] - self.outer_padding;
        let all_corners = self.corners_of(x);

        let mut p = 0.0;
        for corners in &all_corners {
            for corner in corners {
                let e = containment_excess(corner, effective_r);
                if e > 0.0 {
                    p += CONTAINMENT_WEIGHT * e * e;
                }
            }
        }

        let n = all_corners.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let depth =
                    pair_clearance_violation(&all_corners[i], &all_corners[j], self.inner_padding);
                if depth > 0.0 {
                    p += OVERLAP_WEIGHT * depth * depth;
                }
            }
        }
        p
    }

    /// Full objective: the radius plus the weighted violation sum.
    pub fn cost(&self, x: &Array1<f64>) -> f64 {
        x[0] + self.penalty(x)
    }

    /// Whether the state is feasible (violations below tolerance).
    pub fn is_valid(&self, x: &Array1<f64>) -> bool {
        self.penalty(x) < VALIDITY_TOL
    }

    /// Decode a state vector into per-rectangle poses in input order.
    pub fn poses(&self, x: &Array1<f64>) -> Vec<Pose> {
        let n = self.n_rects();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let pose = match &self.angles {
                Some(angles) => Pose::new(x[1 + 2 * i], x[2 + 2 * i], angles[i]),
                None => Pose::new(x[1 + 3 * i], x[2 + 3 * i], x[3 + 3 * i]),
            };
            out.push(pose);
        }
        out
    }

    /// Re-encode a layout into a state vector for warm starting.
    pub fn state_from_layout(&self, radius: f64, poses: &[Pose]) -> Array1<f64> {
        let mut x = Array1::<f64>::zeros(self.dim());
        x[0] = radius;
        for (i, pose) in poses.iter().enumerate().take(self.n_rects()) {
            match &self.angles {
                Some(_) => {
                    x[1 + 2 * i] = pose.x;
                    x[2 + 2 * i] = pose.y;
                }
                None => {
                    x[1 + 3 * i] = pose.x;
                    x[2 + 3 * i] = pose.y;
                    x[3 + 3 * i] = pose.theta;
                }
            }
        }
        x
    }

    /// Search bounds for the state vector, plus the periodic mask for
    /// angular dimensions.
    ///
    /// The radius interval is a true enclosure of the feasible range:
    /// no layout can beat the largest single circumscribed rectangle,
    /// and lining every rectangle up along a diameter (with padding)
    /// bounds the worst case from above.
    pub fn search_bounds(&self) -> (Vec<(f64, f64)>, Vec<bool>) {
        let n = self.n_rects();
        let max_half_diag = self
            .sizes
            .iter()
            .map(|&(w, h)| (w / 2.0).hypot(h / 2.0))
            .fold(0.0, f64::max);
        let r_min = max_half_diag + self.outer_padding;
        let r_max = self.sizes.iter().map(|&(w, h)| w.max(h)).sum::<f64>() * 1.5
            + n as f64 * self.inner_padding
            + self.outer_padding;
        let r_max = r_max.max(r_min * 1.5);

        let mut bounds = Vec::with_capacity(self.dim());
        let mut periodic = Vec::with_capacity(self.dim());
        bounds.push((r_min, r_max));
        periodic.push(false);
        for _ in 0..n {
            bounds.push((-r_max, r_max));
            periodic.push(false);
            bounds.push((-r_max, r_max));
            periodic.push(false);
            if self.angles.is_none() {
                bounds.push((0.0, std::f64::consts::PI));
                periodic.push(true);
            }
        }
        (bounds, periodic)
    }
}
