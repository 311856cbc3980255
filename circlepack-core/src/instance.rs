//! Problem instance definition

use crate::error::{PackError, Result};
use circlepack_geometry::half_diagonal;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle size. Orientation is decided by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    /// Width (extent along the rectangle's own x axis at angle 0)
    pub width: f64,
    /// Height (extent along the rectangle's own y axis at angle 0)
    pub height: f64,
}

impl RectSpec {
    /// Create a new rectangle spec
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Radius of the rectangle's circumscribed circle
    pub fn half_diagonal(&self) -> f64 {
        half_diagonal(self.width, self.height)
    }
}

/// A complete packing problem: the rectangles plus padding requirements.
///
/// Instances are read-only once constructed; every solve call works on
/// a shared reference and the permutation sweep hands each worker its
/// own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Rectangles to pack, in input order
    pub rects: Vec<RectSpec>,
    /// Required clearance between any rectangle and the circle boundary
    pub outer_padding: f64,
    /// Required clearance between any two rectangles
    pub inner_padding: f64,
}

impl Instance {
    /// Create an instance with no padding
    pub fn new(rects: Vec<RectSpec>) -> Self {
        Self {
            rects,
            outer_padding: 0.0,
            inner_padding: 0.0,
        }
    }

    /// Create an instance with explicit padding requirements
    pub fn with_padding(rects: Vec<RectSpec>, outer_padding: f64, inner_padding: f64) -> Self {
        Self {
            rects,
            outer_padding,
            inner_padding,
        }
    }

    /// Number of rectangles
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// True when the instance holds no rectangles
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Largest half-diagonal over all rectangles
    pub fn max_half_diagonal(&self) -> f64 {
        self.rects
            .iter()
            .map(|r| r.half_diagonal())
            .fold(0.0, f64::max)
    }

    /// Check the input invariants the solver relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidInstance`] for an empty rectangle
    /// set, non-positive or non-finite dimensions, or negative or
    /// non-finite padding.
    pub fn validate(&self) -> Result<()> {
        if self.rects.is_empty() {
            return Err(PackError::InvalidInstance {
                reason: "rectangle set is empty".into(),
            });
        }
        for (i, r) in self.rects.iter().enumerate() {
            if !(r.width.is_finite() && r.width > 0.0) {
                return Err(PackError::InvalidInstance {
                    reason: format!("rectangle {} has non-positive width {}", i, r.width),
                });
            }
            if !(r.height.is_finite() && r.height > 0.0) {
                return Err(PackError::InvalidInstance {
                    reason: format!("rectangle {} has non-positive height {}", i, r.height),
                });
            }
        }
        if !(self.outer_padding.is_finite() && self.outer_padding >= 0.0) {
            return Err(PackError::InvalidInstance {
                reason: format!("outer padding {} is negative", self.outer_padding),
            });
        }
        if !(self.inner_padding.is_finite() && self.inner_padding >= 0.0) {
            return Err(PackError::InvalidInstance {
                reason: format!("inner padding {} is negative", self.inner_padding),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_instance_passes() {
        let inst = Instance::with_padding(vec![RectSpec::new(10.0, 20.0)], 1.0, 0.5);
        assert!(inst.validate().is_ok());
    }

    #[test]
    fn test_empty_instance_rejected() {
        let inst = Instance::new(vec![]);
        assert!(matches!(
            inst.validate(),
            Err(PackError::InvalidInstance { .. })
        ));
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let inst = Instance::new(vec![RectSpec::new(0.0, 5.0)]);
        assert!(inst.validate().is_err());
        let inst = Instance::new(vec![RectSpec::new(5.0, -1.0)]);
        assert!(inst.validate().is_err());
    }

    #[test]
    fn test_negative_padding_rejected() {
        let inst = Instance::with_padding(vec![RectSpec::new(1.0, 1.0)], -0.1, 0.0);
        assert!(inst.validate().is_err());
        let inst = Instance::with_padding(vec![RectSpec::new(1.0, 1.0)], 0.0, f64::NAN);
        assert!(inst.validate().is_err());
    }

    #[test]
    fn test_max_half_diagonal() {
        let inst = Instance::new(vec![RectSpec::new(6.0, 8.0), RectSpec::new(2.0, 2.0)]);
        assert!((inst.max_half_diagonal() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_roundtrip_preserves_instance() {
        let inst = Instance::with_padding(
            vec![RectSpec::new(20.0, 10.0), RectSpec::new(15.0, 15.0)],
            1.0,
            0.5,
        );
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(inst, back);
    }
}
