//! Core data types for 2D packing geometry

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point or vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Subtract another vector
    pub fn sub(&self, other: &Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Add another vector
    pub fn add(&self, other: &Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Scale by a scalar
    pub fn scale(&self, s: f64) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The left-hand perpendicular (-y, x)
    pub fn perp(&self) -> Vec2 {
        Vec2 {
            x: -self.y,
            y: self.x,
        }
    }

    /// Unit vector in the same direction. Returns `None` for near-zero vectors.
    pub fn normalized(&self) -> Option<Vec2> {
        let len = self.norm();
        if len > 1e-12 {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}
