//! Geometry kernel for rectangle-in-circle packing.
//!
//! This crate provides the geometric oracles the packing optimizer is
//! built on: rotated rectangle corners, Separating Axis Theorem (SAT)
//! clearance between rectangle pairs, and circle containment of
//! corners. It knows nothing about the optimizer itself.
//!
//! # Example
//!
//! ```rust
//! use circlepack_geometry::{pair_clearance_violation, rect_corners};
//!
//! let a = rect_corners(0.0, 0.0, 2.0, 2.0, 0.0);
//! let b = rect_corners(5.0, 0.0, 2.0, 2.0, 0.0);
//! // Separated by 3.0, so a required gap of 1.0 is satisfied.
//! assert_eq!(pair_clearance_violation(&a, &b, 1.0), 0.0);
//! ```

pub mod containment;
pub mod rect;
pub mod sat;
pub mod types;

pub use containment::{containment_excess, max_containment_excess};
pub use rect::{edge_axes, half_diagonal, rect_corners};
pub use sat::{pair_clearance_violation, project};
pub use types::Vec2;
