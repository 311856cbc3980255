//! Minimal-radius circle packing of rectangles.
//!
//! Given `N` rectangles with known sizes, find centers and (optionally)
//! orientations that fit them into the smallest enclosing circle,
//! honoring a clearance between rectangles and a clearance from the
//! circle boundary. The search couples a penalty objective (radius plus
//! weighted squared SAT and containment violations) with Differential
//! Evolution, staged over rotation policies of increasing cost:
//! FIXED_0, DISCRETE_90, DISCRETE_45, FREE. Discrete stages enumerate
//! every per-rectangle angle permutation and optimize each on its own
//! worker in parallel.
//!
//! # Example
//!
//! ```rust
//! use circlepack_core::{solve, Instance, RectSpec, RotationMode, SolveOptions};
//!
//! let instance = Instance::new(vec![RectSpec::new(20.0, 10.0)]);
//! let options = SolveOptions::new().mode(RotationMode::Fixed0).seed(42);
//! let solution = solve(&instance, &options).unwrap();
//!
//! assert!(solution.valid);
//! // A single rectangle packs at its half diagonal.
//! assert!((solution.radius - 125.0_f64.sqrt()).abs() < 0.3);
//! ```
//!
//! Infeasibility is not an error: when no stage finds a feasible
//! layout, the lowest-cost attempt comes back with `valid = false` and
//! the caller decides whether to retry with different options. Only
//! invalid inputs (empty instance, non-positive sizes, negative
//! padding, out-of-range DE parameters) produce an [`PackError`].

pub mod error;
pub mod instance;
pub mod options;
pub mod penalty;
pub mod progress;
pub mod result;
pub mod rotation;

mod runner;
mod stages;
mod sweep;

pub use error::{PackError, Result};
pub use instance::{Instance, RectSpec};
pub use options::{SolveOptions, WarmStart};
pub use penalty::PenaltyEvaluator;
pub use progress::{ConsoleSink, ProgressEvent, ProgressSink, SilentSink};
pub use result::{Pose, Solution};
pub use rotation::{RotationMode, Stage};
pub use stages::solve;
pub use sweep::SweepTask;
