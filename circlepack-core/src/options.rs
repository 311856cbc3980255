//! Solver options

use crate::progress::ProgressSink;
use crate::result::Pose;
use crate::rotation::{RotationMode, Stage};
use std::fmt;
use std::sync::Arc;

/// A previously found layout used to seed the search.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmStart {
    /// Enclosing radius of the seed layout
    pub radius: f64,
    /// Seed poses, in input rectangle order
    pub poses: Vec<Pose>,
}

impl From<&crate::result::Solution> for WarmStart {
    fn from(sol: &crate::result::Solution) -> Self {
        Self {
            radius: sol.radius,
            poses: sol.poses.clone(),
        }
    }
}

/// Options controlling a packing solve.
///
/// All tuning fields are optional; unset fields fall back to per-stage
/// defaults (a robust budget for FIXED_0, a lighter one for each
/// permutation worker, a medium one for FREE).
#[derive(Clone, Default)]
pub struct SolveOptions {
    /// Rotation policy (default: the AUTO cascade)
    pub mode: RotationMode,
    /// Stop as soon as a valid layout with radius at or below this is found
    pub target_radius: Option<f64>,
    /// Override the per-stage generation budgets
    pub max_generations: Option<usize>,
    /// Override the per-stage population size multipliers
    pub popsize: Option<usize>,
    /// DE mutation factor F (default 0.5, accepted range [0.3, 1.0])
    pub mutation_factor: Option<f64>,
    /// DE crossover rate CR in [0, 1] (default 0.9)
    pub recombination: Option<f64>,
    /// Master seed for reproducible runs; unseeded runs use OS entropy
    pub seed: Option<u64>,
    /// Run discrete-stage permutations on the rayon pool (default true)
    pub parallel: bool,
    /// Receiver for per-permutation completion events
    pub progress: Option<Arc<dyn ProgressSink>>,
    /// Explicit stage list, overriding the mode's cascade
    pub stages: Option<Vec<Stage>>,
    /// Seed layout injected into the FIXED_0 and FREE populations
    pub warm_start: Option<WarmStart>,
    /// Print per-generation DE telemetry to stderr
    pub verbose: bool,
}

impl fmt::Debug for SolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveOptions")
            .field("mode", &self.mode)
            .field("target_radius", &self.target_radius)
            .field("max_generations", &self.max_generations)
            .field("popsize", &self.popsize)
            .field("mutation_factor", &self.mutation_factor)
            .field("recombination", &self.recombination)
            .field("seed", &self.seed)
            .field("parallel", &self.parallel)
            .field("progress", &self.progress.as_ref().map(|_| "<sink>"))
            .field("stages", &self.stages)
            .field("warm_start", &self.warm_start)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl SolveOptions {
    /// Options with all defaults: AUTO mode, parallel sweep, no target.
    pub fn new() -> Self {
        Self {
            parallel: true,
            ..Default::default()
        }
    }

    /// Sets the rotation mode.
    pub fn mode(mut self, mode: RotationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the target radius for early stopping.
    pub fn target_radius(mut self, r: f64) -> Self {
        self.target_radius = Some(r);
        self
    }

    /// Overrides the generation budget for every stage.
    pub fn max_generations(mut self, v: usize) -> Self {
        self.max_generations = Some(v);
        self
    }

    /// Overrides the population size multiplier for every stage.
    pub fn popsize(mut self, v: usize) -> Self {
        self.popsize = Some(v);
        self
    }

    /// Sets the DE mutation factor.
    pub fn mutation_factor(mut self, f: f64) -> Self {
        self.mutation_factor = Some(f);
        self
    }

    /// Sets the DE crossover rate.
    pub fn recombination(mut self, cr: f64) -> Self {
        self.recombination = Some(cr);
        self
    }

    /// Sets the master seed.
    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }

    /// Enables or disables the parallel permutation sweep.
    pub fn parallel(mut self, on: bool) -> Self {
        self.parallel = on;
        self
    }

    /// Sets the progress sink.
    pub fn progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Restricts the solve to an explicit stage list.
    pub fn stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = Some(stages);
        self
    }

    /// Seeds the search with a previously found layout.
    pub fn warm_start(mut self, ws: WarmStart) -> Self {
        self.warm_start = Some(ws);
        self
    }

    /// Enables per-generation DE telemetry.
    pub fn verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chains() {
        let opts = SolveOptions::new()
            .mode(RotationMode::Discrete90)
            .target_radius(10.0)
            .seed(42)
            .parallel(false);
        assert_eq!(opts.mode, RotationMode::Discrete90);
        assert_eq!(opts.target_radius, Some(10.0));
        assert_eq!(opts.seed, Some(42));
        assert!(!opts.parallel);
    }

    #[test]
    fn test_defaults_are_auto_and_parallel() {
        let opts = SolveOptions::new();
        assert_eq!(opts.mode, RotationMode::Auto);
        assert!(opts.parallel);
        assert!(opts.target_radius.is_none());
    }
}
