//! Differential Evolution engine for the circlepack solver.
//!
//! A compact, strictly single-threaded implementation of Differential
//! Evolution (DE), a population-based stochastic optimizer for
//! continuous problems. The packing solver runs many independent DE
//! instances in parallel across angle permutations, so the engine
//! itself performs sequential generations with no internal concurrency
//! and fully deterministic behavior for a given seed.
//!
//! # Features
//!
//! - `best/1/bin` (reference) and `rand/1/bin` strategies
//! - Binomial crossover with a mandatory-inherit index
//! - Periodic (wrapping) dimensions for angular variables
//! - Uniform random or Latin Hypercube initialization
//! - Early stopping through a per-generation callback
//!
//! # Example
//!
//! ```rust
//! use circlepack_de::{differential_evolution, DEConfigBuilder};
//!
//! // Minimize the sphere function: f(x) = sum(x_i^2)
//! let bounds = vec![(-5.0, 5.0), (-5.0, 5.0)];
//! let config = DEConfigBuilder::new()
//!     .max_generations(200)
//!     .seed(42)
//!     .build()
//!     .expect("invalid config");
//!
//! let result = differential_evolution(
//!     &|x| x.iter().map(|&xi| xi * xi).sum(),
//!     &bounds,
//!     config,
//! ).expect("optimization should succeed");
//!
//! assert!(result.fun < 1e-3);
//! ```
#![warn(missing_docs)]

pub mod error;
pub use error::{DEError, Result};

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod apply_periodic;
mod crossover_binomial;
mod distinct_indices;
mod init_latin_hypercube;
mod init_random;
mod mutant_best1;
mod mutant_rand1;


/// Callback function type, invoked once per generation.
pub type CallbackFn = Box<dyn FnMut(&DEIntermediate) -> CallbackAction>;

pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

/// Differential Evolution mutation strategy.
///
/// Both strategies use binomial crossover; they differ in the base
/// vector the difference is added to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Best/1/Bin: best individual + 1 difference vector (reference).
    #[default]
    Best1Bin,
    /// Rand/1/Bin: random individual + 1 difference vector.
    Rand1Bin,
}

impl FromStr for Strategy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "best1bin" | "best1" => Ok(Strategy::Best1Bin),
            "rand1bin" | "rand1" => Ok(Strategy::Rand1Bin),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}

/// Mutation setting: either a fixed factor or a uniform range (dithering).
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    /// Fixed mutation factor F.
    Factor(f64),
    /// Dithering range [min, max), resampled each trial.
    Range {
        /// Minimum mutation factor.
        min: f64,
        /// Maximum mutation factor.
        max: f64,
    },
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::Factor(0.5)
    }
}

impl Mutation {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Mutation::Factor(f) => f,
            Mutation::Range { min, max } if max > min => rng.random_range(min..max),
            Mutation::Range { min, .. } => min,
        }
    }

    fn validate(&self) -> Result<()> {
        let check = |f: f64| {
            if !(0.3..=1.0).contains(&f) {
                Err(DEError::InvalidMutationFactor { factor: f })
            } else {
                Ok(())
            }
        };
        match *self {
            Mutation::Factor(f) => check(f),
            Mutation::Range { min, max } => {
                check(min)?;
                check(max)
            }
        }
    }
}

/// Initialization scheme for the population.
#[derive(Debug, Clone, Copy, Default)]
pub enum Init {
    /// Uniform random initialization within bounds.
    #[default]
    Random,
    /// Latin Hypercube Sampling for better space coverage.
    LatinHypercube,
}

/// Configuration for the Differential Evolution optimizer.
pub struct DEConfig {
    /// Maximum number of generations.
    pub max_generations: usize,
    /// Population size multiplier; total population is
    /// `max(popsize * dim, 15)`.
    pub popsize: usize,
    /// Relative tolerance for convergence on the population cost spread.
    pub tol: f64,
    /// Absolute tolerance for convergence on the population cost spread.
    pub atol: f64,
    /// Mutation factor setting.
    pub mutation: Mutation,
    /// Crossover probability CR in [0, 1].
    pub recombination: f64,
    /// Mutation strategy.
    pub strategy: Strategy,
    /// Population initialization scheme.
    pub init: Init,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Optional periodic mask; true => variable wraps modulo its bound
    /// span instead of clamping (used for angles).
    pub periodic: Option<Vec<bool>>,
    /// Optional initial guess seeded into the population.
    pub x0: Option<Array1<f64>>,
    /// Print per-generation progress to stderr.
    pub disp: bool,
    /// Optional per-generation callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for DEConfig {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            popsize: 5,
            tol: 1e-6,
            atol: 0.0,
            mutation: Mutation::default(),
            recombination: 0.9,
            strategy: Strategy::default(),
            init: Init::default(),
            seed: None,
            periodic: None,
            x0: None,
            disp: false,
            callback: None,
        }
    }
}

/// Fluent builder for [`DEConfig`].
///
/// # Example
///
/// ```rust
/// use circlepack_de::{DEConfigBuilder, Mutation, Strategy};
///
/// let config = DEConfigBuilder::new()
///     .max_generations(500)
///     .popsize(10)
///     .strategy(Strategy::Best1Bin)
///     .mutation(Mutation::Factor(0.5))
///     .recombination(0.9)
///     .seed(42)
///     .build()
///     .unwrap();
/// ```
pub struct DEConfigBuilder {
    cfg: DEConfig,
}

impl Default for DEConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DEConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: DEConfig::default(),
        }
    }
    /// Sets the maximum number of generations.
    pub fn max_generations(mut self, v: usize) -> Self {
        self.cfg.max_generations = v;
        self
    }
    /// Sets the population size multiplier.
    pub fn popsize(mut self, v: usize) -> Self {
        self.cfg.popsize = v;
        self
    }
    /// Sets the relative convergence tolerance.
    pub fn tol(mut self, v: f64) -> Self {
        self.cfg.tol = v;
        self
    }
    /// Sets the absolute convergence tolerance.
    pub fn atol(mut self, v: f64) -> Self {
        self.cfg.atol = v;
        self
    }
    /// Sets the mutation factor configuration.
    pub fn mutation(mut self, v: Mutation) -> Self {
        self.cfg.mutation = v;
        self
    }
    /// Sets the crossover probability (CR).
    pub fn recombination(mut self, v: f64) -> Self {
        self.cfg.recombination = v;
        self
    }
    /// Sets the mutation strategy.
    pub fn strategy(mut self, v: Strategy) -> Self {
        self.cfg.strategy = v;
        self
    }
    /// Sets the population initialization scheme.
    pub fn init(mut self, v: Init) -> Self {
        self.cfg.init = v;
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets the periodic (wrapping) dimension mask.
    pub fn periodic(mut self, v: Vec<bool>) -> Self {
        self.cfg.periodic = Some(v);
        self
    }
    /// Sets an initial guess to seed the population.
    pub fn x0(mut self, v: Array1<f64>) -> Self {
        self.cfg.x0 = Some(v);
        self
    }
    /// Enables/disables progress display.
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    /// Sets a per-generation callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DEError::InvalidMutationFactor` if the mutation factor
    /// is outside [0.3, 1.0], or `DEError::InvalidCrossoverRate` if the
    /// crossover probability is outside [0, 1].
    pub fn build(self) -> Result<DEConfig> {
        self.cfg.mutation.validate()?;
        if !(0.0..=1.0).contains(&self.cfg.recombination) {
            return Err(DEError::InvalidCrossoverRate {
                rate: self.cfg.recombination,
            });
        }
        Ok(self.cfg)
    }
}

/// Result/report of a DE optimization run.
#[derive(Clone)]
pub struct DEReport {
    /// The best solution vector observed.
    pub x: Array1<f64>,
    /// The objective function value at the best solution.
    pub fun: f64,
    /// Whether the run converged (as opposed to exhausting its budget).
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
    /// Number of generations performed.
    pub nit: usize,
    /// Generation in which the best solution was found.
    pub best_nit: usize,
    /// Number of function evaluations performed.
    pub nfev: usize,
    /// Final population matrix (NP x n).
    pub population: Array2<f64>,
    /// Cost values for each population member, consistent with
    /// `population` row-for-row.
    pub population_energies: Array1<f64>,
}

impl fmt::Debug for DEReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DEReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("success", &self.success)
            .field("message", &self.message)
            .field("nit", &self.nit)
            .field("best_nit", &self.best_nit)
            .field("nfev", &self.nfev)
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .finish()
    }
}

/// Information passed to the callback after each generation.
pub struct DEIntermediate {
    /// Current best solution vector.
    pub x: Array1<f64>,
    /// Current best objective value.
    pub fun: f64,
    /// Population cost spread (max - min).
    pub spread: f64,
    /// Current generation number.
    pub iter: usize,
}

/// Action returned by the callback to control optimization flow.
pub enum CallbackAction {
    /// Continue optimization.
    Continue,
    /// Stop optimization early.
    Stop,
}

/// Differential Evolution optimizer.
///
/// Use [`DifferentialEvolution::new`] to create an instance, configure
/// with [`config_mut`](Self::config_mut), then call [`solve`](Self::solve).
pub struct DifferentialEvolution<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    func: &'a F,
    lower: Array1<f64>,
    upper: Array1<f64>,
    config: DEConfig,
}

impl<'a, F> DifferentialEvolution<'a, F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    /// Creates a new DE optimizer with objective `func` and bounds
    /// `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns `DEError::BoundsMismatch` if `lower` and `upper` have
    /// different lengths, or `DEError::InvalidBounds` if any lower
    /// bound exceeds its upper bound.
    pub fn new(func: &'a F, lower: Array1<f64>, upper: Array1<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(DEError::BoundsMismatch {
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }
        for i in 0..lower.len() {
            if lower[i] > upper[i] {
                return Err(DEError::InvalidBounds {
                    index: i,
                    lower: lower[i],
                    upper: upper[i],
                });
            }
        }

        Ok(Self {
            func,
            lower,
            upper,
            config: DEConfig::default(),
        })
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut DEConfig {
        &mut self.config
    }

    /// Evaluate the objective, mapping non-finite results to +infinity
    /// so anomalous trials are always rejected by selection.
    fn energy(&self, x: &Array1<f64>) -> f64 {
        let f = (self.func)(x);
        if f.is_finite() { f } else { f64::INFINITY }
    }

    /// Wrap periodic dimensions, then clamp the rest into bounds.
    fn repair(&self, x: &mut Array1<f64>) {
        if let Some(mask) = &self.config.periodic {
            apply_periodic::apply_periodic(x, mask, &self.lower, &self.upper);
        }
        for j in 0..x.len() {
            x[j] = x[j].clamp(self.lower[j], self.upper[j]);
        }
    }

    /// Run the optimization and return a report.
    ///
    /// A run never fails: the report always carries the best vector
    /// observed, whether or not the population converged.
    pub fn solve(&mut self) -> DEReport {
        use crossover_binomial::binomial_crossover;
        use init_latin_hypercube::init_latin_hypercube;
        use init_random::init_random;
        use mutant_best1::mutant_best1;
        use mutant_rand1::mutant_rand1;

        let n = self.lower.len();
        let npop = (self.config.popsize * n).max(15);

        if self.config.disp {
            eprintln!(
                "DE init: {} dimensions, population={}, max_generations={}",
                n, npop, self.config.max_generations
            );
        }

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        let mut pop = match self.config.init {
            Init::Random => init_random(n, npop, &self.lower, &self.upper, &mut rng),
            Init::LatinHypercube => {
                init_latin_hypercube(n, npop, &self.lower, &self.upper, &mut rng)
            }
        };

        let mut nfev: usize = 0;
        let mut energies = Array1::<f64>::zeros(npop);
        for i in 0..npop {
            energies[i] = self.energy(&pop.row(i).to_owned());
        }
        nfev += npop;

        // If x0 provided, repair it into bounds and replace the worst member.
        if let Some(x0) = &self.config.x0 {
            let mut x0c = x0.clone();
            self.repair(&mut x0c);
            let f0 = self.energy(&x0c);
            nfev += 1;
            let mut worst = 0usize;
            for i in 1..npop {
                if energies[i] > energies[worst] {
                    worst = i;
                }
            }
            pop.row_mut(worst).assign(&x0c.view());
            energies[worst] = f0;
        }

        let (mut best_idx, mut best_f) = argmin(&energies);
        let mut best_x = pop.row(best_idx).to_owned();
        let mut best_nit = 0usize;

        let mut success = false;
        let mut message = String::new();
        let mut nit = 0;

        for iter in 1..=self.config.max_generations {
            nit = iter;
            let mut accepted = 0usize;

            // Build all trials against the generation-start population,
            // then select; the best index stays fixed within a generation.
            let mut trials: Vec<Array1<f64>> = Vec::with_capacity(npop);
            for i in 0..npop {
                let f = self.config.mutation.sample(&mut rng);
                let mutant = match self.config.strategy {
                    Strategy::Best1Bin => mutant_best1(i, &pop, best_idx, f, &mut rng),
                    Strategy::Rand1Bin => mutant_rand1(i, &pop, f, &mut rng),
                };
                let mut trial = binomial_crossover(
                    &pop.row(i).to_owned(),
                    &mutant,
                    self.config.recombination,
                    &mut rng,
                );
                self.repair(&mut trial);
                trials.push(trial);
            }

            for (i, trial) in trials.into_iter().enumerate() {
                let trial_energy = self.energy(&trial);
                if trial_energy <= energies[i] {
                    pop.row_mut(i).assign(&trial.view());
                    energies[i] = trial_energy;
                    accepted += 1;
                }
            }
            nfev += npop;

            let (new_best_idx, new_best_f) = argmin(&energies);
            if new_best_f < best_f {
                best_idx = new_best_idx;
                best_f = new_best_f;
                best_x = pop.row(best_idx).to_owned();
                best_nit = iter;
            } else {
                best_idx = new_best_idx;
            }

            let spread = population_spread(&energies);

            if self.config.disp {
                eprintln!(
                    "DE iter {:4}  best_f={:.6e}  spread={:.3e}  accepted={}/{}",
                    iter, best_f, spread, accepted, npop
                );
            }

            if let Some(ref mut cb) = self.config.callback {
                let intermediate = DEIntermediate {
                    x: best_x.clone(),
                    fun: best_f,
                    spread,
                    iter,
                };
                if matches!(cb(&intermediate), CallbackAction::Stop) {
                    success = true;
                    message = "Optimization stopped by callback".to_string();
                    break;
                }
            }

            let threshold = self.config.atol + self.config.tol * best_f.abs();
            if spread.is_finite() && spread <= threshold {
                success = true;
                message = format!(
                    "Converged: spread={:.3e} <= threshold={:.3e}",
                    spread, threshold
                );
                break;
            }
        }

        if !success {
            message = format!("Maximum generations reached: {}", self.config.max_generations);
        }

        if self.config.disp {
            eprintln!("DE finished: {}", message);
        }

        DEReport {
            x: best_x,
            fun: best_f,
            success,
            message,
            nit,
            best_nit,
            nfev,
            population: pop,
            population_energies: energies,
        }
    }
}

fn population_spread(energies: &Array1<f64>) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &e in energies.iter() {
        if e < min {
            min = e;
        }
        if e > max {
            max = e;
        }
    }
    max - min
}

/// Runs Differential Evolution optimization on a function.
///
/// Convenience wrapper that creates a DE optimizer with the given
/// bounds and configuration, then runs it to completion.
///
/// # Errors
///
/// Returns `DEError::InvalidBounds` if any bound pair has upper < lower.
pub fn differential_evolution<F>(
    func: &F,
    bounds: &[(f64, f64)],
    config: DEConfig,
) -> Result<DEReport>
where
    F: Fn(&Array1<f64>) -> f64,
{
    let n = bounds.len();
    let mut lower = Array1::<f64>::zeros(n);
    let mut upper = Array1::<f64>::zeros(n);
    for (i, (lo, hi)) in bounds.iter().enumerate() {
        lower[i] = *lo;
        upper[i] = *hi;
        if hi < lo {
            return Err(DEError::InvalidBounds {
                index: i,
                lower: *lo,
                upper: *hi,
            });
        }
    }
    if let Some(x0) = &config.x0 {
        if x0.len() != n {
            return Err(DEError::X0DimensionMismatch {
                expected: n,
                got: x0.len(),
            });
        }
    }
    if let Some(mask) = &config.periodic {
        if mask.len() != n {
            return Err(DEError::PeriodicDimensionMismatch {
                expected: n,
                got: mask.len(),
            });
        }
    }
    let mut de = DifferentialEvolution::new(func, lower, upper)?;
    *de.config_mut() = config;
    Ok(de.solve())
}
