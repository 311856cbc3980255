//! Parallel permutation dispatcher for the discrete stages
//!
//! Enumerates the Cartesian product of per-rectangle angle choices and
//! runs one independent fixed-angle DE per permutation. Workers share
//! nothing but a cancellation flag; each receives a self-contained,
//! serializable task. Aggregation is order-independent: the minimum
//! valid radius wins, with the permutation index as tie-breaker, so the
//! outcome is deterministic for a given seed regardless of which worker
//! finishes first.

use crate::instance::Instance;
use crate::options::SolveOptions;
use crate::penalty::PenaltyEvaluator;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::rotation::{Stage, decode_permutation};
use crate::runner::{RunBudget, RunOutcome, RunSpec, run_single};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Self-contained payload handed to one permutation worker.
///
/// Everything a worker needs crosses the boundary by value and
/// round-trips through serde, so no shared references or callbacks
/// leak into worker context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepTask {
    /// The problem instance (worker-owned copy)
    pub instance: Instance,
    /// Pinned per-rectangle angles for this permutation
    pub angles: Vec<f64>,
    /// Generation budget
    pub max_generations: usize,
    /// Population multiplier
    pub popsize: usize,
    /// DE mutation factor override
    pub mutation_factor: Option<f64>,
    /// DE crossover rate override
    pub recombination: Option<f64>,
    /// Worker seed, derived from the master seed and permutation index
    pub seed: Option<u64>,
    /// Target radius for early stopping
    pub target_radius: Option<f64>,
}

/// Aggregated outcome of one discrete-stage sweep.
pub(crate) struct SweepOutcome {
    /// Best valid result, lowest radius first
    pub best_valid: Option<RunOutcome>,
    /// Lowest-cost result regardless of validity (infeasible fallback)
    pub best_any: Option<RunOutcome>,
    /// Total permutations enumerated
    pub total: u64,
}

struct SweepState {
    completed: u64,
    best_valid: Option<(u64, RunOutcome)>,
    best_any: Option<(u64, RunOutcome)>,
}

impl SweepState {
    fn record(&mut self, idx: u64, outcome: RunOutcome, target: Option<f64>, cancel: &AtomicBool) {
        if outcome.valid {
            let better = match &self.best_valid {
                None => true,
                Some((best_idx, best)) => {
                    outcome.radius < best.radius
                        || (outcome.radius == best.radius && idx < *best_idx)
                }
            };
            if better {
                if let Some(t) = target {
                    if outcome.radius <= t + 1e-4 {
                        cancel.store(true, Ordering::Relaxed);
                    }
                }
                self.best_valid = Some((idx, outcome.clone()));
            }
        }
        let better_any = match &self.best_any {
            None => true,
            Some((best_idx, best)) => {
                outcome.cost < best.cost || (outcome.cost == best.cost && idx < *best_idx)
            }
        };
        if better_any {
            self.best_any = Some((idx, outcome));
        }
    }
}

fn run_task(task: SweepTask, cancel: Arc<AtomicBool>) -> crate::error::Result<RunOutcome> {
    let evaluator = PenaltyEvaluator::fixed(&task.instance, task.angles);
    run_single(RunSpec {
        evaluator,
        budget: RunBudget {
            max_generations: task.max_generations,
            popsize: task.popsize,
        },
        mutation_factor: task.mutation_factor,
        recombination: task.recombination,
        seed: task.seed,
        x0: None,
        target_radius: task.target_radius,
        cancel: Some(cancel),
        verbose: false,
    })
}

/// Run one worker and fold its result into the shared state.
///
/// Worker faults are logged and skipped; a failed permutation never
/// aborts the sweep. Cancelled workers contribute no result but still
/// count toward completion.
fn run_and_aggregate(
    idx: u64,
    task: SweepTask,
    total: u64,
    target: Option<f64>,
    cancel: &Arc<AtomicBool>,
    state: &Mutex<SweepState>,
    sink: Option<&Arc<dyn ProgressSink>>,
) {
    let outcome = if cancel.load(Ordering::Relaxed) {
        None
    } else {
        match catch_unwind(AssertUnwindSafe(|| run_task(task, cancel.clone()))) {
            Ok(Ok(out)) if !out.cancelled => Some(out),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                log::warn!("permutation {} failed: {}; skipping", idx, e);
                None
            }
            Err(_) => {
                log::warn!("permutation {} worker panicked; skipping", idx);
                None
            }
        }
    };

    let mut guard = state.lock().expect("sweep state poisoned");
    guard.completed += 1;
    if let Some(out) = outcome {
        guard.record(idx, out, target, cancel);
    }
    if let Some(sink) = sink {
        sink.on_progress(ProgressEvent {
            completed: guard.completed,
            total,
            best_radius: guard.best_valid.as_ref().map(|(_, o)| o.radius),
        });
    }
}

/// Sweep every angle permutation of a discrete stage.
pub(crate) fn sweep_permutations(
    instance: &Instance,
    stage: Stage,
    budget: RunBudget,
    options: &SolveOptions,
    stage_seed: Option<u64>,
) -> SweepOutcome {
    let choices = stage
        .angle_choices()
        .expect("sweep requires a discrete stage");
    let n = instance.len();
    let total = stage.permutation_count(n);

    if stage == Stage::Discrete45 && n > 8 {
        log::warn!(
            "DISCRETE_45 with {} rectangles enumerates {} permutations; consider skipping this stage",
            n,
            total
        );
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let state = Mutex::new(SweepState {
        completed: 0,
        best_valid: None,
        best_any: None,
    });
    let sink = options.progress.as_ref();

    let make_task = |idx: u64| SweepTask {
        instance: instance.clone(),
        angles: decode_permutation(idx, n, choices),
        max_generations: budget.max_generations,
        popsize: budget.popsize,
        mutation_factor: options.mutation_factor,
        recombination: options.recombination,
        seed: stage_seed.map(|s| s.wrapping_add(idx)),
        target_radius: options.target_radius,
    };

    if options.parallel {
        (0..total).into_par_iter().for_each(|idx| {
            run_and_aggregate(
                idx,
                make_task(idx),
                total,
                options.target_radius,
                &cancel,
                &state,
                sink,
            );
        });
    } else {
        for idx in 0..total {
            run_and_aggregate(
                idx,
                make_task(idx),
                total,
                options.target_radius,
                &cancel,
                &state,
                sink,
            );
        }
    }

    let state = state.into_inner().expect("sweep state poisoned");
    SweepOutcome {
        best_valid: state.best_valid.map(|(_, o)| o),
        best_any: state.best_any.map(|(_, o)| o),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::RectSpec;
    use std::f64::consts::FRAC_PI_2;

    fn small_budget() -> RunBudget {
        RunBudget {
            max_generations: 300,
            popsize: 10,
        }
    }

    #[test]
    fn test_task_roundtrips_through_serde() {
        let task = SweepTask {
            instance: Instance::with_padding(vec![RectSpec::new(3.0, 1.0)], 0.5, 0.25),
            angles: vec![FRAC_PI_2],
            max_generations: 600,
            popsize: 10,
            mutation_factor: Some(0.5),
            recombination: Some(0.9),
            seed: Some(17),
            target_radius: None,
        };
        let bytes = serde_json::to_vec(&task).unwrap();
        let back: SweepTask = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back.instance, task.instance);
        assert_eq!(back.angles, task.angles);
        assert_eq!(back.seed, task.seed);
    }

    #[test]
    fn test_sweep_enumerates_all_permutations() {
        let instance = Instance::new(vec![RectSpec::new(3.0, 1.0), RectSpec::new(1.0, 3.0)]);
        let counter = Arc::new(CountingSink::default());
        let options = SolveOptions::new()
            .seed(7)
            .parallel(false)
            .progress(counter.clone());
        let out = sweep_permutations(
            &instance,
            Stage::Discrete90,
            small_budget(),
            &options,
            Some(7),
        );
        assert_eq!(out.total, 4);
        assert_eq!(counter.last(), (4, 4));
        assert!(out.best_valid.is_some());
    }

    #[test]
    fn test_sweep_is_seed_deterministic() {
        let instance = Instance::new(vec![RectSpec::new(4.0, 2.0), RectSpec::new(2.0, 4.0)]);
        let run = |parallel: bool| {
            let options = SolveOptions::new().seed(123).parallel(parallel);
            sweep_permutations(
                &instance,
                Stage::Discrete90,
                small_budget(),
                &options,
                Some(123),
            )
        };
        let serial = run(false);
        let parallel = run(true);
        let r1 = serial.best_valid.as_ref().map(|o| o.radius);
        let r2 = parallel.best_valid.as_ref().map(|o| o.radius);
        assert_eq!(r1, r2, "aggregation must not depend on arrival order");
    }

    #[derive(Default)]
    struct CountingSink {
        last: Mutex<(u64, u64)>,
    }

    impl CountingSink {
        fn last(&self) -> (u64, u64) {
            *self.last.lock().unwrap()
        }
    }

    impl ProgressSink for CountingSink {
        fn on_progress(&self, event: ProgressEvent) {
            let mut guard = self.last.lock().unwrap();
            assert!(event.completed > guard.0, "progress must be monotonic");
            *guard = (event.completed, event.total);
        }
    }
}
