//! One DE run against one penalty evaluator

use crate::error::{PackError, Result};
use crate::penalty::{PenaltyEvaluator, VALIDITY_TOL};
use crate::result::Pose;
use circlepack_de::{CallbackAction, DEConfigBuilder, Mutation};
use ndarray::Array1;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Generation and population budget for one DE run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunBudget {
    pub max_generations: usize,
    pub popsize: usize,
}

/// Everything one DE run needs, self-contained.
pub(crate) struct RunSpec {
    pub evaluator: PenaltyEvaluator,
    pub budget: RunBudget,
    pub mutation_factor: Option<f64>,
    pub recombination: Option<f64>,
    pub seed: Option<u64>,
    pub x0: Option<Array1<f64>>,
    pub target_radius: Option<f64>,
    pub cancel: Option<Arc<AtomicBool>>,
    pub verbose: bool,
}

/// Outcome of one DE run. Never an error: the best vector observed is
/// always decoded, and `valid` reports whether it is feasible.
#[derive(Debug, Clone)]
pub(crate) struct RunOutcome {
    pub radius: f64,
    pub cost: f64,
    pub penalty: f64,
    pub valid: bool,
    pub poses: Vec<Pose>,
    pub generations: usize,
    pub cancelled: bool,
}

/// Run DE to completion for one angle regime.
///
/// The run stops early when the cooperative cancellation flag is set
/// (checked between generations) or when the best vector is feasible
/// and meets the target radius.
pub(crate) fn run_single(spec: RunSpec) -> Result<RunOutcome> {
    let evaluator = spec.evaluator;
    let (bounds, periodic) = evaluator.search_bounds();

    let cost_eval = evaluator.clone();
    let objective = move |x: &Array1<f64>| cost_eval.cost(x);

    let mut builder = DEConfigBuilder::new()
        .max_generations(spec.budget.max_generations)
        .popsize(spec.budget.popsize)
        .mutation(Mutation::Factor(spec.mutation_factor.unwrap_or(0.5)))
        .recombination(spec.recombination.unwrap_or(0.9))
        .disp(spec.verbose);
    if periodic.iter().any(|&p| p) {
        builder = builder.periodic(periodic);
    }
    if let Some(s) = spec.seed {
        builder = builder.seed(s);
    }
    if let Some(x0) = spec.x0 {
        builder = builder.x0(x0);
    }

    let was_cancelled = Rc::new(Cell::new(false));
    let cancel = spec.cancel.clone();
    let target = spec.target_radius;
    let cancelled_in_cb = was_cancelled.clone();
    builder = builder.callback(Box::new(move |info| {
        if let Some(flag) = &cancel {
            if flag.load(Ordering::Relaxed) {
                cancelled_in_cb.set(true);
                return CallbackAction::Stop;
            }
        }
        if let Some(t) = target {
            let r = info.x[0];
            // Feasible and inside the target circle: stop this run.
            if r <= t && info.fun - r < VALIDITY_TOL {
                return CallbackAction::Stop;
            }
        }
        CallbackAction::Continue
    }));

    let config = builder.build().map_err(|e| PackError::InvalidOptions {
        reason: e.to_string(),
    })?;

    let report = circlepack_de::differential_evolution(&objective, &bounds, config).map_err(
        |e| PackError::InvalidOptions {
            reason: e.to_string(),
        },
    )?;

    let penalty = evaluator.penalty(&report.x);
    Ok(RunOutcome {
        radius: report.x[0],
        cost: report.fun,
        penalty,
        valid: penalty < VALIDITY_TOL,
        poses: evaluator.poses(&report.x),
        generations: report.nit,
        cancelled: was_cancelled.get(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, RectSpec};

    fn budget() -> RunBudget {
        RunBudget {
            max_generations: 400,
            popsize: 10,
        }
    }

    #[test]
    fn test_single_rect_reaches_half_diagonal() {
        let inst = Instance::new(vec![RectSpec::new(6.0, 8.0)]);
        let spec = RunSpec {
            evaluator: PenaltyEvaluator::fixed(&inst, vec![0.0]),
            budget: budget(),
            mutation_factor: None,
            recombination: None,
            seed: Some(42),
            x0: None,
            target_radius: None,
            cancel: None,
            verbose: false,
        };
        let out = run_single(spec).unwrap();
        assert!(out.valid);
        // Optimum is the half diagonal (5.0) with the rect at the origin.
        assert!(out.radius < 5.2, "radius = {}", out.radius);
        assert!(out.radius >= 5.0 - 1e-6);
    }

    #[test]
    fn test_cancel_flag_stops_run() {
        let inst = Instance::new(vec![RectSpec::new(4.0, 4.0), RectSpec::new(4.0, 4.0)]);
        let cancel = Arc::new(AtomicBool::new(true));
        let spec = RunSpec {
            evaluator: PenaltyEvaluator::fixed(&inst, vec![0.0, 0.0]),
            budget: budget(),
            mutation_factor: None,
            recombination: None,
            seed: Some(1),
            x0: None,
            target_radius: None,
            cancel: Some(cancel),
            verbose: false,
        };
        let out = run_single(spec).unwrap();
        assert!(out.cancelled);
        assert_eq!(out.generations, 1);
    }

    #[test]
    fn test_target_radius_stops_early() {
        let inst = Instance::new(vec![RectSpec::new(2.0, 2.0)]);
        let spec = RunSpec {
            evaluator: PenaltyEvaluator::fixed(&inst, vec![0.0]),
            budget: RunBudget {
                max_generations: 2000,
                popsize: 10,
            },
            mutation_factor: None,
            recombination: None,
            seed: Some(9),
            x0: None,
            // Generous target: any feasible layout qualifies quickly.
            target_radius: Some(5.0),
            cancel: None,
            verbose: false,
        };
        let out = run_single(spec).unwrap();
        assert!(out.valid);
        assert!(out.generations < 2000);
        assert!(out.radius <= 5.0);
    }
}
