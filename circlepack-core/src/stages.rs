//! Staged solve: FIXED_0 -> DISCRETE_90 -> DISCRETE_45 -> FREE
//!
//! Cheaper stages run first. When the caller supplies a target radius
//! the cascade short-circuits as soon as a stage meets it; otherwise
//! every requested stage runs and the lowest valid radius wins. With no
//! feasible layout anywhere, the lowest-cost infeasible attempt is
//! returned with `valid = false`.

use crate::error::{PackError, Result};
use crate::instance::Instance;
use crate::options::SolveOptions;
use crate::penalty::PenaltyEvaluator;
use crate::result::Solution;
use crate::rotation::Stage;
use crate::runner::{RunBudget, RunOutcome, RunSpec, run_single};
use crate::sweep::sweep_permutations;

/// Slack applied when comparing a radius against the target, matching
/// the feasibility tolerance of the penalty evaluator.
const TARGET_SLACK: f64 = 1e-4;

/// Offset between per-stage seed streams, so a stage's single run and
/// the per-permutation worker seeds of later stages never collide.
const STAGE_SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

fn stage_budget(stage: Stage, options: &SolveOptions) -> RunBudget {
    // FIXED_0 gets the robust budget, permutation workers a light one.
    let (default_gens, default_pop) = match stage {
        Stage::Fixed0 => (2000, 20),
        Stage::Discrete90 | Stage::Discrete45 => (600, 10),
        Stage::Free => (1000, 15),
    };
    RunBudget {
        max_generations: options.max_generations.unwrap_or(default_gens),
        popsize: options.popsize.unwrap_or(default_pop),
    }
}

fn validate_options(options: &SolveOptions) -> Result<()> {
    if let Some(f) = options.mutation_factor {
        if !(0.3..=1.0).contains(&f) {
            return Err(PackError::InvalidOptions {
                reason: format!("mutation factor {} outside [0.3, 1.0]", f),
            });
        }
    }
    if let Some(cr) = options.recombination {
        if !(0.0..=1.0).contains(&cr) {
            return Err(PackError::InvalidOptions {
                reason: format!("crossover rate {} outside [0, 1]", cr),
            });
        }
    }
    if let Some(stages) = &options.stages {
        if stages.is_empty() {
            return Err(PackError::InvalidOptions {
                reason: "stage list is empty".into(),
            });
        }
    }
    Ok(())
}

/// Run one non-sweep stage (FIXED_0 or FREE) as a single DE run.
fn run_stage_single(
    instance: &Instance,
    stage: Stage,
    options: &SolveOptions,
    stage_seed: Option<u64>,
) -> Result<RunOutcome> {
    let evaluator = match stage {
        Stage::Free => PenaltyEvaluator::free(instance),
        _ => PenaltyEvaluator::fixed(instance, vec![0.0; instance.len()]),
    };
    let x0 = options
        .warm_start
        .as_ref()
        .map(|ws| evaluator.state_from_layout(ws.radius, &ws.poses));
    run_single(RunSpec {
        evaluator,
        budget: stage_budget(stage, options),
        mutation_factor: options.mutation_factor,
        recombination: options.recombination,
        seed: stage_seed,
        x0,
        target_radius: options.target_radius,
        cancel: None,
        verbose: options.verbose,
    })
}

/// Solve a packing instance.
///
/// See the crate documentation for the full contract. Only invalid
/// inputs produce an error; an infeasible search reports
/// `valid = false` on the returned [`Solution`].
pub fn solve(instance: &Instance, options: &SolveOptions) -> Result<Solution> {
    instance.validate()?;
    validate_options(options)?;

    let stages: Vec<Stage> = match &options.stages {
        Some(list) => list.clone(),
        None => options.mode.stages().to_vec(),
    };

    let mut permutations: u64 = 0;
    let mut best_valid: Option<(Stage, RunOutcome)> = None;
    let mut best_any: Option<(Stage, RunOutcome)> = None;

    for (k, &stage) in stages.iter().enumerate() {
        log::info!("running stage {}", stage);
        let stage_seed = options
            .seed
            .map(|s| s.wrapping_add((k as u64).wrapping_mul(STAGE_SEED_STRIDE)));

        let (stage_valid, stage_any, stage_perms) = match stage {
            Stage::Discrete90 | Stage::Discrete45 => {
                let budget = stage_budget(stage, options);
                let out = sweep_permutations(instance, stage, budget, options, stage_seed);
                (out.best_valid, out.best_any, out.total)
            }
            Stage::Fixed0 | Stage::Free => {
                let out = run_stage_single(instance, stage, options, stage_seed)?;
                let valid = out.valid.then(|| out.clone());
                (valid, Some(out), 1)
            }
        };
        permutations += stage_perms;

        match &stage_valid {
            Some(o) => log::info!(
                "stage {} done: radius={:.4}, valid=true ({} permutations)",
                stage,
                o.radius,
                stage_perms
            ),
            None => log::info!(
                "stage {} done: no feasible layout ({} permutations)",
                stage,
                stage_perms
            ),
        }

        if let Some(o) = stage_valid {
            let better = match &best_valid {
                None => true,
                Some((_, b)) => o.radius < b.radius,
            };
            if better {
                best_valid = Some((stage, o));
            }
        }
        if let Some(o) = stage_any {
            let better = match &best_any {
                None => true,
                Some((_, b)) => o.cost < b.cost,
            };
            if better {
                best_any = Some((stage, o));
            }
        }

        // Short-circuit only when the caller asked for a target radius.
        if let (Some(target), Some((best_stage, best))) = (options.target_radius, &best_valid) {
            if best.radius <= target + TARGET_SLACK {
                log::info!(
                    "target radius {:.4} met by stage {}; stopping cascade",
                    target,
                    best_stage
                );
                return Ok(to_solution(*best_stage, best.clone(), permutations));
            }
        }
    }

    match best_valid {
        Some((stage, outcome)) => Ok(to_solution(stage, outcome, permutations)),
        None => {
            let (stage, outcome) = best_any.ok_or_else(|| PackError::InvalidOptions {
                reason: "no stage produced a result".into(),
            })?;
            Ok(to_solution(stage, outcome, permutations))
        }
    }
}

fn to_solution(stage: Stage, outcome: RunOutcome, permutations: u64) -> Solution {
    Solution {
        radius: outcome.radius,
        valid: outcome.valid,
        poses: outcome.poses,
        stage,
        generations: outcome.generations,
        permutations,
    }
}
