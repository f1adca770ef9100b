//! Annealing loop.

use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use u_metaheur::sa::CoolingSchedule;
use u_numflow::random::create_rng;

use super::moves::Neighborhood;
use super::{AnnealingConfig, MoveKind, Objective};
use crate::error::{PickingError, Result};
use crate::models::Solution;
use crate::pipeline::PickingProblem;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The temperature reached `min_temperature`.
    TemperatureFloor,
    /// `max_iterations` moves were made.
    IterationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// A whole level found no new best solution.
    StalledLevel,
}

/// One move of a traced run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub iteration: usize,
    pub level: usize,
    pub temperature: f64,
    /// `None` when every draw was unavailable or infeasible.
    pub move_kind: Option<MoveKind>,
    /// Objective of the candidate, if one was built.
    pub candidate: Option<f64>,
    pub accepted: bool,
    pub improved_best: bool,
}

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementResult {
    /// The best solution found.
    pub best: Solution,

    /// Objective of the best solution.
    pub best_objective: f64,

    /// Objective of the initial solution.
    pub initial_objective: f64,

    pub objective: Objective,

    pub seed: u64,

    /// Moves attempted, rejected draws excluded.
    pub iterations: usize,

    /// Temperature levels started.
    pub levels: usize,

    /// Accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Moves that lowered the current objective.
    pub improving_moves: usize,

    /// Draws that were unavailable or produced an infeasible packing.
    pub infeasible_moves: usize,

    pub final_temperature: f64,

    pub stop_reason: StopReason,

    pub runtime: Duration,

    /// Best objective at the end of each level.
    pub history: Vec<f64>,

    /// Per-move trace, empty unless `record_trace` is set.
    pub trace: Vec<TraceStep>,
}

/// Improves `initial` by simulated annealing.
///
/// The current solution is replaced only by accepted candidates and the best
/// solution only by strictly better ones, so the returned solution is never
/// worse than `initial`.
///
/// # Errors
///
/// [`PickingError::InvalidConfig`] if the configuration is invalid or
/// `initial` was built for a different number of pickers.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceMatrix;
/// use u_picking::improvement::{improve, AnnealingConfig, Objective};
/// use u_picking::models::{Item, ItemCatalog, Order, PalletSpec};
/// use u_picking::palletization::PackingConfig;
/// use u_picking::pipeline::PickingProblem;
///
/// let catalog = ItemCatalog::new(vec![
///     Item::new(1, 1.0, 1.0, 1),
///     Item::new(2, 1.0, 1.0, 2),
///     Item::new(3, 1.0, 1.0, 3),
/// ]).unwrap();
/// let orders = vec![
///     Order::new(1).with_line(1, 1).with_line(3, 1),
///     Order::new(2).with_line(2, 2),
/// ];
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (4.0, 1.0)]);
/// let problem = PickingProblem::new(catalog, orders, dm, 2)
///     .unwrap()
///     .with_packing(PackingConfig::default().with_pallet(PalletSpec::new(2.0, 2.0).unwrap()));
///
/// let initial = problem.greedy().unwrap();
/// let config = AnnealingConfig::new(42)
///     .with_objective(Objective::Makespan)
///     .with_max_iterations(200);
/// let result = improve(&problem, &initial, &config).unwrap();
/// assert!(result.best_objective <= result.initial_objective);
/// ```
pub fn improve(
    problem: &PickingProblem,
    initial: &Solution,
    config: &AnnealingConfig,
) -> Result<ImprovementResult> {
    config.validate().map_err(PickingError::InvalidConfig)?;
    if initial.num_pickers() != problem.num_pickers() {
        return Err(PickingError::InvalidConfig(format!(
            "initial solution has {} pickers, problem has {}",
            initial.num_pickers(),
            problem.num_pickers()
        )));
    }

    let started = Instant::now();
    let mut rng = create_rng(config.seed);
    let hood = Neighborhood::new(problem);
    let objective = config.objective;

    let initial_objective = objective.evaluate(initial);
    let mut current = initial.clone();
    let mut current_cost = initial_objective;
    let mut best = initial.clone();
    let mut best_cost = initial_objective;

    let mut temperature = config.initial_temperature;
    let mut iterations = 0usize;
    let mut levels = 0usize;
    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut infeasible_moves = 0usize;
    let mut history = Vec::new();
    let mut trace = Vec::new();
    let mut stop_reason = StopReason::TemperatureFloor;

    let linear_max_steps = compute_linear_steps(config, initial.num_pallets());
    let out_of_time = |now: Instant| config.time_limit.is_some_and(|limit| now - started >= limit);

    log::info!(
        "annealing ({}) from {:.3}, seed {}",
        objective.name(),
        initial_objective,
        config.seed
    );

    'levels: while temperature > config.min_temperature {
        if out_of_time(Instant::now()) {
            stop_reason = StopReason::TimeLimit;
            break;
        }

        let plateau = match config.cooling {
            CoolingSchedule::LundyMees { .. } => 1,
            _ => config
                .plateau
                .moves(config.iterations_per_temperature, current.num_pallets()),
        };
        let level_start_best = best_cost;
        let mut halted = None;

        for _ in 0..plateau {
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                halted = Some(StopReason::IterationLimit);
                break;
            }
            if out_of_time(Instant::now()) {
                halted = Some(StopReason::TimeLimit);
                break;
            }

            let mut drawn = None;
            for _ in 0..=config.max_redraws {
                let kind = config.move_weights.sample(&mut rng);
                match hood.apply(kind, &current, &mut rng)? {
                    Some(candidate) => {
                        drawn = Some((kind, candidate));
                        break;
                    }
                    None => infeasible_moves += 1,
                }
            }

            let mut step = TraceStep {
                iteration: iterations,
                level: levels,
                temperature,
                move_kind: None,
                candidate: None,
                accepted: false,
                improved_best: false,
            };
            iterations += 1;

            let Some((kind, candidate)) = drawn else {
                log::warn!(
                    "no feasible move after {} draws at iteration {}",
                    config.max_redraws + 1,
                    step.iteration
                );
                if config.record_trace {
                    trace.push(step);
                }
                continue;
            };

            let candidate_cost = objective.evaluate(&candidate);
            let delta = candidate_cost - current_cost;

            // Metropolis acceptance criterion
            let accept = if delta <= 0.0 {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                true
            } else if temperature > 0.0 {
                let probability = (-delta / temperature).exp();
                rng.random_range(0.0..1.0) < probability
            } else {
                false
            };

            step.move_kind = Some(kind);
            step.candidate = Some(candidate_cost);
            step.accepted = accept;

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                    step.improved_best = true;
                }
            }

            log::trace!(
                "iter {}: {:?} candidate {:.3} accepted {}",
                step.iteration,
                kind,
                candidate_cost,
                accept
            );
            if config.record_trace {
                trace.push(step);
            }
        }

        levels += 1;
        history.push(best_cost);
        log::debug!(
            "level {}: T = {:.4}, current {:.3}, best {:.3}",
            levels,
            temperature,
            current_cost,
            best_cost
        );

        if let Some(reason) = halted {
            stop_reason = reason;
            break 'levels;
        }
        if config.stop_on_stalled_level && best_cost >= level_start_best {
            stop_reason = StopReason::StalledLevel;
            break;
        }

        temperature = cool(temperature, config, levels - 1, linear_max_steps);
    }

    let runtime = started.elapsed();
    log::info!(
        "annealing done: best {:.3} after {} iterations ({:?}, {:?})",
        best_cost,
        iterations,
        stop_reason,
        runtime
    );

    Ok(ImprovementResult {
        best,
        best_objective: best_cost,
        initial_objective,
        objective,
        seed: config.seed,
        iterations,
        levels,
        accepted_moves,
        improving_moves,
        infeasible_moves,
        final_temperature: temperature,
        stop_reason,
        runtime,
        history,
        trace,
    })
}

/// Runs [`improve`] once per seed and keeps the best result.
///
/// Runs are independent; with the `parallel` feature they execute on the
/// rayon thread pool. Ties go to the earlier seed.
///
/// # Errors
///
/// [`PickingError::InvalidConfig`] if `seeds` is empty; otherwise the first
/// error of any run.
pub fn improve_multi_start(
    problem: &PickingProblem,
    initial: &Solution,
    config: &AnnealingConfig,
    seeds: &[u64],
) -> Result<ImprovementResult> {
    if seeds.is_empty() {
        return Err(PickingError::InvalidConfig(
            "multi-start needs at least one seed".into(),
        ));
    }

    let run = |&seed: &u64| improve(problem, initial, &config.with_seed(seed));
    #[cfg(feature = "parallel")]
    let results: Vec<Result<ImprovementResult>> = seeds.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<ImprovementResult>> = seeds.iter().map(run).collect();

    let mut best: Option<ImprovementResult> = None;
    for result in results {
        let result = result?;
        if best
            .as_ref()
            .map_or(true, |b| result.best_objective < b.best_objective)
        {
            best = Some(result);
        }
    }
    best.ok_or_else(|| PickingError::InvalidConfig("multi-start produced no result".into()))
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(temperature: f64, config: &AnnealingConfig, step: usize, linear_max_steps: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if step + 1 >= linear_max_steps {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

/// Number of temperature levels for linear cooling.
///
/// The iteration budget is spread over levels of the plateau length of the
/// initial solution. Moves never add pallets, so later levels are no longer.
fn compute_linear_steps(config: &AnnealingConfig, num_pallets: usize) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 {
                let plateau = config
                    .plateau
                    .moves(config.iterations_per_temperature, num_pallets);
                config.max_iterations / plateau
            } else {
                1000
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::improvement::{MoveWeights, PlateauLength};
    use crate::models::{Item, ItemCatalog, Order, PalletSpec};
    use crate::palletization::{GroupingPolicy, PackingConfig};

    /// Six single-unit orders spread over two aisles, three fit per pallet.
    fn problem(pickers: usize) -> PickingProblem {
        let items = (1..=6).map(|k| Item::new(k, 1.0, 1.0, k)).collect();
        let catalog = ItemCatalog::new(items).expect("valid");
        let orders = (1..=6).map(|k| Order::new(k).with_line(k, 1)).collect();
        let dm = DistanceMatrix::from_points(&[
            (0.0, 0.0),
            (1.0, 10.0),
            (9.0, 10.0),
            (1.0, 12.0),
            (9.0, 12.0),
            (1.0, 14.0),
            (9.0, 14.0),
        ]);
        let packing = PackingConfig::default()
            .with_pallet(PalletSpec::new(3.0, 1.0).expect("valid"))
            .with_grouping(GroupingPolicy::Cohesive);
        PickingProblem::new(catalog, orders, dm, pickers)
            .expect("valid")
            .with_packing(packing)
    }

    fn config(seed: u64) -> AnnealingConfig {
        AnnealingConfig::new(seed)
            .with_initial_temperature(10.0)
            .with_min_temperature(0.1)
            .with_cooling(CoolingSchedule::Geometric { alpha: 0.8 })
            .with_iterations_per_temperature(10)
            .with_plateau(PlateauLength::Fixed)
    }

    #[test]
    fn test_improves_distance() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let result = improve(&p, &initial, &config(7)).expect("runs");
        assert!(result.best_objective <= result.initial_objective);
        assert!((result.best.total_distance() - result.best_objective).abs() < 1e-9);
        assert_eq!(result.stop_reason, StopReason::TemperatureFloor);
        assert!(result.final_temperature <= 0.1);
        assert_eq!(result.history.len(), result.levels);
        assert_eq!(result.iterations, result.levels * 10);
    }

    #[test]
    fn test_history_non_increasing() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let result = improve(&p, &initial, &config(3).with_objective(Objective::Makespan)).expect("runs");
        for w in result.history.windows(2) {
            assert!(w[1] <= w[0]);
        }
        assert!(result.history.iter().all(|&h| h <= result.initial_objective));
    }

    #[test]
    fn test_reproducible() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let c = config(99).with_trace(true);
        let a = improve(&p, &initial, &c).expect("runs");
        let b = improve(&p, &initial, &c).expect("runs");
        assert_eq!(a.best, b.best);
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.trace.len(), a.iterations);
    }

    #[test]
    fn test_iteration_limit() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let result = improve(&p, &initial, &config(1).with_max_iterations(25)).expect("runs");
        assert_eq!(result.iterations, 25);
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
    }

    #[test]
    fn test_time_limit() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let c = config(1).with_time_limit(Duration::ZERO);
        let result = improve(&p, &initial, &c).expect("runs");
        assert_eq!(result.stop_reason, StopReason::TimeLimit);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best, initial);
    }

    #[test]
    fn test_stalled_level() {
        let p = problem(1);
        let initial = p.greedy().expect("solves");
        // With one picker and only route reassignment nothing ever changes.
        let c = config(5)
            .with_move_weights(MoveWeights::only(MoveKind::ReassignRoute))
            .with_stop_on_stalled_level(true)
            .with_max_redraws(0);
        let result = improve(&p, &initial, &c).expect("runs");
        assert_eq!(result.stop_reason, StopReason::StalledLevel);
        assert_eq!(result.levels, 1);
        assert_eq!(result.infeasible_moves, 10);
        assert_eq!(result.accepted_moves, 0);
    }

    #[test]
    fn test_invalid_inputs() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let bad = config(1).with_initial_temperature(0.0);
        assert!(matches!(improve(&p, &initial, &bad), Err(PickingError::InvalidConfig(_))));

        let other = problem(3);
        assert!(matches!(improve(&other, &initial, &config(1)), Err(PickingError::InvalidConfig(_))));
        assert!(matches!(
            improve_multi_start(&p, &initial, &config(1), &[]),
            Err(PickingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_multi_start_best_of() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let seeds = [11, 12, 13];
        let best = improve_multi_start(&p, &initial, &config(0), &seeds).expect("runs");
        for &seed in &seeds {
            let single = improve(&p, &initial, &config(seed)).expect("runs");
            assert!(best.best_objective <= single.best_objective);
        }
        assert!(seeds.contains(&best.seed));
    }

    #[test]
    fn test_linear_cooling_spans_budget_per_pallet() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        assert_eq!(initial.num_pallets(), 2);
        let linear = config(5)
            .with_cooling(CoolingSchedule::Linear)
            .with_plateau(PlateauLength::PerPallet)
            .with_max_iterations(200);
        let r = improve(&p, &initial, &linear).expect("runs");

        // Ten levels of 2 x 10 moves reach the floor exactly at the budget.
        assert_eq!(r.stop_reason, StopReason::TemperatureFloor);
        assert_eq!(r.final_temperature, 0.1);
        assert_eq!(r.levels, 10);
        assert_eq!(r.iterations, 200);
    }

    #[test]
    fn test_linear_and_lundy_mees() {
        let p = problem(2);
        let initial = p.greedy().expect("solves");
        let linear = config(2).with_cooling(CoolingSchedule::Linear).with_max_iterations(50);
        let r = improve(&p, &initial, &linear).expect("runs");
        assert!(r.iterations <= 50);

        let lm = config(2).with_cooling(CoolingSchedule::LundyMees { beta: 0.5 });
        let r = improve(&p, &initial, &lm).expect("runs");
        assert_eq!(r.iterations, r.levels);
    }
}
