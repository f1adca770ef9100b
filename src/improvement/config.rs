//! Annealing configuration.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use u_metaheur::sa::{CoolingSchedule, SaConfig};

use super::Objective;

/// Neighborhood moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Swap one packing unit between two pallets.
    SwapUnits,
    /// Move one packing unit to another pallet.
    RelocateUnit,
    /// Swap two stops within a route or between two routes of one pallet.
    SwapStops,
    /// Move one route to another picker.
    ReassignRoute,
}

/// Relative selection weights of the moves. Need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveWeights {
    pub swap_units: f64,
    pub relocate_unit: f64,
    pub swap_stops: f64,
    pub reassign_route: f64,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            swap_units: 0.4,
            relocate_unit: 0.3,
            swap_stops: 0.15,
            reassign_route: 0.15,
        }
    }
}

impl MoveWeights {
    /// Weights that only draw `kind`.
    pub fn only(kind: MoveKind) -> Self {
        let mut w = Self {
            swap_units: 0.0,
            relocate_unit: 0.0,
            swap_stops: 0.0,
            reassign_route: 0.0,
        };
        match kind {
            MoveKind::SwapUnits => w.swap_units = 1.0,
            MoveKind::RelocateUnit => w.relocate_unit = 1.0,
            MoveKind::SwapStops => w.swap_stops = 1.0,
            MoveKind::ReassignRoute => w.reassign_route = 1.0,
        }
        w
    }

    fn table(&self) -> [(MoveKind, f64); 4] {
        [
            (MoveKind::SwapUnits, self.swap_units),
            (MoveKind::RelocateUnit, self.relocate_unit),
            (MoveKind::SwapStops, self.swap_stops),
            (MoveKind::ReassignRoute, self.reassign_route),
        ]
    }

    fn total(&self) -> f64 {
        self.table().iter().map(|(_, w)| w).sum()
    }

    /// Draws a move kind proportionally to its weight.
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> MoveKind {
        let table = self.table();
        let mut r = rng.random_range(0.0..self.total());
        for (kind, w) in table {
            if r < w {
                return kind;
            }
            r -= w;
        }
        // rounding: fall back to the last drawable kind
        table
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map_or(MoveKind::SwapUnits, |(k, _)| *k)
    }

    fn validate(&self) -> Result<(), String> {
        if self.table().iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err("move weights must be finite and non-negative".into());
        }
        if self.total() <= 0.0 {
            return Err("at least one move weight must be positive".into());
        }
        Ok(())
    }
}

/// Number of moves per temperature level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlateauLength {
    /// `iterations_per_temperature` moves.
    Fixed,
    /// `iterations_per_temperature` moves per pallet of the current solution.
    #[default]
    PerPallet,
}

impl PlateauLength {
    pub(crate) fn moves(&self, per_temperature: usize, num_pallets: usize) -> usize {
        match self {
            PlateauLength::Fixed => per_temperature,
            PlateauLength::PerPallet => per_temperature * num_pallets.max(1),
        }
    }
}

/// Configuration for [`improve`](super::improve).
///
/// # Examples
///
/// ```
/// use u_metaheur::sa::CoolingSchedule;
/// use u_picking::improvement::{AnnealingConfig, Objective, PlateauLength};
///
/// let config = AnnealingConfig::new(42)
///     .with_objective(Objective::Makespan)
///     .with_initial_temperature(20.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_plateau(PlateauLength::Fixed)
///     .with_max_iterations(500);
/// assert!(config.validate().is_ok());
/// assert!(config.with_initial_temperature(-1.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AnnealingConfig {
    /// Starting temperature `T0`.
    pub initial_temperature: f64,

    /// The run stops once the temperature falls to this value.
    pub min_temperature: f64,

    /// Temperature update between levels.
    pub cooling: CoolingSchedule,

    /// Base plateau length `K`.
    pub iterations_per_temperature: usize,

    /// How `K` scales with the solution size.
    pub plateau: PlateauLength,

    /// Hard cap on moves (0 = no limit).
    pub max_iterations: usize,

    /// Wall-clock budget, checked between moves.
    pub time_limit: Option<Duration>,

    /// Stop after a level that found no new best solution.
    pub stop_on_stalled_level: bool,

    pub move_weights: MoveWeights,

    pub seed: u64,

    pub objective: Objective,

    /// Keep one [`TraceStep`](super::TraceStep) per move.
    pub record_trace: bool,

    /// Extra draws allowed when a move is unavailable or infeasible.
    pub max_redraws: usize,
}

impl AnnealingConfig {
    /// Creates a configuration with the given seed.
    ///
    /// Defaults: `T0 = 50`, `T_min = 0.01`, geometric cooling with
    /// `alpha = 0.99`, `K = 30` moves per pallet, distance objective.
    pub fn new(seed: u64) -> Self {
        Self {
            initial_temperature: 50.0,
            min_temperature: 0.01,
            cooling: CoolingSchedule::Geometric { alpha: 0.99 },
            iterations_per_temperature: 30,
            plateau: PlateauLength::PerPallet,
            max_iterations: 0,
            time_limit: None,
            stop_on_stalled_level: false,
            move_weights: MoveWeights::default(),
            seed,
            objective: Objective::RoutingDistance,
            record_trace: false,
            max_redraws: 20,
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_plateau(mut self, plateau: PlateauLength) -> Self {
        self.plateau = plateau;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_stop_on_stalled_level(mut self, stop: bool) -> Self {
        self.stop_on_stalled_level = stop;
        self
    }

    pub fn with_move_weights(mut self, weights: MoveWeights) -> Self {
        self.move_weights = weights;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    pub fn with_max_redraws(mut self, n: usize) -> Self {
        self.max_redraws = n;
        self
    }

    /// The schedule part of this configuration.
    pub fn schedule(&self) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(self.min_temperature)
            .with_cooling(self.cooling)
            .with_iterations_per_temperature(self.iterations_per_temperature)
            .with_max_iterations(self.max_iterations)
            .with_seed(self.seed)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.schedule().validate()?;
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be positive".into());
        }
        self.move_weights.validate()
    }
}
