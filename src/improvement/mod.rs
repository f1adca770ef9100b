//! Simulated-annealing improvement of complete solutions.
//!
//! # Algorithm
//!
//! Starting from an initial solution `S = S*` at temperature `T0`, each
//! temperature level runs a plateau of moves. A move builds a neighbor `S'`
//! by swapping or relocating packing units between pallets, swapping stops
//! of one pallet's routes, or moving a route to another picker. Packing moves
//! repack and reroute only the touched pallets, then reassign all routes.
//!
//! `S'` replaces `S` when `Δ = f(S') − f(S) ≤ 0` or with probability
//! `exp(−Δ / T)`, and replaces `S*` when strictly better. The temperature is
//! lowered after each level with a [`CoolingSchedule`](u_metaheur::sa::CoolingSchedule).
//!
//! The random generator is seeded from the configuration, so equal inputs
//! and seeds reproduce the same run.
//!
//! # Reference
//!
//! Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//! Simulated Annealing", *Science* 220(4598), 671-680.

mod config;
mod moves;
mod objective;
mod runner;

pub use config::{AnnealingConfig, MoveKind, MoveWeights, PlateauLength};
pub use objective::Objective;
pub use runner::{improve, improve_multi_start, ImprovementResult, StopReason, TraceStep};
