//! # u-picking
//!
//! Warehouse wave-picking optimization: pallet loading, picker routing,
//! picker assignment, and simulated-annealing improvement of the combined
//! plan.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Item, Order, Pallet, Route, Assignment, Solution)
//! - [`distance`] — Distance matrix and parallel-aisle layout builder
//! - [`palletization`] — Bottom-left-fill packing with empty maximal spaces
//! - [`routing`] — Clarke-Wright savings routes per pallet
//! - [`assignment`] — LPT route-to-picker assignment and picker schedules
//! - [`pipeline`] — Problem definition and greedy construction
//! - [`improvement`] — Simulated annealing over distance or makespan
//!
//! ## Example
//!
//! ```
//! use u_picking::distance::{AisleLayout, StorageSlot};
//! use u_picking::improvement::{improve, AnnealingConfig};
//! use u_picking::models::{Item, ItemCatalog, Order, PalletSpec};
//! use u_picking::palletization::PackingConfig;
//! use u_picking::pipeline::PickingProblem;
//!
//! let slots = [StorageSlot::new(1, 3.0), StorageSlot::new(2, 8.0), StorageSlot::new(3, 1.0)];
//! let distances = AisleLayout::new(20.0).distance_matrix(&slots);
//! let catalog = ItemCatalog::new(vec![
//!     Item::new(10, 40.0, 30.0, 1),
//!     Item::new(11, 60.0, 50.0, 2),
//!     Item::new(12, 30.0, 30.0, 3),
//! ]).unwrap();
//! let orders = vec![
//!     Order::new(1).with_line(10, 2),
//!     Order::new(2).with_line(11, 1).with_line(12, 1),
//!     Order::new(3).with_line(12, 3),
//! ];
//!
//! let problem = PickingProblem::new(catalog, orders, distances, 2)
//!     .unwrap()
//!     .with_packing(PackingConfig::default().with_pallet(PalletSpec::new(100.0, 80.0).unwrap()));
//! let initial = problem.greedy().unwrap();
//! let result = improve(&problem, &initial, &AnnealingConfig::new(7).with_max_iterations(300)).unwrap();
//! assert!(result.best.total_distance() <= initial.total_distance());
//! ```

pub mod assignment;
pub mod distance;
pub mod error;
pub mod improvement;
pub mod models;
pub mod palletization;
pub mod pipeline;
pub mod routing;

pub use error::{PickingError, Result};
