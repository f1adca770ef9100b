//! Domain model types for warehouse wave picking.
//!
//! Provides catalog items and orders, pallets with their placements and
//! empty maximal spaces, picker routes, picker assignments, and the
//! solution that ties them together.

mod assignment;
mod ems;
mod item;
mod order;
mod pallet;
mod route;
mod solution;

pub use assignment::Assignment;
pub use ems::{EmsSet, Rect};
pub use item::{Item, ItemCatalog, ItemId};
pub use order::{ItemInstance, Order, OrderId, OrderLine};
pub use pallet::{Candidate, Pallet, PalletSpec, Placement};
pub use route::{Route, Stop};
pub use solution::Solution;

pub(crate) use ems::EPS;
