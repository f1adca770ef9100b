//! Travel distances between warehouse locations.
//!
//! Provides a dense distance matrix and a builder for parallel-aisle
//! warehouse layouts.

mod layout;
mod matrix;

pub use layout::{AisleLayout, StorageSlot};
pub use matrix::DistanceMatrix;
