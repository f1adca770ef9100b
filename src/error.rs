//! Error type shared by all engines.

use thiserror::Error;

use crate::models::{ItemId, OrderId};

/// Errors reported by the palletizer, router, assigner, and improver.
///
/// Only instance-level failures surface here. Locally recoverable events
/// (a skipped savings merge, an infeasible annealing move) never do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickingError {
    #[error("no orders to plan")]
    EmptyOrders,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("item {0} appears more than once in the catalog")]
    DuplicateItem(ItemId),

    #[error("item {item_id} is malformed: {reason}")]
    InvalidItem { item_id: ItemId, reason: String },

    #[error("order {order_id} references unknown item {item_id}")]
    UnknownItem { order_id: OrderId, item_id: ItemId },

    #[error("item {item_id} has location {location} outside a {size}-location distance matrix")]
    LocationOutOfRange {
        item_id: ItemId,
        location: usize,
        size: usize,
    },

    #[error("item {item_id} of order {order_id} does not fit an empty pallet")]
    InfeasibleItem { order_id: OrderId, item_id: ItemId },

    #[error("order {order_id} does not fit on a single pallet")]
    InfeasibleOrder { order_id: OrderId },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PickingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = PickingError::InfeasibleItem {
            order_id: 7,
            item_id: 3,
        };
        assert_eq!(e.to_string(), "item 3 of order 7 does not fit an empty pallet");

        let e = PickingError::InvalidConfig("num_pickers must be positive".into());
        assert!(e.to_string().contains("num_pickers"));
    }
}
