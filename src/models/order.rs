//! Order lines, orders, and the item instances they expand into.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ItemId;

/// Identifier of a customer order.
pub type OrderId = usize;

/// One line of a customer order: `quantity` units of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Order this line belongs to.
    pub order_id: OrderId,
    /// Ordered item.
    pub item_id: ItemId,
    /// Number of units.
    pub quantity: u32,
}

impl OrderLine {
    /// Creates an order line.
    pub fn new(order_id: OrderId, item_id: ItemId, quantity: u32) -> Self {
        Self {
            order_id,
            item_id,
            quantity,
        }
    }
}

/// A single physical unit to pick and palletize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Order the unit belongs to.
    pub order_id: OrderId,
    /// Catalog item of the unit.
    pub item_id: ItemId,
}

/// A customer order: the lines sharing one order ID.
///
/// # Examples
///
/// ```
/// use u_picking::models::{Order, OrderLine};
///
/// let lines = vec![
///     OrderLine::new(2, 10, 1),
///     OrderLine::new(1, 11, 2),
///     OrderLine::new(2, 12, 1),
/// ];
/// let orders = Order::group_lines(&lines);
/// assert_eq!(orders.len(), 2);
/// assert_eq!(orders[0].id(), 1);
/// assert_eq!(orders[0].num_units(), 2);
/// assert_eq!(orders[1].lines().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Creates an order with no lines.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            lines: Vec::new(),
        }
    }

    /// Adds a line for `quantity` units of `item_id`.
    pub fn with_line(mut self, item_id: ItemId, quantity: u32) -> Self {
        self.lines.push(OrderLine::new(self.id, item_id, quantity));
        self
    }

    /// Groups flat order lines into orders, sorted by order ID.
    ///
    /// Line order within an order is preserved.
    pub fn group_lines(lines: &[OrderLine]) -> Vec<Order> {
        let mut grouped: BTreeMap<OrderId, Order> = BTreeMap::new();
        for line in lines {
            grouped
                .entry(line.order_id)
                .or_insert_with(|| Order::new(line.order_id))
                .lines
                .push(*line);
        }
        grouped.into_values().collect()
    }

    /// Order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Lines of this order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    pub fn num_units(&self) -> usize {
        self.lines.iter().map(|l| l.quantity as usize).sum()
    }

    /// Expands the order into one instance per unit, in line order.
    pub fn instances(&self) -> Vec<ItemInstance> {
        self.lines
            .iter()
            .flat_map(|line| {
                (0..line.quantity).map(move |_| ItemInstance {
                    order_id: self.id,
                    item_id: line.item_id,
                })
            })
            .collect()
    }
}
