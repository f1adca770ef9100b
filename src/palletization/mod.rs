//! Bottom-left-fill palletization with empty maximal space bookkeeping.
//!
//! # Algorithm
//!
//! Orders are processed in descending footprint area, and the units of an
//! order in descending item area. Each unit goes to the best feasible
//! `(pallet, space, orientation)` candidate over all open pallets, scored by
//! the configured [`PlacementRule`], ties to the lower pallet index. When no
//! open pallet can take it, a new pallet is opened and the unit is placed at
//! its origin.
//!
//! Under [`GroupingPolicy::Cohesive`] a whole order is trial-packed on a copy
//! of each open pallet and committed to the first one that takes it.
//!
//! The procedure is greedy and never backtracks, so the pallet count is not
//! guaranteed minimal.

mod config;
mod placement;

pub use config::{GroupingPolicy, PackingConfig, PlacementRule};

use crate::error::{PickingError, Result};
use crate::models::{Candidate, Item, ItemCatalog, ItemInstance, Order, OrderId, Pallet};

use placement::{find_candidate, rank};

/// Packs orders onto pallets.
///
/// # Examples
///
/// ```
/// use u_picking::models::{Item, ItemCatalog, Order, PalletSpec};
/// use u_picking::palletization::{PackingConfig, Palletizer};
///
/// let catalog = ItemCatalog::new(vec![Item::new(1, 1.0, 1.0, 1)]).unwrap();
/// let config = PackingConfig::default().with_pallet(PalletSpec::new(2.0, 2.0).unwrap());
/// let orders = vec![Order::new(1).with_line(1, 4)];
///
/// let pallets = Palletizer::new(&catalog, config).pack(&orders).unwrap();
/// assert_eq!(pallets.len(), 1);
/// assert_eq!(pallets[0].placements().len(), 4);
/// assert!(pallets[0].spaces().is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Palletizer<'a> {
    catalog: &'a ItemCatalog,
    config: PackingConfig,
}

impl<'a> Palletizer<'a> {
    /// Creates a palletizer over `catalog`.
    pub fn new(catalog: &'a ItemCatalog, config: PackingConfig) -> Self {
        Self { catalog, config }
    }

    /// Packing configuration.
    pub fn config(&self) -> &PackingConfig {
        &self.config
    }

    /// Packs `orders`, returning pallets with IDs `0..n`.
    ///
    /// # Errors
    ///
    /// - [`PickingError::EmptyOrders`] if `orders` is empty.
    /// - [`PickingError::UnknownItem`] if a line references an unknown item.
    /// - [`PickingError::InfeasibleItem`] if a unit does not fit an empty
    ///   pallet in any allowed orientation, or exceeds its height or weight
    ///   limit.
    /// - [`PickingError::InfeasibleOrder`] if a cohesive order does not fit
    ///   on one pallet.
    pub fn pack(&self, orders: &[Order]) -> Result<Vec<Pallet>> {
        if orders.is_empty() {
            return Err(PickingError::EmptyOrders);
        }
        let batches = self.prepare(orders)?;

        let mut pallets: Vec<Pallet> = Vec::new();
        for (order_id, items) in &batches {
            match self.config.grouping() {
                GroupingPolicy::Cohesive => {
                    if !self.place_whole(&mut pallets, *order_id, items) {
                        return Err(PickingError::InfeasibleOrder {
                            order_id: *order_id,
                        });
                    }
                }
                GroupingPolicy::Preferred => {
                    if !self.place_whole(&mut pallets, *order_id, items) {
                        log::debug!("order {order_id} split across pallets");
                        self.place_each(&mut pallets, *order_id, items)?;
                    }
                }
                GroupingPolicy::Independent => {
                    self.place_each(&mut pallets, *order_id, items)?;
                }
            }
        }

        log::debug!(
            "packed {} orders onto {} pallets",
            batches.len(),
            pallets.len()
        );
        Ok(pallets)
    }

    /// Packs `units` onto one fresh pallet with the given ID.
    ///
    /// Returns `Ok(None)` if they do not all fit.
    ///
    /// # Errors
    ///
    /// [`PickingError::UnknownItem`] if a unit references an unknown item.
    pub fn repack(&self, pallet_id: usize, units: &[ItemInstance]) -> Result<Option<Pallet>> {
        let mut items = Vec::with_capacity(units.len());
        for unit in units {
            let item = self.lookup(unit.order_id, unit.item_id)?;
            items.push((unit.order_id, item));
        }
        items.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()));

        let mut pallet = self.fresh_pallet(pallet_id);
        for (order_id, item) in items {
            if !self.place_on(&mut pallet, order_id, item) {
                return Ok(None);
            }
        }
        Ok(Some(pallet))
    }

    /// Resolves every order's units against the catalog and sorts orders
    /// and units by descending area.
    fn prepare(&self, orders: &[Order]) -> Result<Vec<(OrderId, Vec<&'a Item>)>> {
        let mut batches = Vec::with_capacity(orders.len());
        for order in orders {
            let mut items = Vec::with_capacity(order.num_units());
            for unit in order.instances() {
                let item = self.lookup(unit.order_id, unit.item_id)?;
                if !self
                    .config
                    .pallet()
                    .admits(item, self.config.allow_rotation())
                {
                    return Err(PickingError::InfeasibleItem {
                        order_id: unit.order_id,
                        item_id: unit.item_id,
                    });
                }
                items.push(item);
            }
            if items.is_empty() {
                continue;
            }
            items.sort_by(|a, b| b.area().total_cmp(&a.area()));
            batches.push((order.id(), items));
        }

        let area = |items: &[&Item]| items.iter().map(|i| i.area()).sum::<f64>();
        batches.sort_by(|a, b| area(&b.1).total_cmp(&area(&a.1)));
        Ok(batches)
    }

    fn lookup(&self, order_id: OrderId, item_id: usize) -> Result<&'a Item> {
        self.catalog
            .get(item_id)
            .ok_or(PickingError::UnknownItem { order_id, item_id })
    }

    fn fresh_pallet(&self, id: usize) -> Pallet {
        Pallet::new(id, *self.config.pallet(), self.config.min_ems_edge())
    }

    fn place_on(&self, pallet: &mut Pallet, order_id: OrderId, item: &Item) -> bool {
        match find_candidate(
            pallet,
            item,
            self.config.placement_rule(),
            self.config.allow_rotation(),
        ) {
            Some(c) => {
                pallet.place(order_id, item, c.x, c.y, c.rotated);
                true
            }
            None => false,
        }
    }

    fn place_all(&self, pallet: &mut Pallet, order_id: OrderId, items: &[&Item]) -> bool {
        items.iter().all(|item| self.place_on(pallet, order_id, item))
    }

    /// Places a whole order on the first open pallet that takes it, else on
    /// a new pallet. Returns `false` if not even an empty pallet does.
    fn place_whole(&self, pallets: &mut Vec<Pallet>, order_id: OrderId, items: &[&Item]) -> bool {
        for pallet in pallets.iter_mut() {
            let mut trial = pallet.clone();
            if self.place_all(&mut trial, order_id, items) {
                *pallet = trial;
                return true;
            }
        }
        let mut fresh = self.fresh_pallet(pallets.len());
        if self.place_all(&mut fresh, order_id, items) {
            pallets.push(fresh);
            return true;
        }
        false
    }

    /// Places units one at a time at the best candidate over all open
    /// pallets. Ties go to the lower pallet index.
    fn place_each(&self, pallets: &mut Vec<Pallet>, order_id: OrderId, items: &[&Item]) -> Result<()> {
        let rule = self.config.placement_rule();
        for item in items {
            let mut best: Option<(usize, Candidate, (f64, f64))> = None;
            for (index, pallet) in pallets.iter().enumerate() {
                let Some(c) = find_candidate(pallet, item, rule, self.config.allow_rotation()) else {
                    continue;
                };
                let key = rank(pallet, item, &c, rule);
                if best.as_ref().map_or(true, |(_, _, inc)| key < *inc) {
                    best = Some((index, c, key));
                }
            }
            if let Some((index, c, _)) = best {
                pallets[index].place(order_id, item, c.x, c.y, c.rotated);
                continue;
            }
            let mut fresh = self.fresh_pallet(pallets.len());
            if !self.place_on(&mut fresh, order_id, item) {
                return Err(PickingError::InfeasibleItem {
                    order_id,
                    item_id: item.id(),
                });
            }
            pallets.push(fresh);
        }
        Ok(())
    }
}

/// Packs `orders` with a one-off [`Palletizer`].
pub fn pack(orders: &[Order], catalog: &ItemCatalog, config: PackingConfig) -> Result<Vec<Pallet>> {
    Palletizer::new(catalog, config).pack(orders)
}
