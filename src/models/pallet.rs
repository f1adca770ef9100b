//! Pallets, pallet specifications, and item placements.

use serde::{Deserialize, Serialize};

use super::ems::{EmsSet, Rect};
use super::{Item, ItemId, ItemInstance, OrderId, EPS};

/// Physical limits of a pallet.
///
/// # Examples
///
/// ```
/// use u_picking::models::PalletSpec;
///
/// let spec = PalletSpec::new(120.0, 100.0).unwrap().with_max_weight(500.0);
/// assert_eq!(spec.area(), 12_000.0);
/// assert_eq!(spec.max_weight(), 500.0);
/// assert!(PalletSpec::new(0.0, 100.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletSpec {
    width: f64,
    depth: f64,
    max_height: f64,
    max_weight: f64,
}

impl PalletSpec {
    /// Creates a pallet footprint with unbounded height and weight.
    ///
    /// Returns `None` unless both dimensions are positive and finite.
    pub fn new(width: f64, depth: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(depth) {
            return None;
        }
        Some(Self {
            width,
            depth,
            max_height: f64::INFINITY,
            max_weight: f64::INFINITY,
        })
    }

    /// Sets the maximum item height.
    pub fn with_max_height(mut self, max_height: f64) -> Self {
        self.max_height = max_height;
        self
    }

    /// Sets the maximum total load weight.
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Footprint width (x extent).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Footprint depth (y extent).
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Maximum item height.
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Maximum total weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Floor area.
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Returns `true` if `item` could go onto an empty pallet of this spec.
    pub fn admits(&self, item: &Item, allow_rotation: bool) -> bool {
        item.fits_within(self.width, self.depth, allow_rotation)
            && item.height() <= self.max_height + EPS
            && item.weight() <= self.max_weight + EPS
    }
}

impl Default for PalletSpec {
    /// A 120 × 100 pallet with unbounded height and weight.
    fn default() -> Self {
        Self {
            width: 120.0,
            depth: 100.0,
            max_height: f64::INFINITY,
            max_weight: f64::INFINITY,
        }
    }
}

/// One item instance placed on a pallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Order the unit belongs to.
    pub order_id: OrderId,
    /// Catalog item.
    pub item_id: ItemId,
    /// Storage location of the item (routing stop).
    pub location: usize,
    /// Bottom-left x.
    pub x: f64,
    /// Bottom-left y.
    pub y: f64,
    /// Occupied width (after rotation).
    pub width: f64,
    /// Occupied depth (after rotation).
    pub depth: f64,
    /// Whether the item was turned 90°.
    pub rotated: bool,
    /// Item height.
    pub height: f64,
    /// Item weight.
    pub weight: f64,
}

impl Placement {
    /// Occupied floor rectangle.
    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.depth)
    }

    /// The unit this placement holds.
    pub fn instance(&self) -> ItemInstance {
        ItemInstance {
            order_id: self.order_id,
            item_id: self.item_id,
        }
    }
}

/// A feasible position for an item: an EMS corner and an orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Bottom-left x.
    pub x: f64,
    /// Bottom-left y.
    pub y: f64,
    /// Whether the item is turned 90°.
    pub rotated: bool,
    /// Index of the hosting space in the pallet's [`EmsSet`].
    pub space: usize,
}

/// A pallet with its placements and remaining empty maximal spaces.
///
/// # Examples
///
/// ```
/// use u_picking::models::{Item, Pallet, PalletSpec};
///
/// let mut pallet = Pallet::new(0, PalletSpec::new(2.0, 2.0).unwrap(), 0.0);
/// let item = Item::new(1, 1.0, 1.0, 3);
/// let spot = pallet.spaces().spaces()[0];
/// assert!(spot.can_hold(1.0, 1.0));
/// pallet.place(9, &item, spot.x, spot.y, false);
/// assert_eq!(pallet.placements().len(), 1);
/// assert!(pallet.is_valid());
/// assert!((pallet.utilization() - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    id: usize,
    spec: PalletSpec,
    placements: Vec<Placement>,
    spaces: EmsSet,
    weight: f64,
}

impl Pallet {
    /// Creates an empty pallet.
    ///
    /// Spaces with an edge shorter than `min_ems_edge` are discarded as
    /// unusable.
    pub fn new(id: usize, spec: PalletSpec, min_ems_edge: f64) -> Self {
        Self {
            id,
            spec,
            placements: Vec::new(),
            spaces: EmsSet::new(spec.width(), spec.depth(), min_ems_edge),
            weight: 0.0,
        }
    }

    /// Pallet ID.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    /// Pallet specification.
    pub fn spec(&self) -> &PalletSpec {
        &self.spec
    }

    /// Placements in placement order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Remaining empty maximal spaces.
    pub fn spaces(&self) -> &EmsSet {
        &self.spaces
    }

    /// Total weight on the pallet.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns `true` if nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Occupied floor area.
    pub fn occupied_area(&self) -> f64 {
        self.placements.iter().map(|p| p.width * p.depth).sum()
    }

    /// Occupied fraction of the floor area.
    pub fn utilization(&self) -> f64 {
        self.occupied_area() / self.spec.area()
    }

    /// Distinct order IDs on the pallet, ascending.
    pub fn order_ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self.placements.iter().map(|p| p.order_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Item instances on the pallet, in placement order.
    pub fn instances(&self) -> Vec<ItemInstance> {
        self.placements.iter().map(Placement::instance).collect()
    }

    /// Returns `true` if the item respects the height limit and the
    /// remaining weight budget.
    pub fn can_carry(&self, item: &Item) -> bool {
        item.height() <= self.spec.max_height() + EPS
            && self.weight + item.weight() <= self.spec.max_weight() + EPS
    }

    /// Places `item` at `(x, y)` and updates the empty spaces.
    ///
    /// The caller is responsible for choosing a feasible position.
    pub fn place(&mut self, order_id: OrderId, item: &Item, x: f64, y: f64, rotated: bool) {
        let (width, depth) = item.footprint(rotated);
        let placement = Placement {
            order_id,
            item_id: item.id(),
            location: item.location(),
            x,
            y,
            width,
            depth,
            rotated,
            height: item.height(),
            weight: item.weight(),
        };
        debug_assert!(
            self.placements
                .iter()
                .all(|p| !p.footprint().overlaps(&placement.footprint())),
            "placement overlaps an existing item"
        );
        self.spaces.occupy(&placement.footprint());
        self.weight += placement.weight;
        self.placements.push(placement);
    }

    /// Checks the packing invariants: bounds, pairwise non-overlap, height
    /// and weight limits.
    pub fn is_valid(&self) -> bool {
        let bounds = Rect::new(0.0, 0.0, self.spec.width(), self.spec.depth());
        let in_bounds = self.placements.iter().all(|p| bounds.contains(&p.footprint()));
        let disjoint = self.placements.iter().enumerate().all(|(i, a)| {
            self.placements[i + 1..]
                .iter()
                .all(|b| !a.footprint().overlaps(&b.footprint()))
        });
        let height_ok = self
            .placements
            .iter()
            .all(|p| p.height <= self.spec.max_height() + EPS);
        in_bounds && disjoint && height_ok && self.weight <= self.spec.max_weight() + EPS
    }
}
