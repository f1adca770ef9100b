//! Catalog items and the item catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::EPS;
use crate::error::{PickingError, Result};

/// Identifier of a catalog item.
pub type ItemId = usize;

/// A catalog entry: a product with a 2D footprint, a height, a weight, and
/// a storage location in the warehouse.
///
/// `location` indexes into the [`DistanceMatrix`](crate::distance::DistanceMatrix)
/// used for routing.
///
/// # Examples
///
/// ```
/// use u_picking::models::Item;
///
/// let item = Item::new(7, 40.0, 30.0, 3).with_weight(12.5).with_height(25.0);
/// assert_eq!(item.id(), 7);
/// assert_eq!(item.area(), 1200.0);
/// assert!(item.fits_within(30.0, 40.0, true));
/// assert!(!item.fits_within(30.0, 40.0, false));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    width: f64,
    depth: f64,
    height: f64,
    weight: f64,
    location: usize,
}

impl Item {
    /// Creates an item with the given footprint and storage location.
    ///
    /// Height and weight default to zero.
    pub fn new(id: ItemId, width: f64, depth: f64, location: usize) -> Self {
        Self {
            id,
            width,
            depth,
            height: 0.0,
            weight: 0.0,
            location,
        }
    }

    /// Sets the item height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the item weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Item ID.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Footprint extent along the pallet's x axis (unrotated).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Footprint extent along the pallet's y axis (unrotated).
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Item height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Item weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Storage location index.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Footprint area.
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Checks that the footprint is finite and positive, and that height
    /// and weight are finite and non-negative.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(format!("width must be finite and positive, got {}", self.width));
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(format!("depth must be finite and positive, got {}", self.depth));
        }
        if !(self.height.is_finite() && self.height >= 0.0) {
            return Err(format!("height must be finite and non-negative, got {}", self.height));
        }
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(format!("weight must be finite and non-negative, got {}", self.weight));
        }
        Ok(())
    }

    /// Footprint as `(width, depth)` in the requested orientation.
    pub fn footprint(&self, rotated: bool) -> (f64, f64) {
        if rotated {
            (self.depth, self.width)
        } else {
            (self.width, self.depth)
        }
    }

    /// Returns `true` if the footprint fits a `width × depth` rectangle,
    /// optionally after a 90° rotation.
    pub fn fits_within(&self, width: f64, depth: f64, allow_rotation: bool) -> bool {
        let fits = |(w, d): (f64, f64)| w <= width + EPS && d <= depth + EPS;
        fits(self.footprint(false)) || (allow_rotation && fits(self.footprint(true)))
    }
}

/// Immutable lookup table of items by ID.
///
/// # Examples
///
/// ```
/// use u_picking::models::{Item, ItemCatalog};
///
/// let catalog = ItemCatalog::new(vec![
///     Item::new(1, 10.0, 10.0, 1),
///     Item::new(2, 20.0, 10.0, 2),
/// ]).unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.get(2).unwrap().area(), 200.0);
/// assert!(catalog.get(3).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    /// Builds a catalog, rejecting duplicate item IDs and malformed items.
    ///
    /// # Errors
    ///
    /// - [`PickingError::InvalidItem`] if an item fails [`Item::validate`].
    /// - [`PickingError::DuplicateItem`] if two items share an ID.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            item.validate().map_err(|reason| PickingError::InvalidItem {
                item_id: item.id(),
                reason,
            })?;
            if index.insert(item.id(), pos).is_some() {
                return Err(PickingError::DuplicateItem(item.id()));
            }
        }
        Ok(Self { items, index })
    }

    /// Looks up an item by ID.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Checks that every item location indexes into a matrix of `size`
    /// locations.
    pub fn check_locations(&self, size: usize) -> Result<()> {
        match self.items.iter().find(|item| item.location() >= size) {
            Some(item) => Err(PickingError::LocationOutOfRange {
                item_id: item.id(),
                location: item.location(),
                size,
            }),
            None => Ok(()),
        }
    }
}
