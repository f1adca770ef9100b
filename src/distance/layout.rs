//! Parallel-aisle warehouse layout.

use serde::{Deserialize, Serialize};

use super::DistanceMatrix;

/// A storage slot: aisle number (1-based) and position along the aisle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageSlot {
    /// Aisle number, starting at 1 next to the depot.
    pub aisle: u32,
    /// Position along the aisle, measured from the front cross aisle.
    pub position: f64,
}

impl StorageSlot {
    /// Creates a slot.
    pub fn new(aisle: u32, position: f64) -> Self {
        Self { aisle, position }
    }
}

/// Rectangular warehouse with parallel picking aisles connected by a front
/// and a back cross aisle. The depot sits at the front of aisle 1.
///
/// Travel between slots in the same aisle is the position difference.
/// Travel between aisles takes the shorter of the front and back cross
/// aisles plus `aisle_spacing` per aisle step.
///
/// # Examples
///
/// ```
/// use u_picking::distance::{AisleLayout, StorageSlot};
///
/// let layout = AisleLayout::new(30.0);
/// let dm = layout.distance_matrix(&[StorageSlot::new(1, 1.0), StorageSlot::new(2, 3.0)]);
/// assert_eq!(dm.size(), 3); // depot + 2 slots
/// assert!((dm.get(0, 1) - 2.0).abs() < 1e-10);
/// assert!((dm.get(1, 2) - 9.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AisleLayout {
    aisle_length: f64,
    aisle_spacing: f64,
    back_aisle_width: f64,
    depot_offset: f64,
}

impl AisleLayout {
    /// Creates a layout with aisles of the given length.
    ///
    /// Defaults: 5 units between adjacent aisles, a back cross aisle 2 units
    /// wide, and a 2-unit walk from the depot to the front of aisle 1.
    pub fn new(aisle_length: f64) -> Self {
        Self {
            aisle_length,
            aisle_spacing: 5.0,
            back_aisle_width: 2.0,
            depot_offset: 2.0,
        }
    }

    /// Sets the travel distance between adjacent aisles.
    pub fn with_aisle_spacing(mut self, spacing: f64) -> Self {
        self.aisle_spacing = spacing;
        self
    }

    /// Sets the width of the back cross aisle.
    pub fn with_back_aisle_width(mut self, width: f64) -> Self {
        self.back_aisle_width = width;
        self
    }

    /// Sets the fixed walk from the depot to the front of aisle 1.
    pub fn with_depot_offset(mut self, offset: f64) -> Self {
        self.depot_offset = offset;
        self
    }

    /// Aisle length.
    pub fn aisle_length(&self) -> f64 {
        self.aisle_length
    }

    /// Travel distance between two slots.
    pub fn slot_distance(&self, a: &StorageSlot, b: &StorageSlot) -> f64 {
        if a.aisle == b.aisle {
            return (a.position - b.position).abs();
        }
        let front = a.position + b.position;
        let back = 2.0 * self.aisle_length - a.position - b.position + self.back_aisle_width;
        let lateral = self.aisle_spacing * (a.aisle as f64 - b.aisle as f64).abs();
        front.min(back) + lateral
    }

    /// Travel distance from the depot to a slot.
    pub fn depot_distance(&self, slot: &StorageSlot) -> f64 {
        self.depot_offset
            + self.aisle_spacing * (slot.aisle.saturating_sub(1)) as f64
            + (slot.position - 1.0).abs()
    }

    /// Builds the location matrix: index 0 is the depot, slot `k` is
    /// location `k + 1`.
    pub fn distance_matrix(&self, slots: &[StorageSlot]) -> DistanceMatrix {
        let n = slots.len() + 1;
        let mut dm = DistanceMatrix::new(n);
        for (k, slot) in slots.iter().enumerate() {
            let d = self.depot_distance(slot);
            dm.set(0, k + 1, d);
            dm.set(k + 1, 0, d);
        }
        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                let d = self.slot_distance(&slots[i], &slots[j]);
                dm.set(i + 1, j + 1, d);
                dm.set(j + 1, i + 1, d);
            }
        }
        dm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<StorageSlot> {
        vec![
            StorageSlot::new(1, 1.0),
            StorageSlot::new(1, 5.0),
            StorageSlot::new(2, 3.0),
        ]
    }

    #[test]
    fn test_depot_distances() {
        let dm = AisleLayout::new(30.0).distance_matrix(&slots());
        assert!((dm.get(0, 1) - 2.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 6.0).abs() < 1e-10);
        assert!((dm.get(0, 3) - 9.0).abs() < 1e-10);
    }

    #[test]
    fn test_same_aisle() {
        let dm = AisleLayout::new(30.0).distance_matrix(&slots());
        assert!((dm.get(1, 2) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_cross_aisle_front() {
        let dm = AisleLayout::new(30.0).distance_matrix(&slots());
        // front: 1 + 3 = 4, back: 60 - 4 + 2 = 58, lateral 5
        assert!((dm.get(1, 3) - 9.0).abs() < 1e-10);
        assert!((dm.get(2, 3) - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_cross_aisle_back() {
        let layout = AisleLayout::new(10.0);
        let a = StorageSlot::new(1, 9.0);
        let b = StorageSlot::new(3, 8.0);
        // front: 17, back: 20 - 17 + 2 = 5, lateral 10
        assert!((layout.slot_distance(&a, &b) - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_layout_symmetric() {
        let dm = AisleLayout::new(30.0)
            .with_aisle_spacing(4.0)
            .distance_matrix(&slots());
        assert!(dm.is_symmetric(1e-12));
    }
}
