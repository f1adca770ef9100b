//! Picker routes and their stops.

use serde::{Deserialize, Serialize};

use super::{ItemId, OrderId};

/// A single pick within a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Order the picked unit belongs to.
    pub order_id: OrderId,
    /// Picked item.
    pub item_id: ItemId,
    /// Storage location visited.
    pub location: usize,
    /// Weight of the picked unit.
    pub weight: f64,
}

/// One picker trip serving (part of) a pallet.
///
/// A route starts and ends at the depot; the depot is not stored in
/// `stops`. Use [`Route::path`] for the full location sequence.
///
/// # Examples
///
/// ```
/// use u_picking::models::{Route, Stop};
///
/// let stops = vec![
///     Stop { order_id: 1, item_id: 10, location: 3, weight: 1.0 },
///     Stop { order_id: 1, item_id: 11, location: 5, weight: 2.0 },
/// ];
/// let route = Route::new(0, 0, 0, stops, 12.0);
/// assert_eq!(route.path(), vec![0, 3, 5, 0]);
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.weight(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id: usize,
    pallet_id: usize,
    depot: usize,
    stops: Vec<Stop>,
    distance: f64,
}

impl Route {
    /// Creates a route with a precomputed distance.
    pub fn new(id: usize, pallet_id: usize, depot: usize, stops: Vec<Stop>, distance: f64) -> Self {
        Self {
            id,
            pallet_id,
            depot,
            stops,
            distance,
        }
    }

    /// Route ID.
    pub fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: usize) {
        self.id = id;
    }

    /// Pallet served by this route.
    pub fn pallet_id(&self) -> usize {
        self.pallet_id
    }

    pub(crate) fn set_pallet_id(&mut self, pallet_id: usize) {
        self.pallet_id = pallet_id;
    }

    /// Depot location.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Stops in visit order (depot excluded).
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub(crate) fn stops_mut(&mut self) -> &mut Vec<Stop> {
        &mut self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total distance including both depot legs.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub(crate) fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    /// Total weight picked on this route.
    pub fn weight(&self) -> f64 {
        self.stops.iter().map(|s| s.weight).sum()
    }

    /// Stop locations in visit order.
    pub fn locations(&self) -> Vec<usize> {
        self.stops.iter().map(|s| s.location).collect()
    }

    /// Full location sequence: depot, stops…, depot.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(self.depot);
        path.extend(self.stops.iter().map(|s| s.location));
        path.push(self.depot);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(location: usize) -> Stop {
        Stop {
            order_id: 1,
            item_id: location,
            location,
            weight: 1.0,
        }
    }

    #[test]
    fn test_route_empty() {
        let r = Route::new(0, 0, 0, vec![], 0.0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.path(), vec![0, 0]);
        assert_eq!(r.weight(), 0.0);
    }

    #[test]
    fn test_route_path_wraps_depot() {
        let r = Route::new(3, 1, 9, vec![stop(4), stop(2)], 7.5);
        assert_eq!(r.id(), 3);
        assert_eq!(r.pallet_id(), 1);
        assert_eq!(r.locations(), vec![4, 2]);
        assert_eq!(r.path(), vec![9, 4, 2, 9]);
        assert_eq!(r.distance(), 7.5);
    }
}
