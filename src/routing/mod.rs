//! Picker route construction.
//!
//! Each pallet's picks are sequenced independently with the Clarke-Wright
//! savings heuristic. A pallet is served by one or more trips, depending on
//! the trip capacity.

mod savings;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::{Pallet, Route, Stop};

/// Per-trip limits. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TripCapacity {
    pub max_stops: Option<usize>,
    pub max_weight: Option<f64>,
}

impl TripCapacity {
    /// Limits the number of picks per trip.
    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = Some(max_stops);
        self
    }

    /// Limits the picked weight per trip.
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = Some(max_weight);
        self
    }

    /// Returns `true` if a trip with `stops` picks weighing `weight` is
    /// allowed.
    pub fn admits(&self, stops: usize, weight: f64) -> bool {
        self.max_stops.map_or(true, |m| stops <= m)
            && self.max_weight.map_or(true, |m| weight <= m + 1e-9)
    }
}

/// Router settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub capacity: TripCapacity,
    /// Concatenate the savings fragments of a pallet while capacity allows.
    pub chain_fragments: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            capacity: TripCapacity::default(),
            chain_fragments: true,
        }
    }
}

impl RouterConfig {
    /// Sets the trip capacity.
    pub fn with_capacity(mut self, capacity: TripCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enables or disables fragment chaining.
    pub fn with_chain_fragments(mut self, chain: bool) -> Self {
        self.chain_fragments = chain;
        self
    }

    /// Validates the trip limits.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity.max_stops == Some(0) {
            return Err("max_stops must be at least 1".into());
        }
        if let Some(w) = self.capacity.max_weight {
            if w.is_nan() || w < 0.0 {
                return Err("max_weight must be non-negative".into());
            }
        }
        Ok(())
    }
}

/// Builds picker routes for pallets over a distance matrix.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceMatrix;
/// use u_picking::models::{Item, Pallet, PalletSpec};
/// use u_picking::routing::Router;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
/// let mut pallet = Pallet::new(0, PalletSpec::default(), 0.0);
/// for (k, x) in [(1, 0.0), (2, 10.0), (3, 20.0)] {
///     pallet.place(1, &Item::new(k, 10.0, 10.0, k), x, 0.0, false);
/// }
///
/// let routes = Router::new(&dm, 0).build_routes(&[pallet]);
/// assert_eq!(routes.len(), 1);
/// assert!((routes[0].distance() - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    distances: &'a DistanceMatrix,
    depot: usize,
    config: RouterConfig,
}

impl<'a> Router<'a> {
    /// Creates a router with unbounded trips starting at `depot`.
    pub fn new(distances: &'a DistanceMatrix, depot: usize) -> Self {
        Self {
            distances,
            depot,
            config: RouterConfig::default(),
        }
    }

    /// Sets the router configuration.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Routes every pallet. Route IDs are assigned sequentially in pallet
    /// order.
    pub fn build_routes(&self, pallets: &[Pallet]) -> Vec<Route> {
        let mut routes = Vec::new();
        for pallet in pallets {
            let next_id = routes.len();
            routes.extend(self.route_pallet(pallet, next_id));
        }
        routes
    }

    /// Routes one pallet, numbering its trips from `first_id`.
    ///
    /// Stops are the pallet's placements in placement order.
    pub fn route_pallet(&self, pallet: &Pallet, first_id: usize) -> Vec<Route> {
        let stops: Vec<Stop> = pallet
            .placements()
            .iter()
            .map(|p| Stop {
                order_id: p.order_id,
                item_id: p.item_id,
                location: p.location,
                weight: p.weight,
            })
            .collect();

        let capacity = &self.config.capacity;
        let merged = savings::merge_trips(&stops, self.distances, self.depot, capacity);
        let trips = if self.config.chain_fragments {
            savings::chain(merged.trips, &stops, capacity)
        } else {
            merged.trips
        };
        log::trace!(
            "pallet {}: {} stops, {} merges, {} trips",
            pallet.id(),
            stops.len(),
            merged.merges,
            trips.len()
        );

        trips
            .into_iter()
            .enumerate()
            .map(|(k, trip)| {
                let trip_stops = trip.iter().map(|&s| stops[s]).collect();
                self.make_route(first_id + k, pallet.id(), trip_stops)
            })
            .collect()
    }

    /// Assembles a route and computes its distance.
    pub fn make_route(&self, id: usize, pallet_id: usize, stops: Vec<Stop>) -> Route {
        let mut route = Route::new(id, pallet_id, self.depot, stops, 0.0);
        route.set_distance(route_distance(&route, self.distances));
        route
    }
}

/// Routes `pallets` with an unbounded-capacity [`Router`].
pub fn build_routes(pallets: &[Pallet], distances: &DistanceMatrix, depot: usize) -> Vec<Route> {
    Router::new(distances, depot).build_routes(pallets)
}

/// Length of `depot → stops… → depot`. An empty route has length zero.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceMatrix;
/// use u_picking::models::{Route, Stop};
/// use u_picking::routing::route_distance;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0)]);
/// let stop = Stop { order_id: 1, item_id: 1, location: 1, weight: 0.0 };
/// let route = Route::new(0, 0, 0, vec![stop], 0.0);
/// assert!((route_distance(&route, &dm) - 10.0).abs() < 1e-10);
/// ```
pub fn route_distance(route: &Route, distances: &DistanceMatrix) -> f64 {
    distances.tour_length(route.depot(), &route.locations())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, PalletSpec};

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 2.0, 8.0],
            vec![5.0, 2.0, 0.0, 8.0],
            vec![5.0, 8.0, 8.0, 0.0],
        ])
        .expect("square")
    }

    fn pallet(id: usize, locations: &[usize]) -> Pallet {
        let mut p = Pallet::new(id, PalletSpec::default(), 0.0);
        for (k, &loc) in locations.iter().enumerate() {
            p.place(1, &Item::new(loc, 10.0, 10.0, loc), 10.0 * k as f64, 0.0, false);
        }
        p
    }

    #[test]
    fn test_capacity_splits_three_stops() {
        let dm = triangle();
        let config = RouterConfig::default().with_capacity(TripCapacity::default().with_max_stops(2));
        let routes = Router::new(&dm, 0)
            .with_config(config)
            .build_routes(&[pallet(0, &[1, 2, 3])]);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].locations(), vec![1, 2]);
        assert_eq!(routes[1].locations(), vec![3]);
        assert!((routes[0].distance() - 12.0).abs() < 1e-10);
        assert!((routes[1].distance() - 10.0).abs() < 1e-10);
        assert_eq!((routes[0].id(), routes[1].id()), (0, 1));
    }

    #[test]
    fn test_unbounded_one_trip_per_pallet() {
        let dm = triangle();
        let routes = build_routes(&[pallet(0, &[1, 2]), pallet(1, &[3])], &dm, 0);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].pallet_id(), 0);
        assert_eq!(routes[1].pallet_id(), 1);
        assert_eq!(routes[1].id(), 1);
    }

    #[test]
    fn test_fragments_kept_without_chaining() {
        let dm = triangle();
        let config = RouterConfig::default()
            .with_capacity(TripCapacity::default().with_max_stops(1))
            .with_chain_fragments(false);
        let routes = Router::new(&dm, 0)
            .with_config(config)
            .build_routes(&[pallet(0, &[1, 2, 3])]);
        assert_eq!(routes.len(), 3);
    }

    #[test]
    fn test_every_stop_visited_once() {
        let dm = triangle();
        let routes = build_routes(&[pallet(0, &[3, 1, 2])], &dm, 0);
        let mut locs: Vec<usize> = routes.iter().flat_map(|r| r.locations()).collect();
        locs.sort_unstable();
        assert_eq!(locs, vec![1, 2, 3]);
        let path = routes[0].path();
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&0));
    }

    #[test]
    fn test_route_distance_reversal() {
        let dm = triangle();
        let routes = build_routes(&[pallet(0, &[1, 2, 3])], &dm, 0);
        let mut reversed = routes[0].clone();
        reversed.stops_mut().reverse();
        assert!((route_distance(&reversed, &dm) - routes[0].distance()).abs() < 1e-10);
    }

    #[test]
    fn test_empty_pallet_has_no_routes() {
        let dm = triangle();
        assert!(build_routes(&[Pallet::new(0, PalletSpec::default(), 0.0)], &dm, 0).is_empty());
    }

    #[test]
    fn test_config_validate() {
        assert!(RouterConfig::default().validate().is_ok());
        let bad = RouterConfig::default().with_capacity(TripCapacity::default().with_max_stops(0));
        assert!(bad.validate().is_err());
    }
}
