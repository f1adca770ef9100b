//! Greedy construction: palletize, route, assign.

use crate::assignment;
use crate::distance::DistanceMatrix;
use crate::error::{PickingError, Result};
use crate::models::{ItemCatalog, Order, Pallet, Route, Solution};
use crate::palletization::{PackingConfig, Palletizer};
use crate::routing::{Router, RouterConfig};

/// A validated wave-picking instance.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceMatrix;
/// use u_picking::models::{Item, ItemCatalog, Order, PalletSpec};
/// use u_picking::palletization::PackingConfig;
/// use u_picking::pipeline::PickingProblem;
///
/// let catalog = ItemCatalog::new(vec![
///     Item::new(1, 1.0, 1.0, 1),
///     Item::new(2, 1.0, 1.0, 2),
/// ]).unwrap();
/// let orders = vec![Order::new(1).with_line(1, 2), Order::new(2).with_line(2, 2)];
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (0.0, 3.0), (4.0, 0.0)]);
///
/// let problem = PickingProblem::new(catalog, orders, dm, 2)
///     .unwrap()
///     .with_packing(PackingConfig::default().with_pallet(PalletSpec::new(2.0, 1.0).unwrap()));
/// let solution = problem.greedy().unwrap();
/// assert_eq!(solution.num_pallets(), 2);
/// assert_eq!(solution.routes().len(), 2);
/// assert!((solution.makespan() - 8.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct PickingProblem {
    catalog: ItemCatalog,
    orders: Vec<Order>,
    distances: DistanceMatrix,
    depot: usize,
    packing: PackingConfig,
    router: RouterConfig,
    num_pickers: usize,
}

impl PickingProblem {
    /// Creates a problem with the depot at location 0 and default packing
    /// and routing settings.
    ///
    /// # Errors
    ///
    /// - [`PickingError::EmptyOrders`] if `orders` is empty.
    /// - [`PickingError::InvalidConfig`] if `num_pickers` is zero or the
    ///   matrix is empty.
    /// - [`PickingError::UnknownItem`] if an order references an unknown item.
    /// - [`PickingError::LocationOutOfRange`] if an item location is outside
    ///   the matrix.
    pub fn new(
        catalog: ItemCatalog,
        orders: Vec<Order>,
        distances: DistanceMatrix,
        num_pickers: usize,
    ) -> Result<Self> {
        if orders.is_empty() {
            return Err(PickingError::EmptyOrders);
        }
        if num_pickers == 0 {
            return Err(PickingError::InvalidConfig(
                "num_pickers must be positive".into(),
            ));
        }
        if distances.size() == 0 {
            return Err(PickingError::InvalidConfig(
                "distance matrix is empty".into(),
            ));
        }
        catalog.check_locations(distances.size())?;
        for order in &orders {
            for line in order.lines() {
                if catalog.get(line.item_id).is_none() {
                    return Err(PickingError::UnknownItem {
                        order_id: order.id(),
                        item_id: line.item_id,
                    });
                }
            }
        }

        Ok(Self {
            catalog,
            orders,
            distances,
            depot: 0,
            packing: PackingConfig::default(),
            router: RouterConfig::default(),
            num_pickers,
        })
    }

    /// Sets the depot location.
    ///
    /// # Errors
    ///
    /// [`PickingError::InvalidConfig`] if the depot is outside the matrix.
    pub fn with_depot(mut self, depot: usize) -> Result<Self> {
        if depot >= self.distances.size() {
            return Err(PickingError::InvalidConfig(format!(
                "depot {depot} outside a {}-location matrix",
                self.distances.size()
            )));
        }
        self.depot = depot;
        Ok(self)
    }

    /// Sets the packing configuration.
    pub fn with_packing(mut self, packing: PackingConfig) -> Self {
        self.packing = packing;
        self
    }

    /// Sets the router configuration.
    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn depot(&self) -> usize {
        self.depot
    }

    pub fn packing(&self) -> &PackingConfig {
        &self.packing
    }

    pub fn router_config(&self) -> &RouterConfig {
        &self.router
    }

    pub fn num_pickers(&self) -> usize {
        self.num_pickers
    }

    /// Palletizer bound to this problem's catalog and packing settings.
    pub fn palletizer(&self) -> Palletizer<'_> {
        Palletizer::new(&self.catalog, self.packing)
    }

    /// Router bound to this problem's matrix, depot and trip settings.
    pub fn router(&self) -> Router<'_> {
        Router::new(&self.distances, self.depot).with_config(self.router)
    }

    /// Routes pallets and assigns the routes, producing a solution.
    pub fn evaluate(&self, pallets: Vec<Pallet>) -> Result<Solution> {
        let routes = self.router().build_routes(&pallets);
        self.assign(pallets, routes)
    }

    /// Assigns existing routes with LPT, producing a solution.
    pub fn assign(&self, pallets: Vec<Pallet>, routes: Vec<Route>) -> Result<Solution> {
        let assignment = assignment::assign(&routes, self.num_pickers)?;
        Ok(Solution::new(pallets, routes, assignment))
    }

    /// Runs the greedy pipeline: palletize, route, assign.
    ///
    /// # Errors
    ///
    /// Invalid packing or router settings are [`PickingError::InvalidConfig`];
    /// packing failures are propagated from [`Palletizer::pack`].
    pub fn greedy(&self) -> Result<Solution> {
        self.packing.validate().map_err(PickingError::InvalidConfig)?;
        self.router.validate().map_err(PickingError::InvalidConfig)?;

        let pallets = self.palletizer().pack(&self.orders)?;
        let solution = self.evaluate(pallets)?;
        log::info!(
            "greedy plan: {} pallets, {} routes, distance {:.3}, makespan {:.3}",
            solution.num_pallets(),
            solution.routes().len(),
            solution.total_distance(),
            solution.makespan()
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, PalletSpec};
    use crate::routing::TripCapacity;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            Item::new(1, 1.0, 1.0, 1),
            Item::new(2, 1.0, 1.0, 2),
            Item::new(3, 1.0, 1.0, 3),
        ])
        .expect("valid")
    }

    fn matrix() -> DistanceMatrix {
        DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 2.0)])
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            PickingProblem::new(catalog(), vec![], matrix(), 1),
            Err(PickingError::EmptyOrders)
        ));
        assert!(matches!(
            PickingProblem::new(catalog(), vec![Order::new(1).with_line(1, 1)], matrix(), 0),
            Err(PickingError::InvalidConfig(_))
        ));
        assert!(matches!(
            PickingProblem::new(catalog(), vec![Order::new(1).with_line(9, 1)], matrix(), 1),
            Err(PickingError::UnknownItem { order_id: 1, item_id: 9 })
        ));
        let small = DistanceMatrix::new(2);
        assert!(matches!(
            PickingProblem::new(catalog(), vec![Order::new(1).with_line(1, 1)], small, 1),
            Err(PickingError::LocationOutOfRange { .. })
        ));
    }

    #[test]
    fn test_depot_range() {
        let p = PickingProblem::new(catalog(), vec![Order::new(1).with_line(1, 1)], matrix(), 1)
            .expect("valid");
        assert!(p.clone().with_depot(3).is_ok());
        assert!(p.with_depot(4).is_err());
    }

    #[test]
    fn test_greedy_single_pallet() {
        let orders = vec![
            Order::new(1).with_line(1, 1).with_line(2, 1),
            Order::new(2).with_line(3, 1),
        ];
        let p = PickingProblem::new(catalog(), orders, matrix(), 2).expect("valid");
        let sol = p.greedy().expect("solves");
        assert_eq!(sol.num_pallets(), 1);
        assert_eq!(sol.routes().len(), 1);
        assert_eq!(sol.routes()[0].len(), 3);
        assert_eq!(sol.num_pickers(), 2);
        assert!((sol.makespan() - sol.total_distance()).abs() < 1e-10);
    }

    #[test]
    fn test_greedy_trip_capacity() {
        let orders = vec![Order::new(1).with_line(1, 2).with_line(3, 2)];
        let router = RouterConfig::default().with_capacity(TripCapacity::default().with_max_stops(2));
        let p = PickingProblem::new(catalog(), orders, matrix(), 2)
            .expect("valid")
            .with_packing(PackingConfig::default().with_pallet(PalletSpec::new(2.0, 2.0).expect("valid")))
            .with_router(router);
        let sol = p.greedy().expect("solves");
        assert_eq!(sol.routes().len(), 2);
        assert!(sol.routes().iter().all(|r| r.len() <= 2));
        assert!(sol.makespan() < sol.total_distance());
    }

    #[test]
    fn test_greedy_rejects_bad_router() {
        let router = RouterConfig::default().with_capacity(TripCapacity::default().with_max_stops(0));
        let p = PickingProblem::new(catalog(), vec![Order::new(1).with_line(1, 1)], matrix(), 1)
            .expect("valid")
            .with_router(router);
        assert!(matches!(p.greedy(), Err(PickingError::InvalidConfig(_))));
    }
}
