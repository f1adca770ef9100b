//! Complete wave-picking solution.

use serde::{Deserialize, Serialize};

use super::{Assignment, Pallet, Route};

/// Pallets, routes, and picker assignment of one plan, with its objective
/// values.
///
/// A solution is treated as immutable once built: improvement produces new
/// solutions instead of patching existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pallets: Vec<Pallet>,
    routes: Vec<Route>,
    assignment: Assignment,
    total_distance: f64,
    makespan: f64,
}

impl Solution {
    /// Assembles a solution and derives its objective values.
    pub fn new(pallets: Vec<Pallet>, routes: Vec<Route>, assignment: Assignment) -> Self {
        let total_distance = routes.iter().map(Route::distance).sum();
        let makespan = assignment.makespan();
        Self {
            pallets,
            routes,
            assignment,
            total_distance,
            makespan,
        }
    }

    /// Pallets, indexed by pallet ID.
    pub fn pallets(&self) -> &[Pallet] {
        &self.pallets
    }

    /// Routes, indexed by route ID.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Routes serving the given pallet.
    pub fn routes_of_pallet(&self, pallet_id: usize) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.pallet_id() == pallet_id)
    }

    /// Picker assignment.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of pallets.
    pub fn num_pallets(&self) -> usize {
        self.pallets.len()
    }

    /// Number of pickers.
    pub fn num_pickers(&self) -> usize {
        self.assignment.num_pickers()
    }

    /// Sum of route distances.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Maximum picker load.
    pub fn makespan(&self) -> f64 {
        self.makespan
    }

    /// Mean floor utilization over all pallets.
    pub fn mean_utilization(&self) -> f64 {
        if self.pallets.is_empty() {
            return 0.0;
        }
        self.pallets.iter().map(Pallet::utilization).sum::<f64>() / self.pallets.len() as f64
    }

    /// Consumes the solution, returning its parts.
    pub fn into_parts(self) -> (Vec<Pallet>, Vec<Route>, Assignment) {
        (self.pallets, self.routes, self.assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PalletSpec, Stop};

    #[test]
    fn test_solution_totals() {
        let stop = Stop {
            order_id: 1,
            item_id: 1,
            location: 1,
            weight: 0.0,
        };
        let routes = vec![
            Route::new(0, 0, 0, vec![stop], 10.0),
            Route::new(1, 1, 0, vec![stop], 6.0),
        ];
        let mut assignment = Assignment::new(2);
        assignment.push(0, 0, 10.0);
        assignment.push(1, 1, 6.0);
        let pallets = vec![
            Pallet::new(0, PalletSpec::default(), 0.0),
            Pallet::new(1, PalletSpec::default(), 0.0),
        ];

        let sol = Solution::new(pallets, routes, assignment);
        assert_eq!(sol.num_pallets(), 2);
        assert_eq!(sol.num_pickers(), 2);
        assert!((sol.total_distance() - 16.0).abs() < 1e-10);
        assert!((sol.makespan() - 10.0).abs() < 1e-10);
        assert_eq!(sol.routes_of_pallet(1).count(), 1);
        assert_eq!(sol.mean_utilization(), 0.0);
    }
}
