//! Picker-to-route assignment.

use serde::{Deserialize, Serialize};

/// Routes assigned to each picker, with the resulting loads.
///
/// Routes are referenced by their index in the solution's route list.
///
/// # Examples
///
/// ```
/// use u_picking::models::Assignment;
///
/// let mut a = Assignment::new(2);
/// a.push(0, 0, 10.0);
/// a.push(1, 1, 4.0);
/// a.push(1, 2, 3.0);
/// assert_eq!(a.makespan(), 10.0);
/// assert_eq!(a.picker_of(2), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    routes: Vec<Vec<usize>>,
    loads: Vec<f64>,
}

impl Assignment {
    /// Creates an assignment with `num_pickers` idle pickers.
    pub fn new(num_pickers: usize) -> Self {
        Self {
            routes: vec![Vec::new(); num_pickers],
            loads: vec![0.0; num_pickers],
        }
    }

    /// Appends `route` with processing time `duration` to `picker`.
    pub fn push(&mut self, picker: usize, route: usize, duration: f64) {
        self.routes[picker].push(route);
        self.loads[picker] += duration;
    }

    /// Number of pickers.
    pub fn num_pickers(&self) -> usize {
        self.routes.len()
    }

    /// Route indices of `picker`, in assignment order.
    pub fn routes_of(&self, picker: usize) -> &[usize] {
        &self.routes[picker]
    }

    /// Route lists of all pickers.
    pub fn picker_routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Cumulative load of `picker`.
    pub fn load(&self, picker: usize) -> f64 {
        self.loads[picker]
    }

    /// Loads of all pickers.
    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    /// Maximum picker load.
    pub fn makespan(&self) -> f64 {
        self.loads.iter().copied().fold(0.0, f64::max)
    }

    /// Picker holding `route`, if any.
    pub fn picker_of(&self, route: usize) -> Option<usize> {
        self.routes.iter().position(|rs| rs.contains(&route))
    }

    /// Moves `route` (processing time `duration`) from picker `from` to
    /// picker `to`, appending it to `to`'s list.
    ///
    /// Returns `false` if `from` does not hold the route.
    pub fn transfer(&mut self, route: usize, from: usize, to: usize, duration: f64) -> bool {
        let Some(pos) = self.routes[from].iter().position(|&r| r == route) else {
            return false;
        };
        self.routes[from].remove(pos);
        self.loads[from] -= duration;
        if self.routes[from].is_empty() {
            self.loads[from] = 0.0;
        }
        self.push(to, route, duration);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_empty() {
        let a = Assignment::new(3);
        assert_eq!(a.num_pickers(), 3);
        assert_eq!(a.makespan(), 0.0);
        assert!(a.routes_of(0).is_empty());
        assert_eq!(a.picker_of(0), None);
    }

    #[test]
    fn test_transfer() {
        let mut a = Assignment::new(2);
        a.push(0, 0, 5.0);
        a.push(0, 1, 3.0);
        assert!(a.transfer(1, 0, 1, 3.0));
        assert_eq!(a.routes_of(0), &[0]);
        assert_eq!(a.routes_of(1), &[1]);
        assert_eq!(a.loads(), &[5.0, 3.0]);
        assert!(!a.transfer(1, 0, 1, 3.0));
    }
}
