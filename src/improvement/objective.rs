//! Objective functions for solution improvement.

use serde::{Deserialize, Serialize};

use crate::models::Solution;

/// Quantity minimized by the annealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Objective {
    /// Sum of all route distances.
    #[default]
    RoutingDistance,
    /// Maximum cumulative picker load.
    Makespan,
}

impl Objective {
    /// Objective value of `solution`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_picking::improvement::Objective;
    /// use u_picking::models::{Assignment, Route, Solution, Stop};
    ///
    /// let stop = Stop { order_id: 1, item_id: 1, location: 1, weight: 0.0 };
    /// let routes = vec![Route::new(0, 0, 0, vec![stop], 7.0), Route::new(1, 0, 0, vec![stop], 5.0)];
    /// let mut a = Assignment::new(2);
    /// a.push(0, 0, 7.0);
    /// a.push(1, 1, 5.0);
    /// let s = Solution::new(vec![], routes, a);
    /// assert_eq!(Objective::RoutingDistance.evaluate(&s), 12.0);
    /// assert_eq!(Objective::Makespan.evaluate(&s), 7.0);
    /// ```
    pub fn evaluate(&self, solution: &Solution) -> f64 {
        match self {
            Objective::RoutingDistance => solution.total_distance(),
            Objective::Makespan => solution.makespan(),
        }
    }

    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Objective::RoutingDistance => "distance",
            Objective::Makespan => "makespan",
        }
    }
}
