//! Longest-processing-time-first assignment of routes to pickers.
//!
//! # Algorithm
//!
//! Routes are sorted by descending duration (stable, so ties keep route
//! order) and each goes to the picker with the smallest load so far (ties go
//! to the lowest picker index).
//!
//! # Reference
//!
//! Graham, R.L. (1969). "Bounds on Multiprocessing Timing Anomalies",
//! *SIAM Journal on Applied Mathematics* 17(2), 416-429.

mod schedule;

pub use schedule::{PickerSchedule, ScheduleEntry};

use crate::error::{PickingError, Result};
use crate::models::{Assignment, Route};

/// Assigns routes to `num_pickers` pickers, using route distance as the
/// processing time.
///
/// # Errors
///
/// [`PickingError::InvalidConfig`] if `num_pickers` is zero.
///
/// # Examples
///
/// ```
/// use u_picking::assignment::assign_durations;
///
/// let a = assign_durations(&[10.0, 9.0, 8.0, 7.0], 2).unwrap();
/// assert_eq!(a.routes_of(0), &[0, 3]);
/// assert_eq!(a.routes_of(1), &[1, 2]);
/// assert_eq!(a.makespan(), 17.0);
/// ```
pub fn assign(routes: &[Route], num_pickers: usize) -> Result<Assignment> {
    let durations: Vec<f64> = routes.iter().map(Route::distance).collect();
    assign_durations(&durations, num_pickers)
}

/// Assigns jobs with the given durations to `num_pickers` pickers.
///
/// Job `k` is referenced as route index `k` in the result.
pub fn assign_durations(durations: &[f64], num_pickers: usize) -> Result<Assignment> {
    if num_pickers == 0 {
        return Err(PickingError::InvalidConfig(
            "num_pickers must be positive".into(),
        ));
    }

    let mut order: Vec<usize> = (0..durations.len()).collect();
    order.sort_by(|&a, &b| durations[b].total_cmp(&durations[a]));

    let mut assignment = Assignment::new(num_pickers);
    for k in order {
        let picker = least_loaded(&assignment);
        assignment.push(picker, k, durations[k]);
    }
    Ok(assignment)
}

/// Picker with the minimum load; the lowest index wins ties.
fn least_loaded(assignment: &Assignment) -> usize {
    let mut best = 0;
    for (p, &load) in assignment.loads().iter().enumerate().skip(1) {
        if load < assignment.load(best) {
            best = p;
        }
    }
    best
}

/// Recomputes picker loads from route durations, keeping the route lists.
pub(crate) fn reload(assignment: &Assignment, routes: &[Route]) -> Assignment {
    let mut fresh = Assignment::new(assignment.num_pickers());
    for (picker, list) in assignment.picker_routes().iter().enumerate() {
        for &r in list {
            fresh.push(picker, r, routes[r].distance());
        }
    }
    fresh
}
