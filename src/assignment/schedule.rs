//! Picker timelines derived from an assignment.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, Route};

/// One route on a picker's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub picker: usize,
    pub route: usize,
    pub start: f64,
    pub end: f64,
    pub distance: f64,
    pub duration: f64,
}

/// Back-to-back picker timelines starting at time zero.
///
/// # Examples
///
/// ```
/// use u_picking::assignment::{assign, PickerSchedule};
/// use u_picking::models::{Route, Stop};
///
/// let stop = Stop { order_id: 1, item_id: 1, location: 1, weight: 0.0 };
/// let routes = vec![
///     Route::new(0, 0, 0, vec![stop], 10.0),
///     Route::new(1, 1, 0, vec![stop], 4.0),
///     Route::new(2, 2, 0, vec![stop], 3.0),
/// ];
/// let a = assign(&routes, 2).unwrap();
/// let schedule = PickerSchedule::build(&a, &routes, 0.5);
/// assert_eq!(schedule.entries().len(), 3);
/// assert_eq!(schedule.completion_time(1), 3.5);
/// assert_eq!(schedule.makespan(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PickerSchedule {
    entries: Vec<ScheduleEntry>,
}

impl PickerSchedule {
    /// Lays each picker's routes end to end in assignment order. A route
    /// takes `distance × time_per_distance`.
    pub fn build(assignment: &Assignment, routes: &[Route], time_per_distance: f64) -> Self {
        let mut entries = Vec::with_capacity(routes.len());
        for (picker, list) in assignment.picker_routes().iter().enumerate() {
            let mut clock = 0.0;
            for &route in list {
                let distance = routes[route].distance();
                let duration = distance * time_per_distance;
                entries.push(ScheduleEntry {
                    picker,
                    route,
                    start: clock,
                    end: clock + duration,
                    distance,
                    duration,
                });
                clock += duration;
            }
        }
        Self { entries }
    }

    /// Entries grouped by picker, each picker's in time order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Entries of one picker.
    pub fn picker_entries(&self, picker: usize) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |e| e.picker == picker)
    }

    /// Time at which `picker` finishes its last route (zero if idle).
    pub fn completion_time(&self, picker: usize) -> f64 {
        self.picker_entries(picker).map(|e| e.end).fold(0.0, f64::max)
    }

    /// Latest completion time over all pickers.
    pub fn makespan(&self) -> f64 {
        self.entries.iter().map(|e| e.end).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;

    #[test]
    fn test_back_to_back() {
        let stop = Stop {
            order_id: 1,
            item_id: 1,
            location: 1,
            weight: 0.0,
        };
        let routes: Vec<Route> = [6.0, 2.0, 3.0]
            .iter()
            .enumerate()
            .map(|(k, &d)| Route::new(k, 0, 0, vec![stop], d))
            .collect();
        let mut a = Assignment::new(2);
        a.push(0, 1, 2.0);
        a.push(0, 2, 3.0);
        a.push(1, 0, 6.0);

        let s = PickerSchedule::build(&a, &routes, 1.0);
        let p0: Vec<&ScheduleEntry> = s.picker_entries(0).collect();
        assert_eq!(p0.len(), 2);
        assert_eq!((p0[0].start, p0[0].end), (0.0, 2.0));
        assert_eq!((p0[1].start, p0[1].end), (2.0, 5.0));
        assert_eq!(s.completion_time(0), 5.0);
        assert_eq!(s.completion_time(1), 6.0);
        assert_eq!(s.makespan(), a.makespan());
    }

    #[test]
    fn test_idle_picker() {
        let s = PickerSchedule::build(&Assignment::new(2), &[], 1.0);
        assert!(s.entries().is_empty());
        assert_eq!(s.completion_time(1), 0.0);
    }
}
