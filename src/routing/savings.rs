//! Clarke-Wright savings over the stops of one pallet.
//!
//! # Algorithm
//!
//! Every stop starts on its own trip (depot → stop → depot). Trips are
//! merged in decreasing order of
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! when `i` and `j` are endpoints of distinct trips and the merged trip
//! respects the trip capacity. Infeasible merges are skipped, not retried.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use super::TripCapacity;
use crate::distance::DistanceMatrix;
use crate::models::Stop;

/// A savings value for joining the trips of stops `i` and `j`.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// Outcome of the merge loop: trips as stop indices, plus the number of
/// merges performed.
#[derive(Debug)]
pub(crate) struct Merged {
    pub trips: Vec<Vec<usize>>,
    pub merges: usize,
}

/// Runs the savings merge loop over `stops`.
///
/// Every unordered pair is considered, including pairs with non-positive
/// savings. Ties keep the earliest-indexed pair.
pub(crate) fn merge_trips(
    stops: &[Stop],
    distances: &DistanceMatrix,
    depot: usize,
    capacity: &TripCapacity,
) -> Merged {
    let n = stops.len();
    if n == 0 {
        return Merged {
            trips: Vec::new(),
            merges: 0,
        };
    }

    let loc = |k: usize| stops[k].location;
    let mut savings = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let s = distances.get(depot, loc(i)) + distances.get(depot, loc(j))
                - distances.get(loc(i), loc(j));
            savings.push(Saving { i, j, value: s });
        }
    }
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));

    // trip_of[stop] = trip slot; slots are emptied when merged away
    let mut trip_of: Vec<usize> = (0..n).collect();
    let mut members: Vec<Vec<usize>> = (0..n).map(|k| vec![k]).collect();
    let mut weight: Vec<f64> = stops.iter().map(|s| s.weight).collect();
    let mut merges = 0;

    for saving in &savings {
        let ri = trip_of[saving.i];
        let rj = trip_of[saving.j];
        if ri == rj {
            continue;
        }

        let combined_len = members[ri].len() + members[rj].len();
        let combined_weight = weight[ri] + weight[rj];
        if !capacity.admits(combined_len, combined_weight) {
            continue;
        }

        let i_at_end = members[ri].last() == Some(&saving.i);
        let j_at_start = members[rj].first() == Some(&saving.j);
        let i_at_start = members[ri].first() == Some(&saving.i);
        let j_at_end = members[rj].last() == Some(&saving.j);

        let (merge_from, merge_into, reverse_from, reverse_into) = if i_at_end && j_at_start {
            (rj, ri, false, false)
        } else if j_at_end && i_at_start {
            (ri, rj, false, false)
        } else if i_at_end && j_at_end {
            (rj, ri, true, false)
        } else if i_at_start && j_at_start {
            (rj, ri, false, true)
        } else {
            continue;
        };

        let mut from_members = std::mem::take(&mut members[merge_from]);
        if reverse_from {
            from_members.reverse();
        }
        if reverse_into {
            members[merge_into].reverse();
        }
        members[merge_into].append(&mut from_members);
        weight[merge_into] = combined_weight;
        weight[merge_from] = 0.0;

        for &k in &members[merge_into] {
            trip_of[k] = merge_into;
        }
        merges += 1;
    }

    Merged {
        trips: members.into_iter().filter(|m| !m.is_empty()).collect(),
        merges,
    }
}

/// Concatenates trips in order while the capacity allows.
pub(crate) fn chain(trips: Vec<Vec<usize>>, stops: &[Stop], capacity: &TripCapacity) -> Vec<Vec<usize>> {
    let trip_weight = |t: &[usize]| t.iter().map(|&k| stops[k].weight).sum::<f64>();
    let mut chained: Vec<Vec<usize>> = Vec::with_capacity(trips.len());
    for trip in trips {
        if let Some(current) = chained.last_mut() {
            if capacity.admits(current.len() + trip.len(), trip_weight(current) + trip_weight(&trip)) {
                current.extend(trip);
                continue;
            }
        }
        chained.push(trip);
    }
    chained
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use u_numflow::random::create_rng;

    fn stops(n: usize) -> Vec<Stop> {
        (1..=n)
            .map(|k| Stop {
                order_id: 1,
                item_id: k,
                location: k,
                weight: 1.0,
            })
            .collect()
    }

    /// d(0,i) = 5, d(1,2) = 2, d(1,3) = d(2,3) = 8.
    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 2.0, 8.0],
            vec![5.0, 2.0, 0.0, 8.0],
            vec![5.0, 8.0, 8.0, 0.0],
        ])
        .expect("square")
    }

    #[test]
    fn test_highest_saving_merged_first() {
        let cap = TripCapacity::default().with_max_stops(2);
        let merged = merge_trips(&stops(3), &triangle(), 0, &cap);
        assert_eq!(merged.trips, vec![vec![0, 1], vec![2]]);
        assert_eq!(merged.merges, 1);
    }

    #[test]
    fn test_unbounded_merges_everything() {
        let merged = merge_trips(&stops(3), &triangle(), 0, &TripCapacity::default());
        assert_eq!(merged.trips.len(), 1);
        assert_eq!(merged.merges, 2);
        assert_eq!(merged.trips[0], vec![2, 0, 1]);
    }

    #[test]
    fn test_weight_capacity() {
        let cap = TripCapacity::default().with_max_weight(1.5);
        let merged = merge_trips(&stops(3), &triangle(), 0, &cap);
        assert_eq!(merged.trips.len(), 3);
        assert_eq!(merged.merges, 0);
    }

    #[test]
    fn test_each_merge_removes_one_trip() {
        let mut rng = create_rng(11);
        for _ in 0..30 {
            let n = rng.random_range(1..9usize);
            let pts: Vec<(f64, f64)> = (0..=n)
                .map(|_| (rng.random_range(0.0..20.0), rng.random_range(0.0..20.0)))
                .collect();
            let dm = DistanceMatrix::from_points(&pts);
            let max_stops = rng.random_range(1..5usize);
            let cap = TripCapacity::default().with_max_stops(max_stops);
            let merged = merge_trips(&stops(n), &dm, 0, &cap);

            assert_eq!(merged.trips.len() + merged.merges, n);
            assert!(merged.trips.iter().all(|t| t.len() <= max_stops));
            let mut seen = merged.trips.concat();
            seen.sort_unstable();
            assert_eq!(seen, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_empty_and_single() {
        let dm = triangle();
        assert!(merge_trips(&[], &dm, 0, &TripCapacity::default()).trips.is_empty());
        let merged = merge_trips(&stops(1), &dm, 0, &TripCapacity::default());
        assert_eq!(merged.trips, vec![vec![0]]);
    }

    #[test]
    fn test_chain_respects_capacity() {
        let s = stops(3);
        let trips = vec![vec![0], vec![1], vec![2]];
        assert_eq!(
            chain(trips.clone(), &s, &TripCapacity::default()),
            vec![vec![0, 1, 2]]
        );
        assert_eq!(
            chain(trips, &s, &TripCapacity::default().with_max_stops(2)),
            vec![vec![0, 1], vec![2]]
        );
    }
}
