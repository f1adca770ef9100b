//! Neighborhood moves over complete solutions.
//!
//! Every move builds a new [`Solution`] from the current one and leaves the
//! current one untouched. Packing moves repack only the pallets they touch
//! and reroute only those pallets; routes of untouched pallets are reused.

use std::collections::HashMap;

use rand::Rng;

use super::MoveKind;
use crate::assignment;
use crate::error::Result;
use crate::models::{ItemInstance, OrderId, Pallet, Solution};
use crate::palletization::Palletizer;
use crate::pipeline::PickingProblem;
use crate::routing::{route_distance, Router};

/// Applies moves for one problem instance.
pub(crate) struct Neighborhood<'a> {
    problem: &'a PickingProblem,
    palletizer: Palletizer<'a>,
    router: Router<'a>,
}

impl<'a> Neighborhood<'a> {
    pub fn new(problem: &'a PickingProblem) -> Self {
        Self {
            problem,
            palletizer: problem.palletizer(),
            router: problem.router(),
        }
    }

    /// Applies a random move of the given kind.
    ///
    /// Returns `Ok(None)` when the move is unavailable for `current` (too few
    /// pallets, routes, or pickers) or yields an infeasible packing.
    pub fn apply<R: Rng>(&self, kind: MoveKind, current: &Solution, rng: &mut R) -> Result<Option<Solution>> {
        match kind {
            MoveKind::SwapUnits => self.swap_units(current, rng),
            MoveKind::RelocateUnit => self.relocate_unit(current, rng),
            MoveKind::SwapStops => self.swap_stops(current, rng),
            MoveKind::ReassignRoute => Ok(self.reassign_route(current, rng)),
        }
    }

    fn swap_units<R: Rng>(&self, current: &Solution, rng: &mut R) -> Result<Option<Solution>> {
        let pallets = current.pallets();
        if pallets.len() < 2 {
            return Ok(None);
        }
        let a = rng.random_range(0..pallets.len());
        let b = other_index(a, pallets.len(), rng);
        let (Some(oa), Some(ob)) = (pick_order(&pallets[a], rng), pick_order(&pallets[b], rng)) else {
            return Ok(None);
        };

        let units_a = exchange(&pallets[a], oa, &pallets[b], ob);
        let units_b = exchange(&pallets[b], ob, &pallets[a], oa);
        let Some(new_a) = self.palletizer.repack(a, &units_a)? else {
            return Ok(None);
        };
        let Some(new_b) = self.palletizer.repack(b, &units_b)? else {
            return Ok(None);
        };
        log::trace!("swap order {oa} on pallet {a} with order {ob} on pallet {b}");

        let changes = HashMap::from([(a, Some(new_a)), (b, Some(new_b))]);
        self.rebuild(current, changes).map(Some)
    }

    fn relocate_unit<R: Rng>(&self, current: &Solution, rng: &mut R) -> Result<Option<Solution>> {
        let pallets = current.pallets();
        if pallets.len() < 2 {
            return Ok(None);
        }
        let a = rng.random_range(0..pallets.len());
        let b = other_index(a, pallets.len(), rng);
        let Some(oa) = pick_order(&pallets[a], rng) else {
            return Ok(None);
        };

        let (moving, rest): (Vec<ItemInstance>, Vec<ItemInstance>) = pallets[a]
            .instances()
            .into_iter()
            .partition(|u| u.order_id == oa);
        let mut target = pallets[b].instances();
        target.extend(moving);

        let Some(new_b) = self.palletizer.repack(b, &target)? else {
            return Ok(None);
        };
        let new_a = if rest.is_empty() {
            None
        } else {
            match self.palletizer.repack(a, &rest)? {
                Some(p) => Some(p),
                None => return Ok(None),
            }
        };
        log::trace!("relocate order {oa} from pallet {a} to pallet {b}");

        let changes = HashMap::from([(a, new_a), (b, Some(new_b))]);
        self.rebuild(current, changes).map(Some)
    }

    fn swap_stops<R: Rng>(&self, current: &Solution, rng: &mut R) -> Result<Option<Solution>> {
        let routes = current.routes();
        if routes.is_empty() {
            return Ok(None);
        }
        let r = rng.random_range(0..routes.len());
        let siblings: Vec<usize> = (0..routes.len())
            .filter(|&k| routes[k].pallet_id() == routes[r].pallet_id())
            .collect();
        let s = siblings[rng.random_range(0..siblings.len())];
        if routes[r].is_empty() || routes[s].is_empty() {
            return Ok(None);
        }

        let mut next = routes.to_vec();
        if r == s {
            let len = routes[r].len();
            if len < 2 {
                return Ok(None);
            }
            let i = rng.random_range(0..len);
            let j = other_index(i, len, rng);
            next[r].stops_mut().swap(i, j);
        } else {
            let i = rng.random_range(0..routes[r].len());
            let j = rng.random_range(0..routes[s].len());
            next[r].stops_mut()[i] = routes[s].stops()[j];
            next[s].stops_mut()[j] = routes[r].stops()[i];

            let capacity = &self.router.config().capacity;
            if !capacity.admits(next[r].len(), next[r].weight())
                || !capacity.admits(next[s].len(), next[s].weight())
            {
                return Ok(None);
            }
            let distance = route_distance(&next[s], self.problem.distances());
            next[s].set_distance(distance);
        }
        let distance = route_distance(&next[r], self.problem.distances());
        next[r].set_distance(distance);
        log::trace!("swap stops of routes {r} and {s}");

        self.problem
            .assign(current.pallets().to_vec(), next)
            .map(Some)
    }

    fn reassign_route<R: Rng>(&self, current: &Solution, rng: &mut R) -> Option<Solution> {
        let routes = current.routes();
        let pickers = current.num_pickers();
        if routes.is_empty() || pickers < 2 {
            return None;
        }
        let r = rng.random_range(0..routes.len());
        let from = current.assignment().picker_of(r)?;
        let to = other_index(from, pickers, rng);

        let mut next = current.assignment().clone();
        next.transfer(r, from, to, routes[r].distance());
        log::trace!("move route {r} from picker {from} to picker {to}");

        Some(Solution::new(
            current.pallets().to_vec(),
            routes.to_vec(),
            assignment::reload(&next, routes),
        ))
    }

    /// Assembles a solution after pallets changed.
    ///
    /// `changes` maps a pallet index to its replacement, or to `None` when
    /// the pallet is dropped. Pallets and routes are renumbered; untouched
    /// pallets keep their routes, changed pallets are rerouted, and all
    /// routes are reassigned.
    fn rebuild(&self, current: &Solution, mut changes: HashMap<usize, Option<Pallet>>) -> Result<Solution> {
        let mut pallets = Vec::with_capacity(current.num_pallets());
        let mut origin = Vec::with_capacity(current.num_pallets());
        for (idx, pallet) in current.pallets().iter().enumerate() {
            match changes.remove(&idx) {
                Some(Some(changed)) => {
                    pallets.push(changed);
                    origin.push(None);
                }
                Some(None) => {}
                None => {
                    pallets.push(pallet.clone());
                    origin.push(Some(idx));
                }
            }
        }

        let mut routes = Vec::with_capacity(current.routes().len());
        for (new_id, (pallet, old)) in pallets.iter_mut().zip(&origin).enumerate() {
            pallet.set_id(new_id);
            match old {
                Some(old_id) => {
                    for route in current.routes_of_pallet(*old_id) {
                        let mut route = route.clone();
                        route.set_id(routes.len());
                        route.set_pallet_id(new_id);
                        routes.push(route);
                    }
                }
                None => {
                    let first_id = routes.len();
                    routes.extend(self.router.route_pallet(pallet, first_id));
                }
            }
        }

        self.problem.assign(pallets, routes)
    }
}

/// A uniformly drawn index in `0..n` other than `i`. Requires `n >= 2`.
fn other_index<R: Rng>(i: usize, n: usize, rng: &mut R) -> usize {
    (i + 1 + rng.random_range(0..n - 1)) % n
}

fn pick_order<R: Rng>(pallet: &Pallet, rng: &mut R) -> Option<OrderId> {
    let ids = pallet.order_ids();
    if ids.is_empty() {
        return None;
    }
    Some(ids[rng.random_range(0..ids.len())])
}

/// Units of `keep` without order `drop`, followed by the units of order
/// `take` from `give`.
fn exchange(keep: &Pallet, drop: OrderId, give: &Pallet, take: OrderId) -> Vec<ItemInstance> {
    keep.instances()
        .into_iter()
        .filter(|u| u.order_id != drop)
        .chain(give.instances().into_iter().filter(|u| u.order_id == take))
        .collect()
}
