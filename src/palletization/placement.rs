//! Candidate search over a pallet's empty maximal spaces.

use super::PlacementRule;
use crate::models::{Candidate, Item, Pallet};

/// Finds the best feasible position for `item` on `pallet`.
///
/// Orientations are scanned unrotated first, spaces in arena order, and a
/// candidate replaces the incumbent only when strictly better. Ties therefore
/// favor the unrotated orientation, then the lower space index.
///
/// Returns `None` if the item exceeds the remaining weight budget, the height
/// limit, or every space.
pub(crate) fn find_candidate(
    pallet: &Pallet,
    item: &Item,
    rule: PlacementRule,
    allow_rotation: bool,
) -> Option<Candidate> {
    if !pallet.can_carry(item) {
        return None;
    }
    let orientations: &[bool] = if allow_rotation && item.width() != item.depth() {
        &[false, true]
    } else {
        &[false]
    };

    let mut best: Option<(Candidate, (f64, f64))> = None;
    for &rotated in orientations {
        let (w, d) = item.footprint(rotated);
        for (space, ems) in pallet.spaces().spaces().iter().enumerate() {
            if !ems.can_hold(w, d) {
                continue;
            }
            let candidate = Candidate {
                x: ems.x,
                y: ems.y,
                rotated,
                space,
            };
            let key = rank(pallet, item, &candidate, rule);
            if best.as_ref().map_or(true, |(_, inc)| key < *inc) {
                best = Some((candidate, key));
            }
        }
    }
    best.map(|(c, _)| c)
}

/// Ordering key of `candidate` under `rule`; smaller is better.
///
/// Keys of candidates on different pallets of the same spec are comparable.
pub(crate) fn rank(pallet: &Pallet, item: &Item, candidate: &Candidate, rule: PlacementRule) -> (f64, f64) {
    match rule {
        PlacementRule::BottomLeft => (candidate.y, candidate.x),
        PlacementRule::FarCorner => {
            let (w, d) = item.footprint(candidate.rotated);
            (-far_corner_score(pallet, candidate, w, d), 0.0)
        }
    }
}

/// Distance from the top-right corner of the placed footprint to the far
/// corner of the pallet. Larger keeps the remaining free area compact.
fn far_corner_score(pallet: &Pallet, c: &Candidate, w: f64, d: f64) -> f64 {
    let spec = pallet.spec();
    (spec.width() - (c.x + w)).hypot(spec.depth() - (c.y + d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PalletSpec;

    fn pallet(w: f64, d: f64) -> Pallet {
        Pallet::new(0, PalletSpec::new(w, d).expect("valid"), 0.0)
    }

    #[test]
    fn test_empty_pallet_origin() {
        let p = pallet(4.0, 4.0);
        let c = find_candidate(&p, &Item::new(1, 2.0, 1.0, 0), PlacementRule::BottomLeft, true)
            .expect("fits");
        assert_eq!((c.x, c.y, c.rotated, c.space), (0.0, 0.0, false, 0));
    }

    #[test]
    fn test_bottom_left_prefers_low_y() {
        let mut p = pallet(4.0, 4.0);
        p.place(1, &Item::new(1, 2.0, 1.0, 0), 0.0, 0.0, false);
        // Spaces: right strip (2,0,2,4) and upper strip (0,1,4,3).
        let c = find_candidate(&p, &Item::new(2, 1.0, 1.0, 0), PlacementRule::BottomLeft, true)
            .expect("fits");
        assert_eq!((c.x, c.y), (2.0, 0.0));
    }

    #[test]
    fn test_rotation_required() {
        let mut p = pallet(4.0, 4.0);
        p.place(1, &Item::new(1, 3.0, 4.0, 0), 0.0, 0.0, false);
        let tall = Item::new(2, 4.0, 1.0, 0);
        assert!(find_candidate(&p, &tall, PlacementRule::BottomLeft, false).is_none());
        let c = find_candidate(&p, &tall, PlacementRule::BottomLeft, true).expect("rotated fits");
        assert!(c.rotated);
        assert_eq!((c.x, c.y), (3.0, 0.0));
    }

    #[test]
    fn test_far_corner_scoring() {
        let mut p = pallet(6.0, 4.0);
        p.place(1, &Item::new(1, 1.0, 1.0, 0), 0.0, 0.0, false);
        let unit = Item::new(2, 1.0, 1.0, 0);
        // (1,0) scores hypot(4, 3) = 5, (0,1) scores hypot(5, 2).
        let c = find_candidate(&p, &unit, PlacementRule::FarCorner, true).expect("fits");
        assert_eq!((c.x, c.y), (0.0, 1.0));
        let c = find_candidate(&p, &unit, PlacementRule::BottomLeft, true).expect("fits");
        assert_eq!((c.x, c.y), (1.0, 0.0));
    }

    #[test]
    fn test_weight_budget_blocks() {
        let spec = PalletSpec::new(4.0, 4.0).expect("valid").with_max_weight(5.0);
        let mut p = Pallet::new(0, spec, 0.0);
        let item = Item::new(1, 1.0, 1.0, 0).with_weight(3.0);
        p.place(1, &item, 0.0, 0.0, false);
        assert!(find_candidate(&p, &item, PlacementRule::BottomLeft, true).is_none());
    }
}
