//! Axis-aligned rectangles and the empty-maximal-space set of a pallet.

use serde::{Deserialize, Serialize};

/// Tolerance for coordinate comparisons.
pub(crate) const EPS: f64 = 1e-9;

/// An axis-aligned rectangle on the pallet floor.
///
/// `(x, y)` is the bottom-left corner; `width` extends along x and `depth`
/// along y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, depth: f64) -> Self {
        Self { x, y, width, depth }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (`y + depth`).
    pub fn top(&self) -> f64 {
        self.y + self.depth
    }

    /// Area.
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    /// Returns `true` if the interiors of the two rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right() - EPS
            && other.x < self.right() - EPS
            && self.y < other.top() - EPS
            && other.y < self.top() - EPS
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }

    /// Returns `true` if the point lies inside or on the boundary.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x - EPS && px <= self.right() + EPS && py >= self.y - EPS && py <= self.top() + EPS
    }

    /// Returns `true` if a `width × depth` footprint fits in this rectangle.
    pub fn can_hold(&self, width: f64, depth: f64) -> bool {
        width <= self.width + EPS && depth <= self.depth + EPS
    }

    /// Splits `self` around an overlapping `cut` into the maximal strips
    /// left, right, below and above the cut.
    fn difference(&self, cut: &Rect) -> impl Iterator<Item = Rect> {
        let left = (cut.x > self.x + EPS).then(|| Rect::new(self.x, self.y, cut.x - self.x, self.depth));
        let right = (cut.right() < self.right() - EPS)
            .then(|| Rect::new(cut.right(), self.y, self.right() - cut.right(), self.depth));
        let below = (cut.y > self.y + EPS).then(|| Rect::new(self.x, self.y, self.width, cut.y - self.y));
        let above = (cut.top() < self.top() - EPS)
            .then(|| Rect::new(self.x, cut.top(), self.width, self.top() - cut.top()));
        [left, right, below, above].into_iter().flatten()
    }
}

/// The empty maximal spaces of one pallet.
///
/// Spaces live in an index arena (`Vec<Rect>`). Every placement replaces the
/// spaces it intersects with their maximal strips, then a compaction pass
/// drops spaces that are too small or contained in another space.
///
/// With `min_edge == 0` the union of the spaces is exactly the free floor
/// area of the pallet.
///
/// # Examples
///
/// ```
/// use u_picking::models::{EmsSet, Rect};
///
/// let mut spaces = EmsSet::new(2.0, 2.0, 0.0);
/// spaces.occupy(&Rect::new(0.0, 0.0, 1.0, 1.0));
/// // Right strip and upper strip remain, overlapping in the top-right cell.
/// assert_eq!(spaces.len(), 2);
/// assert!((spaces.free_area_upper_bound() - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmsSet {
    spaces: Vec<Rect>,
    min_edge: f64,
}

impl EmsSet {
    /// Creates the space set of an empty `width × depth` pallet.
    pub fn new(width: f64, depth: f64, min_edge: f64) -> Self {
        Self {
            spaces: vec![Rect::new(0.0, 0.0, width, depth)],
            min_edge,
        }
    }

    /// Current spaces, in arena order.
    pub fn spaces(&self) -> &[Rect] {
        &self.spaces
    }

    /// Number of spaces.
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Returns `true` if no free space remains.
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    /// Sum of space areas. Spaces may overlap, so this bounds the free area
    /// from above.
    pub fn free_area_upper_bound(&self) -> f64 {
        self.spaces.iter().map(Rect::area).sum()
    }

    /// Removes `item` from the free area.
    pub fn occupy(&mut self, item: &Rect) {
        let mut next = Vec::with_capacity(self.spaces.len() + 4);
        for space in &self.spaces {
            if space.overlaps(item) {
                next.extend(space.difference(item));
            } else {
                next.push(*space);
            }
        }
        self.spaces = next;
        self.compact();
    }

    /// Drops undersized and dominated spaces.
    ///
    /// Of two identical spaces the one with the lower index survives.
    fn compact(&mut self) {
        let min_edge = self.min_edge.max(EPS);
        let n = self.spaces.len();
        let mut alive: Vec<bool> = self
            .spaces
            .iter()
            .map(|s| s.width >= min_edge - EPS && s.depth >= min_edge - EPS && s.width > EPS && s.depth > EPS)
            .collect();

        for i in 0..n {
            if !alive[i] {
                continue;
            }
            for j in 0..n {
                if i == j || !alive[j] {
                    continue;
                }
                let (a, b) = (&self.spaces[i], &self.spaces[j]);
                if b.contains(a) && (!a.contains(b) || j < i) {
                    alive[i] = false;
                    break;
                }
            }
        }

        let mut idx = 0;
        self.spaces.retain(|_| {
            let keep = alive[idx];
            idx += 1;
            keep
        });
    }
}
