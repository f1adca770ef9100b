//! Dense distance matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n distance matrix over warehouse locations, stored in
/// row-major order.
///
/// Location indices are shared by the depot and the item storage slots;
/// which index is the depot is decided by the caller.
///
/// # Examples
///
/// ```
/// use u_picking::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from planar coordinates.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                let d = (dx * dx + dy * dy).sqrt();
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a distance matrix from square rows.
    ///
    /// Returns `None` if any row length differs from the row count.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.concat(),
            size,
        })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Total length of a closed walk `depot → path… → depot`.
    ///
    /// An empty path has length zero.
    pub fn tour_length(&self, depot: usize, path: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            return 0.0;
        };
        let inner: f64 = path.windows(2).map(|w| self.get(w[0], w[1])).sum();
        self.get(depot, first) + inner + self.get(last, depot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(0, 0)).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_rows() {
        let dm = DistanceMatrix::from_rows(&[vec![0.0, 2.0], vec![3.0, 0.0]]).expect("square");
        assert_eq!(dm.get(0, 1), 2.0);
        assert_eq!(dm.get(1, 0), 3.0);
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_tour_length() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.tour_length(0, &[]), 0.0);
        // 0→1→2→0 = 5 + 5 + 8
        assert!((dm.tour_length(0, &[1, 2]) - 18.0).abs() < 1e-10);
        assert!((dm.tour_length(0, &[2, 1]) - 18.0).abs() < 1e-10);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }
}
