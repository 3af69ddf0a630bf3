//! Dense distance matrix indexed by global node id.

use serde::{Deserialize, Serialize};

use crate::models::Site;

/// A dense n×n distance matrix stored in row-major order.
///
/// Rows and columns are global node ids, so depots, satellites and customers
/// share one table.
///
/// # Examples
///
/// ```
/// use u_echelon::models::Site;
/// use u_echelon::distance::DistanceMatrix;
///
/// let sites = vec![
///     Site::new(0, 0, 0.0, 0.0, 0.0),
///     Site::new(0, 1, 3.0, 4.0, 0.0),
///     Site::new(1, 2, 6.0, 8.0, 0.0),
/// ];
/// let dm = DistanceMatrix::from_sites(&sites);
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

    /// Computes a Euclidean distance matrix from site coordinates.
    ///
    /// The matrix is sized to the largest global id; ids missing from
    /// `sites` keep zero rows.
    pub fn from_sites(sites: &[Site]) -> Self {
        let size = sites.iter().map(|s| s.global_id() + 1).max().unwrap_or(0);
        let mut dm = Self::new(size);
        for (i, a) in sites.iter().enumerate() {
            for b in &sites[i + 1..] {
                let d = a.distance_to(b);
                dm.set(a.global_id(), b.global_id(), d);
                dm.set(b.global_id(), a.global_id(), d);
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

    /// Returns the distance from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from node `from` to node `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of nodes in this matrix.
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

    /// Returns the position in `candidates` of the node nearest to `from`.
    ///
    /// Ties keep the earliest candidate. Returns `None` if `candidates` is
    /// empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .min_by(|(_, &a), (_, &b)| self.get(from, a).total_cmp(&self.get(from, b)))
            .map(|(pos, _)| pos)
    }
}
