//! Neighbor-list storage and access.

/// Voronoi-face neighbors for every input point, in input order.
///
/// Stored flat: `offsets` has one entry per point plus a final total, and
/// `ids[offsets[i] .. offsets[i + 1]]` are the neighbor indices of point
/// `i`. Unresolved points (see
/// [`VoronoiDiagnostics`](crate::VoronoiDiagnostics)) have empty lists.
#[derive(Debug, Clone)]
pub struct NeighborList {
    offsets: Vec<u32>,
    ids: Vec<u32>,
}

impl NeighborList {
    /// Assemble from raw parts. `offsets.len()` must be the point count
    /// plus one, with `offsets[0] == 0` and the last entry `ids.len()`.
    pub(crate) fn from_parts(offsets: Vec<u32>, ids: Vec<u32>) -> Self {
        debug_assert!(!offsets.is_empty());
        debug_assert_eq!(offsets[0], 0);
        debug_assert_eq!(*offsets.last().unwrap_or(&0) as usize, ids.len());
        Self { offsets, ids }
    }

    /// Number of input points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of neighbor entries over all points.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.ids.len()
    }

    /// Neighbor indices of point `index`.
    #[inline]
    pub fn neighbors(&self, index: usize) -> &[u32] {
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        &self.ids[start..end]
    }

    /// View of a single point's neighbors.
    #[inline]
    pub fn view(&self, index: usize) -> NeighborsView<'_> {
        NeighborsView {
            point_index: index,
            ids: self.neighbors(index),
        }
    }

    /// Iterate over all per-point views, in input order.
    pub fn iter(&self) -> impl Iterator<Item = NeighborsView<'_>> {
        (0..self.num_points()).map(move |i| self.view(i))
    }

    /// Copy out as one `Vec` per point.
    pub fn to_vecs(&self) -> Vec<Vec<u32>> {
        (0..self.num_points())
            .map(|i| self.neighbors(i).to_vec())
            .collect()
    }
}

/// A view into one point's neighbor set.
#[derive(Debug, Clone, Copy)]
pub struct NeighborsView<'a> {
    /// Index of the owning point.
    pub point_index: usize,
    /// Neighbor indices (unordered).
    pub ids: &'a [u32],
}

impl<'a> NeighborsView<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True for points with no reported neighbors (unresolved points, or
    /// degenerate inputs such as exact duplicates).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }
}
