//! Uniform spatial grid over the unit cube.
//!
//! The grid partitions `[0,1)^3` into `res^3` equal cells and stores the
//! points in a counting-sorted order so each cell's members occupy one
//! contiguous slot range. The caller's point slice is never mutated; the
//! grid owns the permutation (input index <-> sorted slot) and a reordered
//! structure-of-arrays copy of the coordinates for cache-friendly scans.

use crate::error::VoronoiError;
use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counting-sorted spatial index over the unit cube.
#[derive(Debug, Clone)]
pub(crate) struct GridIndex {
    res: usize,
    /// Cumulative cell population, length `res^3 + 1`. Cell `c` owns the
    /// slot range `cell_offsets[c] .. cell_offsets[c + 1]`.
    cell_offsets: Vec<u32>,
    /// Sorted slot -> original input index (a bijection with `point_slots`).
    slot_points: Vec<u32>,
    /// Original input index -> sorted slot.
    point_slots: Vec<u32>,
    // Coordinates in slot order.
    xs: Vec<f32>,
    ys: Vec<f32>,
    zs: Vec<f32>,
}

impl GridIndex {
    /// Build the index for the given points.
    ///
    /// Out-of-cube coordinates are clamped into the nearest boundary cell;
    /// they never fail the build. Fails only for `res < 1`.
    pub(crate) fn build(points: &[Vec3], res: usize) -> Result<Self, VoronoiError> {
        if res < 1 {
            return Err(VoronoiError::InvalidGridResolution(res));
        }

        let n = points.len();
        let num_cells = res * res * res;

        let point_cells: Vec<u32> = {
            #[cfg(feature = "parallel")]
            {
                points
                    .par_iter()
                    .map(|p| cell_of(*p, res) as u32)
                    .collect()
            }
            #[cfg(not(feature = "parallel"))]
            {
                points.iter().map(|p| cell_of(*p, res) as u32).collect()
            }
        };

        let mut cell_offsets = vec![0u32; num_cells + 1];
        for &c in &point_cells {
            cell_offsets[c as usize + 1] += 1;
        }
        for i in 0..num_cells {
            cell_offsets[i + 1] += cell_offsets[i];
        }

        // Stable scatter: points land in their cell range in input order.
        let mut cursor: Vec<u32> = cell_offsets[..num_cells].to_vec();
        let mut slot_points = vec![0u32; n];
        let mut point_slots = vec![0u32; n];
        for (i, &c) in point_cells.iter().enumerate() {
            let slot = cursor[c as usize];
            cursor[c as usize] += 1;
            slot_points[slot as usize] = i as u32;
            point_slots[i] = slot;
        }

        let mut xs = vec![0.0f32; n];
        let mut ys = vec![0.0f32; n];
        let mut zs = vec![0.0f32; n];
        for (slot, &i) in slot_points.iter().enumerate() {
            let p = points[i as usize];
            xs[slot] = p.x;
            ys[slot] = p.y;
            zs[slot] = p.z;
        }

        Ok(Self {
            res,
            cell_offsets,
            slot_points,
            point_slots,
            xs,
            ys,
            zs,
        })
    }

    #[inline]
    pub(crate) fn res(&self) -> usize {
        self.res
    }

    #[inline]
    pub(crate) fn num_points(&self) -> usize {
        self.slot_points.len()
    }

    /// Coordinates of the point stored at `slot`.
    #[inline]
    pub(crate) fn point(&self, slot: usize) -> Vec3 {
        Vec3::new(self.xs[slot], self.ys[slot], self.zs[slot])
    }

    /// Original input index of the point stored at `slot`.
    #[inline]
    pub(crate) fn slot_point(&self, slot: usize) -> u32 {
        self.slot_points[slot]
    }

    /// Sorted slot of the point with original input index `index`.
    #[inline]
    pub(crate) fn point_slot(&self, index: usize) -> u32 {
        self.point_slots[index]
    }

    /// Grid cell coordinates containing `p`, clamped to the grid.
    #[inline]
    pub(crate) fn cell_coords(&self, p: Vec3) -> (usize, usize, usize) {
        (
            axis_cell(p.x, self.res),
            axis_cell(p.y, self.res),
            axis_cell(p.z, self.res),
        )
    }

    /// Linear id of the cell at `(cx, cy, cz)`.
    #[inline]
    pub(crate) fn cell_id(&self, cx: usize, cy: usize, cz: usize) -> usize {
        (cz * self.res + cy) * self.res + cx
    }

    /// Slot range of the points stored in `cell`.
    #[inline]
    pub(crate) fn cell_range(&self, cell: usize) -> std::ops::Range<usize> {
        self.cell_offsets[cell] as usize..self.cell_offsets[cell + 1] as usize
    }
}

/// Cell coordinate along one axis, clamped into `[0, res)`.
#[inline]
fn axis_cell(v: f32, res: usize) -> usize {
    // `as` saturates, so NaN maps to 0 and huge values to the last cell.
    let c = (v * res as f32).floor() as isize;
    c.clamp(0, res as isize - 1) as usize
}

/// Cell id containing `p`, clamped to the grid.
#[inline]
fn cell_of(p: Vec3, res: usize) -> usize {
    let cx = axis_cell(p.x, res);
    let cy = axis_cell(p.y, res);
    let cz = axis_cell(p.z, res);
    (cz * res + cy) * res + cx
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn random_points(n: usize, seed: u64) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(0.0..1.0),
                    rng.gen_range(0.0..1.0),
                    rng.gen_range(0.0..1.0),
                )
            })
            .collect()
    }

    /// Offsets must be monotone, start at 0, and sum to n.
    fn check_offsets(grid: &GridIndex, n: usize) {
        assert_eq!(grid.cell_offsets[0], 0);
        assert_eq!(*grid.cell_offsets.last().unwrap() as usize, n);
        for w in grid.cell_offsets.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    /// slot_points and point_slots must be mutually inverse permutations.
    fn check_bijection(grid: &GridIndex, n: usize) {
        assert_eq!(grid.slot_points.len(), n);
        assert_eq!(grid.point_slots.len(), n);
        for i in 0..n {
            assert_eq!(grid.slot_point(grid.point_slot(i) as usize) as usize, i);
        }
    }

    /// Every point's slot must lie inside the range of its own cell.
    fn check_membership(grid: &GridIndex, points: &[Vec3]) {
        for (i, &p) in points.iter().enumerate() {
            let (cx, cy, cz) = grid.cell_coords(p);
            let cell = grid.cell_id(cx, cy, cz);
            let range = grid.cell_range(cell);
            let slot = grid.point_slot(i) as usize;
            assert!(range.contains(&slot));
            assert_eq!(grid.point(slot), p);
        }
    }

    #[test]
    fn test_build_rejects_zero_resolution() {
        let points = random_points(10, 1);
        assert!(matches!(
            GridIndex::build(&points, 0),
            Err(VoronoiError::InvalidGridResolution(0))
        ));
    }

    #[test]
    fn test_build_invariants() {
        for &res in &[1usize, 2, 3, 8, 16] {
            let points = random_points(200, 42);
            let grid = GridIndex::build(&points, res).unwrap();
            check_offsets(&grid, points.len());
            check_bijection(&grid, points.len());
            check_membership(&grid, &points);
        }
    }

    #[test]
    fn test_empty_input() {
        let grid = GridIndex::build(&[], 4).unwrap();
        assert_eq!(grid.num_points(), 0);
        check_offsets(&grid, 0);
    }

    #[test]
    fn test_out_of_cube_coordinates_clamp() {
        let points = vec![
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(1.5, 0.5, 0.5),
            Vec3::new(0.5, 1.0, 0.5),
            Vec3::new(f32::NAN, 0.5, 0.5),
        ];
        let grid = GridIndex::build(&points, 4).unwrap();
        check_bijection(&grid, points.len());
        check_membership(&grid, &points);

        // x = -0.5 lands in the first x-cell, x = 1.5 and x = 1.0 in the last.
        assert_eq!(grid.cell_coords(points[0]).0, 0);
        assert_eq!(grid.cell_coords(points[1]).0, 3);
        assert_eq!(grid.cell_coords(Vec3::new(1.0, 0.0, 0.0)).0, 3);
    }

    #[test]
    fn test_cells_are_contiguous_and_stable() {
        // Two points in the same cell keep their input order.
        let points = vec![
            Vec3::new(0.91, 0.1, 0.1),
            Vec3::new(0.11, 0.1, 0.1),
            Vec3::new(0.12, 0.1, 0.1),
        ];
        let grid = GridIndex::build(&points, 2).unwrap();
        let s1 = grid.point_slot(1);
        let s2 = grid.point_slot(2);
        assert_eq!(s2, s1 + 1);
    }
}
