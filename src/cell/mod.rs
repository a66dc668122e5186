//! Per-point convex cell construction in dual form.
//!
//! Each point's Voronoi cell starts as the unit cube and is clipped by the
//! perpendicular bisector to each kNN candidate, consumed in ascending
//! `(dist^2, id)` order. The cell is held in dual form: a buffer of planes
//! and a buffer of vertex triples (each triple names the three planes whose
//! intersection is a cell vertex). Triples are kept positively oriented
//! (`det[n_a, n_b, n_c] > 0`), which makes the directed edges of a deleted
//! region cancel pairwise and leaves exactly its boundary cycle.
//!
//! Clipping a plane deletes the out-side triples, reconstructs the boundary
//! cycle of the hole, and fans fresh triples `(new_plane, a, next[a])`
//! around it. Consumption stops early once the next candidate is farther
//! than twice the current largest vertex distance (no farther point can
//! still cut the cell).
//!
//! All scratch lives in caller-provided windows so the same code runs per
//! worker thread on the host pool and per lane inside work-group buffers.

pub(crate) mod boundary;
pub(crate) mod planes;

use self::boundary::{BoundaryFault, LINK_SENTINEL};
use crate::grid::GridIndex;
use glam::{Vec3, Vec4};

/// Owner marker for the six box planes (not a candidate).
pub(crate) const NO_OWNER: u32 = u32::MAX;

/// Number of bounding-box planes every cell starts with.
pub(crate) const BOX_PLANES: usize = 6;

/// Unit-cube half-spaces, inside given by `n . x + d < 0`.
/// Order: x-, x+, y-, y+, z-, z+.
const CUBE_PLANES: [Vec4; 6] = [
    Vec4::new(-1.0, 0.0, 0.0, 0.0),
    Vec4::new(1.0, 0.0, 0.0, -1.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, -1.0),
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, -1.0),
];

/// The cube's eight corners as positively oriented plane triples.
const CUBE_TRIS: [[u32; 3]; 8] = [
    [0, 4, 2],
    [0, 2, 5],
    [0, 3, 4],
    [0, 5, 3],
    [1, 2, 4],
    [1, 5, 2],
    [1, 4, 3],
    [1, 3, 5],
];

/// Per-point recoverable failures. The dispatcher retries these with a
/// larger k and/or larger scratch capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellFault {
    /// Candidates ran out before the security radius was reached.
    CandidatesExhausted,
    /// The plane buffer is full.
    PlaneOverflow,
    /// The triple buffer is full.
    TripleOverflow,
    /// A boundary slot would receive two outgoing edges.
    NonManifoldRing,
    /// The deleted region's boundary did not close into one cycle.
    RingNonClosure,
}

impl From<BoundaryFault> for CellFault {
    fn from(fault: BoundaryFault) -> Self {
        match fault {
            BoundaryFault::NonManifold => CellFault::NonManifoldRing,
            BoundaryFault::Open | BoundaryFault::Overflow => CellFault::RingNonClosure,
        }
    }
}

/// Scratch windows for one cell. `planes`, `owners`, `ring` and `out` have
/// `p_maxsize` entries; `tris` has `3 * t_maxsize`.
pub(crate) struct CellScratch<'a> {
    pub planes: &'a mut [Vec4],
    pub owners: &'a mut [u32],
    pub tris: &'a mut [u32],
    pub ring: &'a mut [u32],
    pub out: &'a mut [u32],
}

/// Build the cell of the point at `slot` against the given candidates
/// (sorted ascending by `(dist^2, id)`, as produced by `knn::search`).
///
/// On success, `scratch.out` holds the neighbor slot ids (candidates whose
/// bisector still carries at least one cell vertex); returns their count.
pub(crate) fn compute_cell(
    grid: &GridIndex,
    slot: usize,
    knn_ids: &[u32],
    s: &mut CellScratch<'_>,
) -> Result<usize, CellFault> {
    let p_maxsize = s.planes.len();
    let t_maxsize = s.tris.len() / 3;
    if p_maxsize < BOX_PLANES + 1 {
        return Err(CellFault::PlaneOverflow);
    }
    if t_maxsize < CUBE_TRIS.len() {
        return Err(CellFault::TripleOverflow);
    }

    s.planes[..BOX_PLANES].copy_from_slice(&CUBE_PLANES);
    s.owners[..p_maxsize].fill(NO_OWNER);
    for (ti, tri) in CUBE_TRIS.iter().enumerate() {
        s.tris[3 * ti..3 * ti + 3].copy_from_slice(tri);
    }
    s.ring[..p_maxsize].fill(LINK_SENTINEL);

    let mut p_count = BOX_PLANES;
    let mut t_count = CUBE_TRIS.len();

    let p = grid.point(slot);
    let mut security_reached = false;

    for &cand in knn_ids {
        let q = grid.point(cand as usize);
        let d2 = (q - p).length_squared();

        if let Some(r2) = max_vertex_dist_sq(s.planes, s.tris, t_count, p) {
            if d2 > 4.0 * r2 {
                security_reached = true;
                break;
            }
        }

        let plane = planes::bisect(p, q);

        // Partition triples: in-side to the front, deleted to the tail.
        let mut i = 0usize;
        let mut j = t_count;
        while i < j {
            if planes::is_outside(plane, tri_vertex(s.planes, s.tris, i)) {
                j -= 1;
                for e in 0..3 {
                    s.tris.swap(3 * i + e, 3 * j + e);
                }
            } else {
                i += 1;
            }
        }
        let live = i;
        let deleted = t_count - live;

        if deleted == 0 {
            // Plane does not cut the cell; candidate is not a neighbor.
            continue;
        }
        if deleted == t_count {
            // A bisector can never swallow the whole cell of its own
            // point; this is numerical breakdown.
            return Err(CellFault::RingNonClosure);
        }
        if p_count == p_maxsize {
            return Err(CellFault::PlaneOverflow);
        }

        let head = boundary::compute(s.ring, 0, p_maxsize, s.tris, 3 * live, deleted)?;

        s.planes[p_count] = plane;
        s.owners[p_count] = cand;
        let new_slot = p_count as u32;

        // Fan fresh triples around the hole, reusing the deleted tail.
        let mut w = live;
        let mut a = head;
        loop {
            let b = s.ring[a] as usize;
            if w == t_maxsize {
                return Err(CellFault::TripleOverflow);
            }
            s.tris[3 * w] = new_slot;
            s.tris[3 * w + 1] = a as u32;
            s.tris[3 * w + 2] = b as u32;
            w += 1;
            s.ring[a] = LINK_SENTINEL;
            a = b;
            if a == head {
                break;
            }
        }
        t_count = w;
        p_count += 1;
    }

    if !security_reached && knn_ids.len() + 1 < grid.num_points() {
        // More unseen points could still cut this cell.
        return Err(CellFault::CandidatesExhausted);
    }

    // A plane is a neighbor face iff some live triple still references it.
    // The ring window doubles as the mark array here.
    for t in 0..3 * t_count {
        s.ring[s.tris[t] as usize] = 1;
    }
    let mut count = 0usize;
    for ps in BOX_PLANES..p_count {
        if s.ring[ps] == 1 {
            s.out[count] = s.owners[ps];
            count += 1;
        }
    }
    Ok(count)
}

/// Homogeneous position of the vertex stored as triple `ti`.
#[inline]
fn tri_vertex(planes: &[Vec4], tris: &[u32], ti: usize) -> Vec4 {
    planes::intersect(
        planes[tris[3 * ti] as usize],
        planes[tris[3 * ti + 1] as usize],
        planes[tris[3 * ti + 2] as usize],
    )
}

/// Squared distance from `p` to the farthest current cell vertex, or `None`
/// if any vertex is unbounded or non-finite (the security check then never
/// fires and every candidate gets consumed).
fn max_vertex_dist_sq(planes: &[Vec4], tris: &[u32], t_count: usize, p: Vec3) -> Option<f32> {
    let mut max = 0.0f32;
    for ti in 0..t_count {
        let v = tri_vertex(planes, tris, ti);
        if v.w == 0.0 {
            return None;
        }
        let pos = v.truncate() / v.w;
        if !pos.is_finite() {
            return None;
        }
        max = max.max((pos - p).length_squared());
    }
    Some(max)
}
