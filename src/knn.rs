//! k-nearest-neighbor search over the grid index.
//!
//! The search keeps its working set in a caller-provided window of two flat
//! buffers (`heap_ids` / `heap_dists`) starting at offset `h0`. The window
//! holds a bounded max-heap of the k best candidates seen so far, keyed by
//! `(dist^2, id)` so equal distances resolve to the lower slot id. Keeping
//! the heap in flat windowed storage lets many lanes share one allocation
//! in the work-group execution path.
//!
//! Cells are scanned in expanding Chebyshev shells around the query's home
//! cell. After finishing a shell the search stops once the heap is full and
//! the worst retained distance is within the nearest still-unscanned shell
//! boundary, or once the shells cover the whole grid.

use crate::grid::GridIndex;
use glam::Vec3;

/// Empty heap slot marker.
pub(crate) const ID_SENTINEL: u32 = u32::MAX;

/// Find up to `k` nearest neighbors of the point at `query_slot`.
///
/// On return the window `[h0, h0 + k)` holds the results sorted ascending
/// by `(dist^2, id)`; unused tail slots stay at their sentinel values. The
/// query point itself is excluded. Returns the number of neighbors found,
/// `min(k, n - 1)`.
pub(crate) fn search(
    grid: &GridIndex,
    query_slot: usize,
    k: usize,
    heap_ids: &mut [u32],
    heap_dists: &mut [f32],
    h0: usize,
) -> usize {
    for i in 0..k {
        heap_ids[h0 + i] = ID_SENTINEL;
        heap_dists[h0 + i] = f32::INFINITY;
    }
    if k == 0 {
        return 0;
    }

    let p = grid.point(query_slot);
    let res = grid.res();
    let cell_w = 1.0 / res as f32;
    let home = grid.cell_coords(p);

    // Largest shell radius that can still reach an unvisited cell.
    let r_max = [home.0, home.1, home.2]
        .iter()
        .map(|&c| c.max(res - 1 - c))
        .max()
        .unwrap_or(0);

    let mut len = 0usize;
    for r in 0..=r_max {
        for_each_shell_cell(res, home, r, |cell| {
            for slot in grid.cell_range(cell) {
                if slot == query_slot {
                    continue;
                }
                let d2 = (grid.point(slot) - p).length_squared();
                heap_insert(heap_ids, heap_dists, h0, &mut len, k, slot as u32, d2);
            }
        });

        match open_face_distance(p, home, r, res, cell_w) {
            // Scanned box covers the grid.
            None => break,
            Some(d) => {
                if len == k && heap_dists[h0] <= d * d {
                    break;
                }
            }
        }
    }

    heap_sort(heap_ids, heap_dists, h0, len);
    len
}

/// Visit every in-grid cell at exact Chebyshev distance `r` from `home`.
///
/// The shell is walked as six box faces with interior ranges shrunk so no
/// cell is visited twice.
fn for_each_shell_cell(
    res: usize,
    home: (usize, usize, usize),
    r: usize,
    mut visit: impl FnMut(usize),
) {
    let resi = res as isize;
    let (cx, cy, cz) = (home.0 as isize, home.1 as isize, home.2 as isize);
    let r = r as isize;

    let in_grid = |v: isize| v >= 0 && v < resi;
    let lo = |v: isize| v.max(0);
    let hi = |v: isize| v.min(resi - 1);
    let id = |x: isize, y: isize, z: isize| ((z * resi + y) * resi + x) as usize;

    if r == 0 {
        visit(id(cx, cy, cz));
        return;
    }

    for &z in &[cz - r, cz + r] {
        if !in_grid(z) {
            continue;
        }
        for y in lo(cy - r)..=hi(cy + r) {
            for x in lo(cx - r)..=hi(cx + r) {
                visit(id(x, y, z));
            }
        }
    }
    for &y in &[cy - r, cy + r] {
        if !in_grid(y) {
            continue;
        }
        for z in lo(cz - r + 1)..=hi(cz + r - 1) {
            for x in lo(cx - r)..=hi(cx + r) {
                visit(id(x, y, z));
            }
        }
    }
    for &x in &[cx - r, cx + r] {
        if !in_grid(x) {
            continue;
        }
        for z in lo(cz - r + 1)..=hi(cz + r - 1) {
            for y in lo(cy - r + 1)..=hi(cy + r - 1) {
                visit(id(x, y, z));
            }
        }
    }
}

/// Distance from `p` to the nearest face of the scanned box that still has
/// grid cells beyond it. `None` once the box covers the whole grid.
fn open_face_distance(
    p: Vec3,
    home: (usize, usize, usize),
    r: usize,
    res: usize,
    cell_w: f32,
) -> Option<f32> {
    let mut best = f32::INFINITY;
    let mut any_open = false;
    let coords = [p.x, p.y, p.z];
    let cells = [home.0, home.1, home.2];
    for axis in 0..3 {
        let c = cells[axis] as isize;
        let v = coords[axis];
        let lo = c - r as isize;
        let hi = c + r as isize;
        if lo > 0 {
            any_open = true;
            best = best.min(v - lo as f32 * cell_w);
        }
        if (hi + 1) < res as isize {
            any_open = true;
            best = best.min((hi + 1) as f32 * cell_w - v);
        }
    }
    if any_open {
        // Clamped home cells can make this negative for out-of-cube
        // queries; a zero bound just keeps the search going.
        Some(best.max(0.0))
    } else {
        None
    }
}

// --- bounded max-heap over the window, keyed by (dist^2, id) ---

#[inline]
fn heap_greater(d_a: f32, id_a: u32, d_b: f32, id_b: u32) -> bool {
    d_a > d_b || (d_a == d_b && id_a > id_b)
}

fn sift_up(ids: &mut [u32], dists: &mut [f32], h0: usize, mut i: usize) {
    while i > 0 {
        let parent = (i - 1) / 2;
        if heap_greater(dists[h0 + i], ids[h0 + i], dists[h0 + parent], ids[h0 + parent]) {
            ids.swap(h0 + i, h0 + parent);
            dists.swap(h0 + i, h0 + parent);
            i = parent;
        } else {
            break;
        }
    }
}

fn sift_down(ids: &mut [u32], dists: &mut [f32], h0: usize, mut i: usize, len: usize) {
    loop {
        let mut largest = i;
        for child in [2 * i + 1, 2 * i + 2] {
            if child < len
                && heap_greater(
                    dists[h0 + child],
                    ids[h0 + child],
                    dists[h0 + largest],
                    ids[h0 + largest],
                )
            {
                largest = child;
            }
        }
        if largest == i {
            break;
        }
        ids.swap(h0 + i, h0 + largest);
        dists.swap(h0 + i, h0 + largest);
        i = largest;
    }
}

fn heap_insert(
    ids: &mut [u32],
    dists: &mut [f32],
    h0: usize,
    len: &mut usize,
    k: usize,
    id: u32,
    d2: f32,
) {
    if *len < k {
        ids[h0 + *len] = id;
        dists[h0 + *len] = d2;
        *len += 1;
        sift_up(ids, dists, h0, *len - 1);
    } else if heap_greater(dists[h0], ids[h0], d2, id) {
        ids[h0] = id;
        dists[h0] = d2;
        sift_down(ids, dists, h0, 0, k);
    }
}

/// In-place heapsort of the first `len` window entries, ascending.
fn heap_sort(ids: &mut [u32], dists: &mut [f32], h0: usize, len: usize) {
    for end in (1..len).rev() {
        ids.swap(h0, h0 + end);
        dists.swap(h0, h0 + end);
        sift_down(ids, dists, h0, 0, end);
    }
}
