//! Boundary-cycle reconstruction for a deleted set of oriented faces.
//!
//! When a clipping plane deletes a set of consistently oriented vertex
//! triples from the cell, the hole they leave is bounded by a single closed
//! cycle of directed edges. Each triple `(a, b, c)` contributes the edges
//! `a->b`, `b->c`, `c->a`; an edge whose reverse appears in another deleted
//! triple is interior to the deleted set and cancels. Every surviving edge
//! `u->v` is recorded as `ring[ring_offset + u] = v`, and the cycle can then
//! be walked by successor lookup starting from the returned head slot.
//!
//! The function is pure over explicit buffers and offsets so the identical
//! code serves the host path and the per-lane windows of the work-group
//! path. Slots before `ring_offset` are never touched.

/// Empty ring slot marker.
pub(crate) const LINK_SENTINEL: u32 = u32::MAX;

/// Ways boundary reconstruction can fail. All of these mark the owning
/// point for retry; none of them abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryFault {
    /// A slot would receive a second outgoing edge.
    NonManifold,
    /// The surviving edges do not form one closed cycle.
    Open,
    /// An edge endpoint falls outside the ring window.
    Overflow,
}

/// Reconstruct the boundary cycle of `tri_count` deleted triples.
///
/// The triples are read from `tris[tri_offset ..]` (three `u32` vertex ids
/// each); surviving edges are written into the window
/// `ring[ring_offset .. ring_offset + ring_size]`, which must be filled
/// with [`LINK_SENTINEL`] on entry. Returns the head slot of the cycle.
///
/// On any fault the window contents are unspecified; the caller is expected
/// to reinitialize its scratch before reuse.
pub(crate) fn compute(
    ring: &mut [u32],
    ring_offset: usize,
    ring_size: usize,
    tris: &[u32],
    tri_offset: usize,
    tri_count: usize,
) -> Result<usize, BoundaryFault> {
    let mut head: Option<usize> = None;
    let mut links = 0usize;

    for ti in 0..tri_count {
        let base = tri_offset + 3 * ti;
        let tri = [tris[base], tris[base + 1], tris[base + 2]];
        for e in 0..3 {
            let u = tri[e];
            let v = tri[(e + 1) % 3];

            // Interior edges appear reversed in exactly one other triple.
            let mut interior = false;
            'scan: for tj in 0..tri_count {
                if tj == ti {
                    continue;
                }
                let b = tri_offset + 3 * tj;
                let other = [tris[b], tris[b + 1], tris[b + 2]];
                for f in 0..3 {
                    if other[f] == v && other[(f + 1) % 3] == u {
                        interior = true;
                        break 'scan;
                    }
                }
            }
            if interior {
                continue;
            }

            let (ui, vi) = (u as usize, v as usize);
            if ui >= ring_size || vi >= ring_size {
                return Err(BoundaryFault::Overflow);
            }
            if ring[ring_offset + ui] != LINK_SENTINEL {
                return Err(BoundaryFault::NonManifold);
            }
            ring[ring_offset + ui] = v;
            links += 1;
            if head.is_none() {
                head = Some(ui);
            }
        }
    }

    let head = head.ok_or(BoundaryFault::Open)?;

    // The cycle must return to the head after visiting every link once.
    let mut cur = head;
    let mut steps = 0usize;
    loop {
        let next = ring[ring_offset + cur];
        if next == LINK_SENTINEL {
            return Err(BoundaryFault::Open);
        }
        steps += 1;
        cur = next as usize;
        if cur == head {
            break;
        }
        if steps > links {
            return Err(BoundaryFault::Open);
        }
    }
    if steps != links {
        return Err(BoundaryFault::Open);
    }

    Ok(head)
}
