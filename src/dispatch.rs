//! Chunked dispatch over the two execution schedules, plus retry control.
//!
//! Both schedules drive the same pure kernels (`knn::search`,
//! `cell::compute_cell`) over windowed scratch, so their outputs are
//! bit-identical by construction:
//!
//! - `Execution::HostPool`: one task per point on the rayon pool, each
//!   worker thread holding private single-lane scratch.
//! - `Execution::WorkGroups`: the accelerator schedule. Points are taken in
//!   groups of `gpu_ndsize`; each group shares flat scratch buffers and
//!   every lane owns a disjoint offset window inside them.
//!
//! Points whose cell construction faults (not enough candidates, scratch
//! overflow, broken boundary topology) are collected after their chunk
//! completes and retried with doubled k and doubled capacities, up to
//! `max_retries` rounds, then reported unresolved. A per-point fault never
//! aborts the run.

use crate::cell::{self, CellFault, CellScratch};
use crate::error::VoronoiError;
use crate::grid::GridIndex;
use crate::knn;
use crate::neighbors::NeighborList;
use crate::{
    Execution, UnresolvedPoint, UnresolvedReason, VoronoiConfig, VoronoiDiagnostics,
};
use glam::{Vec3, Vec4};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Starting k when the config leaves it at 0 (capped at n - 1).
const DEFAULT_K_INIT: usize = 64;

/// Target points per grid cell for the auto resolution.
const GRID_TARGET_DENSITY: f64 = 5.0;

/// Effective per-run parameters; these grow across retry rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EngineParams {
    k: usize,
    p_maxsize: usize,
    t_maxsize: usize,
}

/// Flat scratch buffers holding `lanes` disjoint windows.
struct Scratch {
    heap_ids: Vec<u32>,
    heap_dists: Vec<f32>,
    planes: Vec<Vec4>,
    owners: Vec<u32>,
    tris: Vec<u32>,
    ring: Vec<u32>,
    out: Vec<u32>,
}

impl Scratch {
    fn with_lanes(params: &EngineParams, lanes: usize) -> Self {
        Self {
            heap_ids: vec![0; lanes * params.k],
            heap_dists: vec![0.0; lanes * params.k],
            planes: vec![Vec4::ZERO; lanes * params.p_maxsize],
            owners: vec![0; lanes * params.p_maxsize],
            tris: vec![0; lanes * 3 * params.t_maxsize],
            ring: vec![0; lanes * params.p_maxsize],
            out: vec![0; lanes * params.p_maxsize],
        }
    }

    fn single(params: &EngineParams) -> Self {
        Self::with_lanes(params, 1)
    }
}

/// kNN search plus cell construction for one point, inside lane `lane` of
/// the given scratch.
fn run_lane(
    grid: &GridIndex,
    slot: usize,
    params: EngineParams,
    s: &mut Scratch,
    lane: usize,
) -> Result<Vec<u32>, CellFault> {
    let h0 = lane * params.k;
    let count = knn::search(grid, slot, params.k, &mut s.heap_ids, &mut s.heap_dists, h0);

    let p0 = lane * params.p_maxsize;
    let t0 = lane * 3 * params.t_maxsize;
    let knn_ids = &s.heap_ids[h0..h0 + count];
    let mut cs = CellScratch {
        planes: &mut s.planes[p0..p0 + params.p_maxsize],
        owners: &mut s.owners[p0..p0 + params.p_maxsize],
        tris: &mut s.tris[t0..t0 + 3 * params.t_maxsize],
        ring: &mut s.ring[p0..p0 + params.p_maxsize],
        out: &mut s.out[p0..p0 + params.p_maxsize],
    };
    let n = cell::compute_cell(grid, slot, knn_ids, &mut cs)?;
    Ok(cs.out[..n].to_vec())
}

type LaneResult = (u32, Result<Vec<u32>, CellFault>);

fn run_chunk_host(grid: &GridIndex, slots: &[u32], params: EngineParams) -> Vec<LaneResult> {
    #[cfg(feature = "parallel")]
    {
        slots
            .par_iter()
            .map_init(
                || Scratch::single(&params),
                |s, &slot| (slot, run_lane(grid, slot as usize, params, s, 0)),
            )
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut s = Scratch::single(&params);
        slots
            .iter()
            .map(|&slot| (slot, run_lane(grid, slot as usize, params, &mut s, 0)))
            .collect()
    }
}

fn run_chunk_groups(
    grid: &GridIndex,
    slots: &[u32],
    params: EngineParams,
    ndsize: usize,
) -> Vec<LaneResult> {
    let groups: Vec<&[u32]> = slots.chunks(ndsize).collect();
    let run_group = |group: &&[u32]| -> Vec<LaneResult> {
        let mut s = Scratch::with_lanes(&params, group.len());
        group
            .iter()
            .enumerate()
            .map(|(lane, &slot)| (slot, run_lane(grid, slot as usize, params, &mut s, lane)))
            .collect()
    };
    let per_group: Vec<Vec<LaneResult>> = {
        #[cfg(feature = "parallel")]
        {
            groups.par_iter().map(run_group).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            groups.iter().map(run_group).collect()
        }
    };
    per_group.into_iter().flatten().collect()
}

/// Run `slots` chunk by chunk, recording successes and collecting faults.
/// A chunk always runs to completion before its faults are inspected.
fn run_slots(
    grid: &GridIndex,
    cfg: &VoronoiConfig,
    params: EngineParams,
    chunksize: usize,
    slots: &[u32],
    results: &mut [Option<Vec<u32>>],
    failed: &mut Vec<(u32, CellFault)>,
) {
    for chunk in slots.chunks(chunksize) {
        let outcome = match cfg.execution {
            Execution::HostPool => run_chunk_host(grid, chunk, params),
            Execution::WorkGroups => run_chunk_groups(grid, chunk, params, cfg.gpu_ndsize),
        };
        for (slot, r) in outcome {
            match r {
                Ok(ids) => results[slot as usize] = Some(ids),
                Err(fault) => failed.push((slot, fault)),
            }
        }
    }
}

fn grow(params: &mut EngineParams, n: usize, ceiling: usize) -> bool {
    let next = EngineParams {
        k: (params.k * 2).min(n - 1),
        p_maxsize: (params.p_maxsize * 2).min(ceiling),
        t_maxsize: (params.t_maxsize * 2).min(ceiling),
    };
    let grown = next != *params;
    *params = next;
    grown
}

fn auto_resolution(n: usize) -> usize {
    ((n as f64 / GRID_TARGET_DENSITY).cbrt().round() as usize).max(1)
}

fn reason_of(fault: CellFault) -> UnresolvedReason {
    match fault {
        CellFault::CandidatesExhausted => UnresolvedReason::CandidatesExhausted,
        CellFault::PlaneOverflow | CellFault::TripleOverflow => UnresolvedReason::ScratchOverflow,
        CellFault::NonManifoldRing => UnresolvedReason::NonManifoldRing,
        CellFault::RingNonClosure => UnresolvedReason::RingNonClosure,
    }
}

#[cfg(feature = "parallel")]
fn run_in_pool<R: Send>(
    nthreads: usize,
    op: impl FnOnce() -> R + Send,
) -> Result<R, VoronoiError> {
    if nthreads == 0 {
        // Global rayon pool.
        return Ok(op());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(nthreads)
        .build()
        .map_err(|e| VoronoiError::ComputationFailed(e.to_string()))?;
    Ok(pool.install(op))
}

#[cfg(not(feature = "parallel"))]
fn run_in_pool<R>(nthreads: usize, op: impl FnOnce() -> R) -> Result<R, VoronoiError> {
    let _ = nthreads;
    Ok(op())
}

/// Compute neighbor lists for all points. Input length must be >= 2 (the
/// public API checks this).
pub(crate) fn tessellate(
    points: &[Vec3],
    cfg: &VoronoiConfig,
) -> Result<(NeighborList, VoronoiDiagnostics), VoronoiError> {
    let n = points.len();
    debug_assert!(n >= 2);

    if cfg.k != 0 && cfg.k >= n {
        return Err(VoronoiError::InvalidK {
            k: cfg.k,
            num_points: n,
        });
    }
    if cfg.p_maxsize == 0 || cfg.t_maxsize == 0 {
        return Err(VoronoiError::ZeroScratchCapacity);
    }
    if matches!(cfg.execution, Execution::WorkGroups) && cfg.gpu_ndsize == 0 {
        return Err(VoronoiError::InvalidWorkGroupSize);
    }

    let res = if cfg.grid_resolution == 0 {
        auto_resolution(n)
    } else {
        cfg.grid_resolution
    };
    let grid = GridIndex::build(points, res)?;

    let mut params = EngineParams {
        k: if cfg.k == 0 {
            DEFAULT_K_INIT.min(n - 1)
        } else {
            cfg.k
        },
        p_maxsize: cfg.p_maxsize,
        t_maxsize: cfg.t_maxsize,
    };
    let ceiling = cfg
        .scratch_ceiling
        .max(cfg.p_maxsize)
        .max(cfg.t_maxsize);
    let chunksize = if cfg.use_chunking && cfg.chunksize > 0 {
        cfg.chunksize
    } else {
        n
    };

    let mut results: Vec<Option<Vec<u32>>> = vec![None; n];
    let mut failed: Vec<(u32, CellFault)> = Vec::new();
    let mut rounds = 0usize;
    let mut retry_budget_exhausted = false;

    let all_slots: Vec<u32> = (0..n as u32).collect();
    run_in_pool(cfg.cpu_nthreads, || {
        run_slots(&grid, cfg, params, chunksize, &all_slots, &mut results, &mut failed);

        while !failed.is_empty() && cfg.use_recompute {
            if rounds == cfg.max_retries {
                retry_budget_exhausted = true;
                break;
            }
            if !grow(&mut params, n, ceiling) {
                // Already at k = n - 1 and the capacity ceiling.
                break;
            }
            rounds += 1;
            let retry: Vec<u32> = failed.iter().map(|&(slot, _)| slot).collect();
            failed.clear();
            run_slots(&grid, cfg, params, chunksize, &retry, &mut results, &mut failed);
        }
    })?;

    let mut unresolved: Vec<UnresolvedPoint> = failed
        .iter()
        .map(|&(slot, fault)| UnresolvedPoint {
            index: grid.slot_point(slot as usize) as usize,
            reason: if retry_budget_exhausted {
                UnresolvedReason::RetryLimit
            } else {
                reason_of(fault)
            },
        })
        .collect();
    unresolved.sort_by_key(|u| u.index);

    // Remap slots back to input order on the way out.
    let mut offsets = vec![0u32; n + 1];
    let mut ids = Vec::new();
    for index in 0..n {
        let slot = grid.point_slot(index) as usize;
        if let Some(nbrs) = &results[slot] {
            for &s2 in nbrs {
                ids.push(grid.slot_point(s2 as usize));
            }
        }
        offsets[index + 1] = ids.len() as u32;
    }

    let diagnostics = VoronoiDiagnostics {
        unresolved,
        retry_rounds: rounds,
        final_k: params.k,
        final_p_maxsize: params.p_maxsize,
        final_t_maxsize: params.t_maxsize,
    };
    Ok((NeighborList::from_parts(offsets, ids), diagnostics))
}
