//! Voronoi-face neighbors for 3D point clouds in the unit cube.
//!
//! For every input point this crate computes the set of points whose
//! Voronoi cells share a face with its own cell (its "direct neighbors",
//! i.e. its Delaunay links), without ever materializing the global diagram.
//! Each cell is built independently from the point's k nearest neighbors by
//! half-space clipping in a fixed-size scratch window, which keeps memory
//! bounded and makes the per-point work embarrassingly parallel.
//!
//! Points with too few candidates or too little scratch are retried with
//! doubled budgets; anything still failing is reported in the output
//! diagnostics rather than aborting the run.
//!
//! # Example
//!
//! ```
//! use r3_voronoi::compute;
//!
//! let points = vec![
//!     [0.3f32, 0.3, 0.3],
//!     [0.7, 0.3, 0.3],
//!     [0.5, 0.7, 0.3],
//!     [0.5, 0.5, 0.7],
//! ];
//!
//! let output = compute(&points).expect("valid input");
//! assert_eq!(output.neighbors.num_points(), 4);
//! // Four points in general position: everyone neighbors everyone.
//! assert!(output.neighbors.iter().all(|v| v.len() == 3));
//! assert!(output.diagnostics.is_clean());
//! ```

mod cell;
mod dispatch;
mod error;
mod grid;
mod knn;
mod neighbors;
mod types;
pub mod validation;

pub use error::VoronoiError;
pub use neighbors::{NeighborList, NeighborsView};
pub use types::{Point3, Point3Like};

use glam::Vec3;

/// Which execution schedule runs the per-point kernels.
///
/// Both schedules run the same kernel code over windowed scratch and
/// produce bit-identical results; they differ only in how scratch is
/// allocated and work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// One task per point on the thread pool, private scratch per worker.
    #[default]
    HostPool,
    /// Accelerator-style schedule: groups of `gpu_ndsize` lanes sharing
    /// flat scratch buffers, each lane owning a disjoint offset window.
    WorkGroups,
}

/// Configuration for neighbor computation.
///
/// The defaults follow the reference parameters: `k` starts at
/// `min(64, n - 1)`, scratch capacities at 128, recompute on, chunking
/// off.
#[derive(Debug, Clone)]
pub struct VoronoiConfig {
    /// Nearest-neighbor candidates per point; 0 picks the default.
    /// Must be less than the number of points otherwise.
    pub k: usize,
    /// Cells per axis of the search grid; 0 derives it from point density.
    pub grid_resolution: usize,
    /// Execution schedule.
    pub execution: Execution,
    /// Worker threads for the host pool; 0 uses the global rayon pool.
    pub cpu_nthreads: usize,
    /// Lanes per work group under `Execution::WorkGroups`.
    pub gpu_ndsize: usize,
    /// Process points in fixed-size chunks to bound staging memory.
    pub use_chunking: bool,
    /// Chunk length when `use_chunking` is set; 0 disables chunking.
    pub chunksize: usize,
    /// Retry failed points with doubled budgets.
    pub use_recompute: bool,
    /// Plane-buffer capacity per point (also bounds a cell's neighbor
    /// count).
    pub p_maxsize: usize,
    /// Vertex-triple buffer capacity per point.
    pub t_maxsize: usize,
    /// Maximum number of retry rounds.
    pub max_retries: usize,
    /// Hard cap for the retried scratch capacities.
    pub scratch_ceiling: usize,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self {
            k: 0,
            grid_resolution: 0,
            execution: Execution::HostPool,
            cpu_nthreads: 0,
            gpu_ndsize: 32,
            use_chunking: false,
            chunksize: 0,
            use_recompute: true,
            p_maxsize: 128,
            t_maxsize: 128,
            max_retries: 8,
            scratch_ceiling: 4096,
        }
    }
}

/// Why a point ended up without a neighbor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The candidate set ran out before the cell was finished and retries
    /// were disabled or could not grow k any further.
    CandidatesExhausted,
    /// A scratch buffer overflowed at its ceiling capacity.
    ScratchOverflow,
    /// A boundary slot would have needed two outgoing edges.
    NonManifoldRing,
    /// The deleted region's boundary never closed into one cycle.
    RingNonClosure,
    /// The retry budget was exhausted before the point resolved.
    RetryLimit,
}

/// A point whose cell could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedPoint {
    /// Input index of the point.
    pub index: usize,
    pub reason: UnresolvedReason,
}

/// Diagnostic information from a computation run.
#[derive(Debug, Clone, Default)]
pub struct VoronoiDiagnostics {
    /// Points without a neighbor list, in input order.
    pub unresolved: Vec<UnresolvedPoint>,
    /// Retry rounds that actually ran.
    pub retry_rounds: usize,
    /// k after the last round.
    pub final_k: usize,
    /// Plane capacity after the last round.
    pub final_p_maxsize: usize,
    /// Triple capacity after the last round.
    pub final_t_maxsize: usize,
}

impl VoronoiDiagnostics {
    /// True if every point got a neighbor list.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Output of a computation run.
#[derive(Debug, Clone)]
pub struct VoronoiOutput {
    /// Per-point neighbor lists, in input order.
    pub neighbors: NeighborList,
    /// What happened along the way.
    pub diagnostics: VoronoiDiagnostics,
}

/// Compute Voronoi-face neighbors with default settings.
///
/// Errors are reserved for invalid input or configuration; per-point
/// failures surface through [`VoronoiOutput::diagnostics`].
pub fn compute<P: Point3Like>(points: &[P]) -> Result<VoronoiOutput, VoronoiError> {
    compute_with(points, &VoronoiConfig::default())
}

/// Compute Voronoi-face neighbors with explicit configuration.
pub fn compute_with<P: Point3Like>(
    points: &[P],
    config: &VoronoiConfig,
) -> Result<VoronoiOutput, VoronoiError> {
    if points.len() < 2 {
        return Err(VoronoiError::InsufficientPoints(points.len()));
    }

    let vec3_points: Vec<Vec3> = points
        .iter()
        .map(|p| Vec3::new(p.x(), p.y(), p.z()))
        .collect();

    let (neighbors, diagnostics) = dispatch::tessellate(&vec3_points, config)?;
    Ok(VoronoiOutput {
        neighbors,
        diagnostics,
    })
}
