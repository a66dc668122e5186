//! Error types for Voronoi neighbor computation.

use std::fmt;

/// Errors that can occur during neighbor computation.
///
/// These cover invalid inputs and configuration only. Per-point topology
/// faults and scratch overflows are recoverable and surface through
/// [`VoronoiDiagnostics`](crate::VoronoiDiagnostics), never through `Err`.
#[derive(Debug, Clone)]
pub enum VoronoiError {
    /// Not enough points: a point needs at least one other point to have
    /// a neighbor, so the minimum input size is 2.
    InsufficientPoints(usize),

    /// Grid resolution must be at least 1 cell per axis.
    InvalidGridResolution(usize),

    /// Requested k exceeds the number of other points (k must be < n).
    InvalidK { k: usize, num_points: usize },

    /// A scratch capacity (`p_maxsize` or `t_maxsize`) was zero.
    ZeroScratchCapacity,

    /// Work-group size must be at least 1 when work-group execution is
    /// selected.
    InvalidWorkGroupSize,

    /// Internal computation failure (e.g. a thread pool could not be built).
    ComputationFailed(String),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::InsufficientPoints(n) => {
                write!(f, "insufficient points: need at least 2, got {}", n)
            }
            VoronoiError::InvalidGridResolution(res) => {
                write!(f, "invalid grid resolution: {} (must be >= 1)", res)
            }
            VoronoiError::InvalidK { k, num_points } => {
                write!(
                    f,
                    "invalid k: {} (must be < number of points, {})",
                    k, num_points
                )
            }
            VoronoiError::ZeroScratchCapacity => {
                write!(f, "scratch capacities p_maxsize and t_maxsize must be >= 1")
            }
            VoronoiError::InvalidWorkGroupSize => {
                write!(f, "work-group size must be >= 1")
            }
            VoronoiError::ComputationFailed(msg) => {
                write!(f, "computation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for VoronoiError {}
