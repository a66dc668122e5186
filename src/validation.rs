//! Combinatorial validation for computed neighbor lists.
//!
//! Provides post-hoc checks over a [`VoronoiOutput`]: self references,
//! duplicate entries, symmetry of the neighbor relation, and a containment
//! check against externally computed reference lists. Useful for debugging,
//! testing, and catching numerical issues.

use crate::VoronoiOutput;
use rustc_hash::FxHashSet;

/// Detailed validation report for a neighbor computation.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Number of input points.
    pub num_points: usize,
    /// Number of points without a neighbor list.
    pub num_unresolved: usize,
    /// Total neighbor entries over all points.
    pub total_entries: usize,

    /// Points listing themselves as a neighbor.
    pub self_references: usize,
    /// Points listing some neighbor more than once.
    pub points_with_duplicates: usize,
    /// Entries referencing an index outside the input.
    pub out_of_range_entries: usize,

    /// Directed entries `i -> j` where `j -> i` is missing.
    ///
    /// The exact neighbor relation is symmetric, but the engine may
    /// over-report: a candidate whose bisector grazes the cell shows up on
    /// one side only. Asymmetry is therefore informational, not an error.
    pub asymmetric_entries: usize,

    /// Largest single neighbor list.
    pub max_degree: usize,
}

impl ValidationReport {
    /// Check structural soundness. Asymmetric entries and unresolved
    /// points are reported but do not fail this check.
    pub fn is_sound(&self) -> bool {
        self.self_references == 0
            && self.points_with_duplicates == 0
            && self.out_of_range_entries == 0
    }

    /// Format a summary of any issues found.
    pub fn summary(&self) -> String {
        let mut issues = Vec::new();
        if self.self_references > 0 {
            issues.push(format!("{} self references", self.self_references));
        }
        if self.points_with_duplicates > 0 {
            issues.push(format!(
                "{} points with duplicate entries",
                self.points_with_duplicates
            ));
        }
        if self.out_of_range_entries > 0 {
            issues.push(format!(
                "{} out-of-range entries",
                self.out_of_range_entries
            ));
        }
        if self.num_unresolved > 0 {
            issues.push(format!("{} unresolved points", self.num_unresolved));
        }
        if self.asymmetric_entries > 0 {
            issues.push(format!(
                "{} asymmetric entries",
                self.asymmetric_entries
            ));
        }
        if issues.is_empty() {
            "Sound".to_string()
        } else {
            issues.join(", ")
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ValidationReport {{ n={}, entries={}, {} }}",
            self.num_points,
            self.total_entries,
            self.summary()
        )
    }
}

/// Validate a computed output.
pub fn validate(output: &VoronoiOutput) -> ValidationReport {
    let list = &output.neighbors;
    let n = list.num_points();

    let mut self_references = 0usize;
    let mut points_with_duplicates = 0usize;
    let mut out_of_range_entries = 0usize;
    let mut max_degree = 0usize;

    let mut pairs: FxHashSet<(u32, u32)> = FxHashSet::default();
    let mut seen: FxHashSet<u32> = FxHashSet::default();

    for view in list.iter() {
        let i = view.point_index as u32;
        max_degree = max_degree.max(view.len());

        seen.clear();
        let mut has_duplicate = false;
        for &j in view.ids {
            if j == i {
                self_references += 1;
            }
            if j as usize >= n {
                out_of_range_entries += 1;
                continue;
            }
            if !seen.insert(j) {
                has_duplicate = true;
            }
            pairs.insert((i, j));
        }
        if has_duplicate {
            points_with_duplicates += 1;
        }
    }

    let asymmetric_entries = pairs
        .iter()
        .filter(|&&(i, j)| !pairs.contains(&(j, i)))
        .count();

    ValidationReport {
        num_points: n,
        num_unresolved: output.diagnostics.unresolved.len(),
        total_entries: list.num_entries(),
        self_references,
        points_with_duplicates,
        out_of_range_entries,
        asymmetric_entries,
        max_degree,
    }
}

/// True if the reported neighbors of `index` contain every id in
/// `reference`.
///
/// The engine guarantees a superset of the exact face neighbors, so a
/// reference list from an exact oracle must always be contained.
pub fn contains_reference(output: &VoronoiOutput, index: usize, reference: &[u32]) -> bool {
    let reported: FxHashSet<u32> = output.neighbors.neighbors(index).iter().copied().collect();
    reference.iter().all(|id| reported.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NeighborList, VoronoiDiagnostics};

    fn output_from(offsets: Vec<u32>, ids: Vec<u32>) -> VoronoiOutput {
        VoronoiOutput {
            neighbors: NeighborList::from_parts(offsets, ids),
            diagnostics: VoronoiDiagnostics::default(),
        }
    }

    #[test]
    fn test_sound_symmetric_output() {
        // 0 <-> 1, 0 <-> 2
        let out = output_from(vec![0, 2, 3, 4], vec![1, 2, 0, 0]);
        let report = validate(&out);
        assert!(report.is_sound());
        assert_eq!(report.asymmetric_entries, 0);
        assert_eq!(report.max_degree, 2);
        assert_eq!(report.summary(), "Sound");
    }

    #[test]
    fn test_detects_self_and_duplicates() {
        let out = output_from(vec![0, 3, 4], vec![0, 1, 1, 0]);
        let report = validate(&out);
        assert!(!report.is_sound());
        assert_eq!(report.self_references, 1);
        assert_eq!(report.points_with_duplicates, 1);
    }

    #[test]
    fn test_counts_asymmetry() {
        // 0 -> 1 reported, 1 -> 0 missing.
        let out = output_from(vec![0, 1, 1], vec![1]);
        let report = validate(&out);
        assert!(report.is_sound());
        assert_eq!(report.asymmetric_entries, 1);
    }

    #[test]
    fn test_contains_reference() {
        let out = output_from(vec![0, 3], vec![1, 2, 3]);
        assert!(contains_reference(&out, 0, &[1, 3]));
        assert!(!contains_reference(&out, 0, &[4]));
    }
}
