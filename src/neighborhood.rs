//! 1-swap neighborhood search: replace one selected column with the best alternative.

use crate::rng::{shuffle_slice, RandomSource};
use crate::select::pick_greedy_max;
use crate::solution::CoverageSolution;

/// What a single improvement pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Swaps that replaced a column with a different one and were kept.
    pub swaps_kept: usize,
    /// Kept swaps that strictly increased coverage.
    pub improvements: usize,
}

/// Runs one first-improvement pass of 1-swap local search.
///
/// The selected columns are visited once each, in an order shuffled up front. For
/// each column `c1`: remove it, add the max-gain column `c2`, and revert the swap
/// if coverage dropped. Swaps that keep coverage level are accepted, which lets the
/// pass drift across plateaus; the accepted coverage becomes the new baseline.
pub fn improve<R: RandomSource + ?Sized>(
    solution: &mut CoverageSolution<'_>,
    rng: &mut R,
) -> PassSummary {
    let mut order = solution.selected_columns().to_vec();
    shuffle_slice(rng, &mut order);

    let mut summary = PassSummary::default();
    let mut baseline = solution.covered_rows();

    for c1 in order {
        debug_assert!(solution.is_selected(c1), "column {c1} left the selection mid-pass");
        solution.remove(c1);
        let c2 = pick_greedy_max(solution, rng);
        solution.add(c2);
        let after = solution.covered_rows();

        if after < baseline {
            solution.remove(c2);
            solution.add(c1);
            debug_assert_eq!(solution.covered_rows(), baseline);
            continue;
        }

        if c2 != c1 {
            summary.swaps_kept += 1;
            if after > baseline {
                summary.improvements += 1;
            }
            tracing::trace!(removed = c1, added = c2, covered = after, "swap kept");
        }
        baseline = after;
    }

    summary
}

/// Repeats [`improve`] until a pass yields no strict improvement, or `max_passes`
/// passes have run. Returns the number of passes run.
pub fn improve_until_stable<R: RandomSource + ?Sized>(
    solution: &mut CoverageSolution<'_>,
    rng: &mut R,
    max_passes: usize,
) -> usize {
    for pass in 1..=max_passes {
        let summary = improve(solution, rng);
        tracing::trace!(
            pass,
            swaps = summary.swaps_kept,
            improvements = summary.improvements,
            covered = solution.covered_rows(),
            "improvement pass"
        );
        if summary.improvements == 0 {
            return pass;
        }
    }
    max_passes
}

// ============================================================================
// Tests
// ============================================================================
