//! From-scratch verification of selections and of the incremental solution state.

use crate::instance::ProblemInstance;
use crate::solution::CoverageSolution;
use thiserror::Error;

// ============================================================================
// Public API
// ============================================================================

/// Counts the rows covered by an arbitrary list of columns, without any
/// incremental bookkeeping.
///
/// # Errors
/// Returns an error if a column is out of range or listed twice.
pub fn evaluate_selection(
    instance: &ProblemInstance,
    columns: &[usize],
) -> Result<usize, ValidationError> {
    let covered = coverage_counts(instance, columns)?;
    Ok(covered.iter().filter(|&&n| n > 0).count())
}

/// Checks every piece of incremental state in `solution` against a recomputation.
///
/// Verified:
/// - the ordered selection is strictly ascending, agrees with the membership flags,
///   and holds at most `k` columns;
/// - `coverage(r)` equals the number of selected columns containing `r`;
/// - `covered_rows()` equals the number of rows with nonzero coverage;
/// - each non-selected column's score is its count of uncovered rows, and each
///   selected column's score is its count of rows covered exactly once.
///
/// # Errors
/// Returns the first discrepancy found.
pub fn check_solution(solution: &CoverageSolution<'_>) -> Result<(), ValidationError> {
    let instance = solution.instance();
    let columns = solution.selected_columns();

    if columns.len() > solution.k() {
        return Err(ValidationError::TooManyColumns {
            len: columns.len(),
            k: solution.k(),
        });
    }
    if let Some(w) = columns.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ValidationError::Unsorted {
            before: w[0],
            after: w[1],
        });
    }
    let covered = coverage_counts(instance, columns)?;

    if let Some(column) = (0..instance.num_columns())
        .find(|&c| solution.is_selected(c) != columns.binary_search(&c).is_ok())
    {
        return Err(ValidationError::MembershipMismatch { column });
    }

    for (row, &expected) in covered.iter().enumerate() {
        let got = solution.coverage(row);
        if got != expected {
            return Err(ValidationError::CoverageMismatch { row, expected, got });
        }
    }

    let expected_rows = covered.iter().filter(|&&n| n > 0).count();
    if solution.covered_rows() != expected_rows {
        return Err(ValidationError::CoveredRowsMismatch {
            expected: expected_rows,
            got: solution.covered_rows(),
        });
    }

    for column in 0..instance.num_columns() {
        let target = u32::from(solution.is_selected(column));
        let expected = instance
            .col_entries(column)
            .iter()
            .filter(|&&r| covered[r] == target)
            .count();
        let got = solution.score(column);
        if got != expected {
            return Err(ValidationError::ScoreMismatch {
                column,
                selected: solution.is_selected(column),
                expected,
                got,
            });
        }
    }

    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

/// A discrepancy between a selection and its from-scratch recomputation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A column id is not valid for the instance.
    #[error("column {column} is out of range (instance has {num_columns} columns)")]
    ColumnOutOfRange {
        /// Offending column.
        column: usize,
        /// Number of columns in the instance.
        num_columns: usize,
    },
    /// A column appears twice in the selection.
    #[error("column {column} is selected more than once")]
    DuplicateColumn {
        /// Offending column.
        column: usize,
    },
    /// More than `k` columns are selected.
    #[error("{len} columns selected but K={k}")]
    TooManyColumns {
        /// Number of selected columns.
        len: usize,
        /// Capacity of the selection.
        k: usize,
    },
    /// The ordered selection is not strictly ascending.
    #[error("ordered selection is not ascending: {before} precedes {after}")]
    Unsorted {
        /// Earlier entry.
        before: usize,
        /// Later entry.
        after: usize,
    },
    /// Membership flags disagree with the ordered selection.
    #[error("membership flag of column {column} disagrees with the ordered selection")]
    MembershipMismatch {
        /// Offending column.
        column: usize,
    },
    /// A row's coverage count is wrong.
    #[error("row {row} is covered {got} times, expected {expected}")]
    CoverageMismatch {
        /// Offending row.
        row: usize,
        /// Recomputed count.
        expected: u32,
        /// Stored count.
        got: u32,
    },
    /// The objective value is wrong.
    #[error("solution reports {got} covered rows, expected {expected}")]
    CoveredRowsMismatch {
        /// Recomputed objective.
        expected: usize,
        /// Stored objective.
        got: usize,
    },
    /// A column's score is wrong.
    #[error("column {column} (selected: {selected}) has score {got}, expected {expected}")]
    ScoreMismatch {
        /// Offending column.
        column: usize,
        /// Whether the column is selected.
        selected: bool,
        /// Recomputed score.
        expected: usize,
        /// Stored score.
        got: usize,
    },
}

// ============================================================================
// Internal
// ============================================================================

fn coverage_counts(
    instance: &ProblemInstance,
    columns: &[usize],
) -> Result<Vec<u32>, ValidationError> {
    let num_columns = instance.num_columns();
    let mut seen = vec![false; num_columns];
    let mut covered = vec![0u32; instance.num_rows()];
    for &column in columns {
        if column >= num_columns {
            return Err(ValidationError::ColumnOutOfRange {
                column,
                num_columns,
            });
        }
        if seen[column] {
            return Err(ValidationError::DuplicateColumn { column });
        }
        seen[column] = true;
        for &r in instance.col_entries(column) {
            covered[r] += 1;
        }
    }
    Ok(covered)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::{grasp_construct, greedy_construct};
    use crate::instance::parse_instance;
    use crate::neighborhood::improve;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    fn staircase() -> ProblemInstance {
        ProblemInstance::from_columns(4, &[vec![0, 1], vec![1, 2], vec![2, 3]]).unwrap()
    }

    fn sample() -> ProblemInstance {
        parse_instance(include_str!("../data/sample.txt")).unwrap()
    }

    #[test]
    fn evaluate_counts_distinct_rows() {
        let inst = staircase();
        assert_eq!(evaluate_selection(&inst, &[]), Ok(0));
        assert_eq!(evaluate_selection(&inst, &[0, 2]), Ok(4));
        assert_eq!(evaluate_selection(&inst, &[1, 0]), Ok(3));
    }

    #[test]
    fn evaluate_rejects_bad_columns() {
        let inst = staircase();
        assert_eq!(
            evaluate_selection(&inst, &[0, 3]),
            Err(ValidationError::ColumnOutOfRange {
                column: 3,
                num_columns: 3
            })
        );
        assert_eq!(
            evaluate_selection(&inst, &[2, 2]),
            Err(ValidationError::DuplicateColumn { column: 2 })
        );
    }

    #[test]
    fn random_walks_pass_the_full_check() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(0xDEC0DE);
        let mut sol = CoverageSolution::new(&inst, 7);
        check_solution(&sol).unwrap();

        for step in 0..3_000 {
            let c = rng.random_range(0..inst.num_columns());
            if sol.is_selected(c) {
                sol.remove(c);
            } else if sol.is_full() {
                let victim = sol.selected_columns()[rng.random_range(0..sol.len())];
                sol.remove(victim);
                sol.add(c);
            } else {
                sol.add(c);
            }
            if let Err(e) = check_solution(&sol) {
                panic!("step {step}: {e}");
            }
            assert_eq!(
                evaluate_selection(&inst, sol.selected_columns()),
                Ok(sol.covered_rows())
            );
        }
    }

    #[test]
    fn heuristics_leave_consistent_state() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(17);
        for k in [1, 3, 5, 9] {
            let mut sol = greedy_construct(&inst, k, &mut rng);
            check_solution(&sol).unwrap();
            improve(&mut sol, &mut rng);
            check_solution(&sol).unwrap();

            let mut sol = grasp_construct(&inst, k, 0.7, &mut rng);
            improve(&mut sol, &mut rng);
            check_solution(&sol).unwrap();
        }
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ValidationError::ScoreMismatch {
            column: 4,
            selected: true,
            expected: 2,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "column 4 (selected: true) has score 3, expected 2"
        );
    }
}
