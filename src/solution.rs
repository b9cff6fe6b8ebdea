//! Incremental coverage state for a selection of at most `K` columns.

use crate::instance::ProblemInstance;
use thiserror::Error;

// ============================================================================
// CoverageSolution
// ============================================================================

/// A selection of at most `k` columns with incrementally maintained coverage.
///
/// Representation:
/// - `selected[c]` flags membership; `ordered` lists the members in ascending order.
/// - `covered[r]` counts the selected columns containing row `r`.
/// - `score[c]` is, for a **non-selected** column, its marginal gain: the number of
///   rows in `c` with `covered[r] == 0`. For a **selected** column it is its removal
///   loss: the number of rows in `c` with `covered[r] == 1` (rows only `c` covers).
/// - `covered_rows` counts rows with `covered[r] >= 1`; this is the objective.
///
/// Scores change only when a row's count moves between 0, 1 and 2, so [`add`] and
/// [`remove`] run in `O(Σ_{r ∈ c} deg(r))` rather than recomputing every score.
///
/// [`add`]: CoverageSolution::add
/// [`remove`]: CoverageSolution::remove
#[derive(Clone, Debug)]
pub struct CoverageSolution<'a> {
    instance: &'a ProblemInstance,
    k: usize,
    selected: Vec<bool>,
    ordered: Vec<usize>,
    covered: Vec<u32>,
    score: Vec<usize>,
    covered_rows: usize,
}

impl<'a> CoverageSolution<'a> {
    /// Creates an empty selection of capacity `k` over `instance`.
    ///
    /// # Panics
    /// Panics if `k` exceeds the number of columns.
    pub fn new(instance: &'a ProblemInstance, k: usize) -> Self {
        Self::try_new(instance, k).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Creates an empty selection of capacity `k` over `instance`.
    ///
    /// # Errors
    /// Returns [`SolutionError::CapacityTooLarge`] if `k` exceeds the number of columns.
    pub fn try_new(instance: &'a ProblemInstance, k: usize) -> Result<Self, SolutionError> {
        let num_columns = instance.num_columns();
        if k > num_columns {
            return Err(SolutionError::CapacityTooLarge { k, num_columns });
        }
        let mut solution = Self {
            instance,
            k,
            selected: vec![false; num_columns],
            ordered: Vec::with_capacity(k),
            covered: vec![0; instance.num_rows()],
            score: vec![0; num_columns],
            covered_rows: 0,
        };
        solution.initialize();
        Ok(solution)
    }

    /// Resets to the empty selection. Every column's score becomes its degree.
    pub fn initialize(&mut self) {
        self.selected.fill(false);
        self.ordered.clear();
        self.covered.fill(0);
        self.covered_rows = 0;
        for (c, score) in self.score.iter_mut().enumerate() {
            *score = self.instance.col_entries(c).len();
        }
    }

    /// Overwrites `self` with a deep copy of `other`, reusing allocations.
    ///
    /// # Panics
    /// Panics if the two solutions were built over different instances or capacities.
    pub fn copy_from(&mut self, other: &CoverageSolution<'a>) {
        assert!(
            std::ptr::eq(self.instance, other.instance) && self.k == other.k,
            "copy_from requires solutions over the same instance and K"
        );
        self.selected.clone_from(&other.selected);
        self.ordered.clone_from(&other.ordered);
        self.covered.clone_from(&other.covered);
        self.score.clone_from(&other.score);
        self.covered_rows = other.covered_rows;
    }

    /// The instance this solution is built over.
    #[inline(always)]
    pub fn instance(&self) -> &'a ProblemInstance {
        self.instance
    }

    /// Target number of selected columns.
    #[inline(always)]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of currently selected columns.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true if no column is selected.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns true once `k` columns are selected.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.ordered.len() == self.k
    }

    /// Number of rows covered at least once (the objective value).
    #[inline(always)]
    pub fn covered_rows(&self) -> usize {
        self.covered_rows
    }

    /// Returns whether column `c` is selected.
    #[inline(always)]
    pub fn is_selected(&self, c: usize) -> bool {
        self.selected[c]
    }

    /// Number of selected columns containing row `r`.
    #[inline(always)]
    pub fn coverage(&self, r: usize) -> u32 {
        self.covered[r]
    }

    /// Raw score of column `c`: gain if not selected, removal loss if selected.
    #[inline(always)]
    pub fn score(&self, c: usize) -> usize {
        self.score[c]
    }

    /// Rows that adding the non-selected column `c` would newly cover.
    #[inline]
    pub fn gain(&self, c: usize) -> usize {
        debug_assert!(!self.selected[c], "gain() of selected column {c}");
        self.score[c]
    }

    /// Rows that removing the selected column `c` would uncover.
    #[inline]
    pub fn loss(&self, c: usize) -> usize {
        debug_assert!(self.selected[c], "loss() of non-selected column {c}");
        self.score[c]
    }

    /// Selected columns in ascending order.
    #[inline(always)]
    pub fn selected_columns(&self) -> &[usize] {
        &self.ordered
    }

    /// Fixed-width view of the selection: the `k` slots in ascending order, with
    /// unused slots filled by the sentinel `num_columns`.
    pub fn ordered_padded(&self) -> Vec<usize> {
        let sentinel = self.instance.num_columns();
        let mut out = Vec::with_capacity(self.k);
        out.extend_from_slice(&self.ordered);
        out.resize(self.k, sentinel);
        out
    }

    /// Adds column `c` and updates coverage counts and scores.
    ///
    /// # Panics
    /// Panics if `c` is out of range, already selected, or the selection is full.
    #[inline]
    pub fn add(&mut self, c: usize) {
        if let Err(e) = self.try_add(c) {
            panic!("{e}");
        }
    }

    /// Removes column `c` and updates coverage counts and scores.
    ///
    /// # Panics
    /// Panics if `c` is out of range or not selected.
    #[inline]
    pub fn remove(&mut self, c: usize) {
        if let Err(e) = self.try_remove(c) {
            panic!("{e}");
        }
    }

    /// Adds column `c`, leaving the state untouched if the call is invalid.
    ///
    /// # Errors
    /// Returns an error if `c` is out of range, already selected, or the selection is full.
    pub fn try_add(&mut self, c: usize) -> Result<(), SolutionError> {
        self.check_column(c)?;
        if self.selected[c] {
            return Err(SolutionError::AlreadySelected { column: c });
        }
        if self.is_full() {
            return Err(SolutionError::SelectionFull { column: c, k: self.k });
        }

        // The gain at insertion equals the loss right after it: every row c newly
        // covers is covered only by c.
        self.selected[c] = true;
        let pos = self.ordered.partition_point(|&x| x < c);
        self.ordered.insert(pos, c);

        let instance = self.instance;
        for &r in instance.col_entries(c) {
            self.covered[r] += 1;
            match self.covered[r] {
                1 => {
                    self.covered_rows += 1;
                    // r stops contributing gain to every other column containing it.
                    for &rc in instance.row_covers(r) {
                        if rc != c {
                            self.score[rc] -= 1;
                        }
                    }
                }
                2 => {
                    // The one column that covered r alone no longer loses it on removal.
                    let other = self.sole_other_cover(r, c);
                    self.score[other] -= 1;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Removes column `c`, leaving the state untouched if the call is invalid.
    ///
    /// # Errors
    /// Returns an error if `c` is out of range or not selected.
    pub fn try_remove(&mut self, c: usize) -> Result<(), SolutionError> {
        self.check_column(c)?;
        if !self.selected[c] {
            return Err(SolutionError::NotSelected { column: c });
        }

        // The loss before removal equals the gain right after it.
        self.selected[c] = false;
        if let Ok(pos) = self.ordered.binary_search(&c) {
            self.ordered.remove(pos);
        }

        let instance = self.instance;
        for &r in instance.col_entries(c) {
            self.covered[r] -= 1;
            match self.covered[r] {
                0 => {
                    self.covered_rows -= 1;
                    for &rc in instance.row_covers(r) {
                        if rc != c {
                            self.score[rc] += 1;
                        }
                    }
                }
                1 => {
                    let other = self.sole_other_cover(r, c);
                    self.score[other] += 1;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Finds the single selected column other than `c` that covers row `r`.
    #[inline]
    fn sole_other_cover(&self, r: usize, c: usize) -> usize {
        let mut covers = self
            .instance
            .row_covers(r)
            .iter()
            .copied()
            .filter(|&rc| rc != c && self.selected[rc]);
        let other = covers
            .next()
            .unwrap_or_else(|| unreachable!("row {r} has no other selected cover"));
        debug_assert!(
            covers.next().is_none(),
            "row {r} has more than one other selected cover"
        );
        other
    }

    #[inline]
    fn check_column(&self, c: usize) -> Result<(), SolutionError> {
        let num_columns = self.instance.num_columns();
        if c >= num_columns {
            return Err(SolutionError::ColumnOutOfRange {
                column: c,
                num_columns,
            });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn recompute_for_test(&self) -> (Vec<u32>, Vec<usize>, usize) {
        let mut covered = vec![0u32; self.instance.num_rows()];
        for &c in &self.ordered {
            for &r in self.instance.col_entries(c) {
                covered[r] += 1;
            }
        }
        let score = (0..self.instance.num_columns())
            .map(|c| {
                let target = if self.selected[c] { 1 } else { 0 };
                self.instance
                    .col_entries(c)
                    .iter()
                    .filter(|&&r| covered[r] == target)
                    .count()
            })
            .collect();
        let covered_rows = covered.iter().filter(|&&n| n > 0).count();
        (covered, score, covered_rows)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Contract violations on a [`CoverageSolution`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SolutionError {
    /// `k` exceeds the number of columns.
    #[error("cannot select {k} columns from an instance with {num_columns} columns")]
    CapacityTooLarge {
        /// Requested capacity.
        k: usize,
        /// Number of columns in the instance.
        num_columns: usize,
    },
    /// The column index is not valid for the instance.
    #[error("column {column} is out of range (instance has {num_columns} columns)")]
    ColumnOutOfRange {
        /// Offending column.
        column: usize,
        /// Number of columns in the instance.
        num_columns: usize,
    },
    /// `add` was called for a column already in the selection.
    #[error("column {column} is already selected")]
    AlreadySelected {
        /// Offending column.
        column: usize,
    },
    /// `remove` was called for a column not in the selection.
    #[error("column {column} is not selected")]
    NotSelected {
        /// Offending column.
        column: usize,
    },
    /// `add` was called with `k` columns already selected.
    #[error("cannot add column {column}: selection already holds K={k} columns")]
    SelectionFull {
        /// Offending column.
        column: usize,
        /// Capacity of the selection.
        k: usize,
    },
}

// ============================================================================
// Tests
// ============================================================================
