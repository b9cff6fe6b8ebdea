//! Column selection rules used by construction and local search.
//!
//! Selectors are stateless: they read the current scores of the non-selected
//! columns and return one of them. Scores of selected columns are never consulted.

use crate::rng::RandomSource;
use crate::solution::CoverageSolution;

/// Rule for choosing the next column to add.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnSelector {
    /// Highest marginal gain, ties broken uniformly at random.
    GreedyMax,
    /// Uniform choice from the restricted candidate list of columns whose gain is
    /// at least `min + alpha * (max - min)`.
    Grasp {
        /// Greediness in `[0, 1]`: `1` keeps only maximal columns, `0` admits all.
        alpha: f64,
    },
}

impl ColumnSelector {
    /// Picks a non-selected column according to this rule.
    ///
    /// # Panics
    /// Panics if every column is already selected, or if a GRASP `alpha` lies
    /// outside `[0, 1]`.
    pub fn pick<R: RandomSource + ?Sized>(
        &self,
        solution: &CoverageSolution<'_>,
        rng: &mut R,
    ) -> usize {
        match *self {
            ColumnSelector::GreedyMax => pick_greedy_max(solution, rng),
            ColumnSelector::Grasp { alpha } => pick_grasp(solution, alpha, rng),
        }
    }
}

/// Returns a non-selected column of maximum gain, breaking ties uniformly at random.
///
/// The random source is consulted only when more than one column attains the maximum.
///
/// # Panics
/// Panics if every column is already selected.
pub fn pick_greedy_max<R: RandomSource + ?Sized>(
    solution: &CoverageSolution<'_>,
    rng: &mut R,
) -> usize {
    let mut best_score = 0usize;
    let mut best: Vec<usize> = Vec::new();

    for c in 0..solution.instance().num_columns() {
        if solution.is_selected(c) {
            continue;
        }
        let score = solution.gain(c);
        if best.is_empty() || score > best_score {
            best_score = score;
            best.clear();
            best.push(c);
        } else if score == best_score {
            best.push(c);
        }
    }

    match best.len() {
        0 => panic!("no non-selected column left to pick"),
        1 => best[0],
        n => best[rng.below(n)],
    }
}

/// Returns a uniformly random member of the GRASP restricted candidate list.
///
/// The list holds every non-selected column whose gain is at least
/// `min + alpha * (max - min)`, where `min` and `max` range over the non-selected
/// columns. It always contains a maximizing column.
///
/// # Panics
/// Panics if every column is already selected or `alpha` lies outside `[0, 1]`.
pub fn pick_grasp<R: RandomSource + ?Sized>(
    solution: &CoverageSolution<'_>,
    alpha: f64,
    rng: &mut R,
) -> usize {
    assert!(
        (0.0..=1.0).contains(&alpha),
        "GRASP alpha must lie in [0, 1], got {alpha}"
    );

    let num_columns = solution.instance().num_columns();
    let mut min_score = usize::MAX;
    let mut max_score = 0usize;
    let mut any = false;
    for c in (0..num_columns).filter(|&c| !solution.is_selected(c)) {
        let score = solution.gain(c);
        min_score = min_score.min(score);
        max_score = max_score.max(score);
        any = true;
    }
    assert!(any, "no non-selected column left to pick");

    let threshold = min_score as f64 + alpha * (max_score - min_score) as f64;
    let candidates: Vec<usize> = (0..num_columns)
        .filter(|&c| !solution.is_selected(c) && solution.gain(c) as f64 >= threshold)
        .collect();
    debug_assert!(!candidates.is_empty(), "restricted candidate list is empty");

    candidates[rng.below(candidates.len())]
}

// ============================================================================
// Tests
// ============================================================================
