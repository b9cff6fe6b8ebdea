//! Construction heuristics: fill an empty selection one column at a time.

use crate::instance::ProblemInstance;
use crate::rng::RandomSource;
use crate::select::ColumnSelector;
use crate::solution::CoverageSolution;

// ============================================================================
// Construction Strategies
// ============================================================================

/// Strategy for building an initial selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstructionStrategy {
    /// Always add a column of maximum gain.
    Greedy,
    /// Add a random column from the GRASP restricted candidate list.
    Grasp {
        /// Greediness in `[0, 1]`.
        alpha: f64,
    },
}

impl ConstructionStrategy {
    /// The selection rule applied at every step.
    pub fn selector(self) -> ColumnSelector {
        match self {
            ConstructionStrategy::Greedy => ColumnSelector::GreedyMax,
            ConstructionStrategy::Grasp { alpha } => ColumnSelector::Grasp { alpha },
        }
    }

    /// Short name for logging.
    pub fn name(self) -> &'static str {
        match self {
            ConstructionStrategy::Greedy => "greedy",
            ConstructionStrategy::Grasp { .. } => "grasp",
        }
    }
}

/// Builds a new selection of `k` columns using the given strategy.
///
/// # Panics
/// Panics if `k` exceeds the number of columns.
pub fn construct_initial<'a, R: RandomSource + ?Sized>(
    instance: &'a ProblemInstance,
    k: usize,
    strategy: ConstructionStrategy,
    rng: &mut R,
) -> CoverageSolution<'a> {
    let mut solution = CoverageSolution::new(instance, k);
    construct_into(&mut solution, strategy.selector(), rng);
    solution
}

/// Resets `solution` and fills it to capacity, one `selector` pick at a time.
///
/// Reuses the solution's buffers, which is what a restart loop wants.
pub fn construct_into<R: RandomSource + ?Sized>(
    solution: &mut CoverageSolution<'_>,
    selector: ColumnSelector,
    rng: &mut R,
) {
    solution.initialize();
    while !solution.is_full() {
        let c = selector.pick(solution, rng);
        solution.add(c);
    }
}

/// Greedy construction: `k` rounds of max-gain selection.
///
/// # Panics
/// Panics if `k` exceeds the number of columns.
pub fn greedy_construct<'a, R: RandomSource + ?Sized>(
    instance: &'a ProblemInstance,
    k: usize,
    rng: &mut R,
) -> CoverageSolution<'a> {
    construct_initial(instance, k, ConstructionStrategy::Greedy, rng)
}

/// GRASP construction: `k` rounds of restricted-candidate-list selection.
///
/// # Panics
/// Panics if `k` exceeds the number of columns or `alpha` lies outside `[0, 1]`.
pub fn grasp_construct<'a, R: RandomSource + ?Sized>(
    instance: &'a ProblemInstance,
    k: usize,
    alpha: f64,
    rng: &mut R,
) -> CoverageSolution<'a> {
    construct_initial(instance, k, ConstructionStrategy::Grasp { alpha }, rng)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::parse_instance;
    use crate::rng::ScriptedRandom;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn staircase() -> ProblemInstance {
        ProblemInstance::from_columns(4, &[vec![0, 1], vec![1, 2], vec![2, 3]]).unwrap()
    }

    fn sample() -> ProblemInstance {
        parse_instance(include_str!("../data/sample.txt")).unwrap()
    }

    #[test]
    fn greedy_fills_exactly_k_columns() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(42);
        for k in 0..=6 {
            let sol = greedy_construct(&inst, k, &mut rng);
            assert_eq!(sol.len(), k);
            assert!(sol.is_full());
        }
    }

    #[test]
    fn greedy_coverage_is_monotone_in_k() {
        let inst = sample();
        let mut previous = 0;
        for k in 1..=inst.num_columns() {
            // Same seed: the k-column run extends the (k-1)-column run.
            let mut rng = XorShiftRng::seed_from_u64(7);
            let sol = greedy_construct(&inst, k, &mut rng);
            assert!(
                sol.covered_rows() >= previous,
                "coverage dropped from {previous} to {} at k={k}",
                sol.covered_rows()
            );
            previous = sol.covered_rows();
        }
        assert_eq!(previous, 37, "all coverable rows are covered once every column is in");
    }

    #[test]
    fn greedy_first_pick_has_maximum_degree() {
        let inst = sample();
        let max_degree = (0..inst.num_columns())
            .map(|c| inst.col_entries(c).len())
            .max()
            .unwrap();
        let mut rng = XorShiftRng::seed_from_u64(9);
        let sol = greedy_construct(&inst, 1, &mut rng);
        assert_eq!(sol.covered_rows(), max_degree);
    }

    #[test]
    fn greedy_staircase_reaches_full_cover_when_ties_favor_an_end() {
        let inst = staircase();
        // First round: three-way tie, pick column 0. Second round: column 2 is the
        // unique maximum (gain 2) so no draw is consumed.
        let mut rng = ScriptedRandom::with_picks(&[0]);
        let sol = greedy_construct(&inst, 2, &mut rng);
        assert_eq!(sol.selected_columns(), &[0, 2]);
        assert_eq!(sol.covered_rows(), 4);
    }

    #[test]
    fn greedy_staircase_middle_first_leaves_a_gap() {
        let inst = staircase();
        let mut rng = ScriptedRandom::with_picks(&[1, 0]);
        let sol = greedy_construct(&inst, 2, &mut rng);
        assert_eq!(sol.covered_rows(), 3);
        assert!(sol.is_selected(1));
    }

    #[test]
    fn grasp_alpha_one_on_staircase_behaves_like_greedy() {
        let inst = staircase();
        let mut rng = ScriptedRandom::with_picks(&[2, 0]);
        let sol = grasp_construct(&inst, 2, 1.0, &mut rng);
        assert_eq!(sol.selected_columns(), &[0, 2]);
        assert_eq!(sol.covered_rows(), 4);
    }

    #[test]
    fn grasp_never_beats_the_coverage_bound() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(11);
        for _ in 0..50 {
            let sol = grasp_construct(&inst, 3, 0.5, &mut rng);
            assert_eq!(sol.len(), 3);
            assert!(sol.covered_rows() <= 23, "23 is the optimum for k=3");
        }
    }

    #[test]
    fn construct_into_resets_previous_selection() {
        let inst = staircase();
        let mut rng = XorShiftRng::seed_from_u64(1);
        let mut sol = CoverageSolution::new(&inst, 2);
        sol.add(1);
        construct_into(&mut sol, ColumnSelector::GreedyMax, &mut rng);
        assert_eq!(sol.len(), 2);
        let (covered, score, rows) = sol.recompute_for_test();
        assert_eq!(sol.covered_rows(), rows);
        for r in 0..inst.num_rows() {
            assert_eq!(sol.coverage(r), covered[r]);
        }
        for c in 0..inst.num_columns() {
            assert_eq!(sol.score(c), score[c]);
        }
    }

    #[test]
    fn strategy_names_and_selectors() {
        assert_eq!(ConstructionStrategy::Greedy.name(), "greedy");
        assert_eq!(
            ConstructionStrategy::Grasp { alpha: 0.3 }.selector(),
            ColumnSelector::Grasp { alpha: 0.3 }
        );
    }
}
