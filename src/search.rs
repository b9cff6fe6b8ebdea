//! Restart driver: repeat construction + local search and keep the best selection.

use crate::construction::{construct_into, ConstructionStrategy};
use crate::instance::ProblemInstance;
use crate::neighborhood::improve_until_stable;
use crate::rng::{random_seed, seeded_rng, RandomSource};
use crate::solution::{CoverageSolution, SolutionError};
use crate::validate::check_solution;
use thiserror::Error;

// ============================================================================
// Configuration
// ============================================================================

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of columns to select.
    pub k: usize,
    /// Number of construct-then-improve restarts.
    pub iterations: u64,
    /// How each restart builds its starting selection.
    pub strategy: ConstructionStrategy,
    /// Upper bound on improvement passes per restart (`0` skips local search).
    pub max_passes: usize,
    /// Optional deterministic seed; a random one is drawn and logged otherwise.
    pub seed: Option<u64>,
    /// Progress report period in iterations (`0` disables periodic reports).
    pub report_every: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: 1,
            iterations: 500,
            strategy: ConstructionStrategy::Greedy,
            max_passes: 1,
            seed: None,
            report_every: 100,
        }
    }
}

impl SearchConfig {
    /// Default GRASP greediness.
    pub const DEFAULT_ALPHA: f64 = 0.95;

    /// Checks the configuration against an instance.
    ///
    /// # Errors
    /// Returns an error if `k` exceeds the number of columns, `iterations` is zero,
    /// or a GRASP `alpha` lies outside `[0, 1]`.
    pub fn validate(&self, instance: &ProblemInstance) -> Result<(), SearchError> {
        if self.k > instance.num_columns() {
            return Err(SearchError::Solution(SolutionError::CapacityTooLarge {
                k: self.k,
                num_columns: instance.num_columns(),
            }));
        }
        if self.iterations == 0 {
            return Err(SearchError::NoIterations);
        }
        if let ConstructionStrategy::Grasp { alpha } = self.strategy {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(SearchError::InvalidAlpha(alpha));
            }
        }
        Ok(())
    }
}

/// Errors reported before a search starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SearchError {
    /// The selection cannot be built for this instance.
    #[error(transparent)]
    Solution(#[from] SolutionError),
    /// The iteration budget is zero.
    #[error("iteration budget must be positive")]
    NoIterations,
    /// GRASP greediness outside `[0, 1]`.
    #[error("GRASP alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),
}

// ============================================================================
// Incumbent
// ============================================================================

/// The best selection seen so far.
#[derive(Clone, Debug)]
pub struct Incumbent<'a> {
    best: CoverageSolution<'a>,
    found_at: Option<u64>,
}

impl<'a> Incumbent<'a> {
    /// Creates an incumbent that accepts the first offer unconditionally.
    pub fn new(instance: &'a ProblemInstance, k: usize) -> Self {
        Self {
            best: CoverageSolution::new(instance, k),
            found_at: None,
        }
    }

    /// Deep-copies `candidate` in if it is the first offer or covers strictly more
    /// rows than the current best. Returns whether it was taken.
    pub fn offer(&mut self, candidate: &CoverageSolution<'a>, iteration: u64) -> bool {
        if self.found_at.is_some() && candidate.covered_rows() <= self.best.covered_rows() {
            return false;
        }
        self.best.copy_from(candidate);
        self.found_at = Some(iteration);
        true
    }

    /// The best selection so far.
    pub fn best(&self) -> &CoverageSolution<'a> {
        &self.best
    }

    /// Iteration at which the best selection was found, if any offer was taken.
    pub fn found_at(&self) -> Option<u64> {
        self.found_at
    }

    /// Consumes the incumbent, returning the best selection.
    pub fn into_best(self) -> CoverageSolution<'a> {
        self.best
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Result of a completed search.
#[derive(Clone, Debug)]
pub struct SearchOutcome<'a> {
    /// Best selection found.
    pub best: CoverageSolution<'a>,
    /// Iteration (1-based) that produced `best`.
    pub best_iteration: u64,
    /// Iterations run.
    pub iterations: u64,
    /// Seed the run was derived from, if it was seeded by [`run_search`].
    pub seed: Option<u64>,
}

impl SearchOutcome<'_> {
    /// Rows covered by the best selection.
    pub fn covered_rows(&self) -> usize {
        self.best.covered_rows()
    }
}

/// Runs a seeded search: `iterations` restarts of construction followed by
/// local search, keeping the best selection.
///
/// # Errors
/// Returns an error if the configuration is invalid for `instance`.
pub fn run_search<'a>(
    instance: &'a ProblemInstance,
    cfg: &SearchConfig,
) -> Result<SearchOutcome<'a>, SearchError> {
    cfg.validate(instance)?;
    let seed = cfg.seed.unwrap_or_else(random_seed);
    let mut rng = seeded_rng(seed);
    tracing::info!(seed, "seeded search");
    let mut outcome = search_with(instance, cfg, &mut rng)?;
    outcome.seed = Some(seed);
    Ok(outcome)
}

/// Runs the search loop with a caller-supplied random source.
///
/// # Errors
/// Returns an error if the configuration is invalid for `instance`.
pub fn search_with<'a, R: RandomSource + ?Sized>(
    instance: &'a ProblemInstance,
    cfg: &SearchConfig,
    rng: &mut R,
) -> Result<SearchOutcome<'a>, SearchError> {
    cfg.validate(instance)?;
    tracing::info!(
        rows = instance.num_rows(),
        columns = instance.num_columns(),
        density = instance.density(),
        k = cfg.k,
        iterations = cfg.iterations,
        strategy = cfg.strategy.name(),
        "starting search"
    );

    let selector = cfg.strategy.selector();
    let mut current = CoverageSolution::new(instance, cfg.k);
    let mut incumbent = Incumbent::new(instance, cfg.k);

    for iteration in 1..=cfg.iterations {
        construct_into(&mut current, selector, rng);
        let constructed = current.covered_rows();
        if cfg.max_passes > 0 {
            improve_until_stable(&mut current, rng, cfg.max_passes);
        }

        if incumbent.offer(&current, iteration) {
            tracing::info!(
                iteration,
                covered = current.covered_rows(),
                constructed,
                "new incumbent"
            );
        }

        if cfg.report_every > 0 && iteration % cfg.report_every == 0 {
            tracing::debug!(
                iteration,
                current = current.covered_rows(),
                best = incumbent.best().covered_rows(),
                "progress"
            );
        }
    }

    if cfg!(debug_assertions) {
        if let Err(e) = check_solution(incumbent.best()) {
            panic!("incumbent failed verification: {e}");
        }
    }

    let best_iteration = incumbent.found_at().unwrap_or(0);
    let best = incumbent.into_best();
    tracing::info!(
        covered = best.covered_rows(),
        best_iteration,
        "search finished"
    );

    Ok(SearchOutcome {
        best,
        best_iteration,
        iterations: cfg.iterations,
        seed: None,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::parse_instance;
    use crate::validate::evaluate_selection;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn staircase() -> ProblemInstance {
        ProblemInstance::from_columns(4, &[vec![0, 1], vec![1, 2], vec![2, 3]]).unwrap()
    }

    fn sample() -> ProblemInstance {
        parse_instance(include_str!("../data/sample.txt")).unwrap()
    }

    #[test]
    fn search_config_default_is_valid() {
        let cfg = SearchConfig::default();
        assert!(cfg.validate(&staircase()).is_ok());
        assert_eq!(cfg.iterations, 500);
        assert_eq!(cfg.max_passes, 1);
        assert!((0.0..=1.0).contains(&SearchConfig::DEFAULT_ALPHA));
    }

    #[test]
    fn search_config_rejects_bad_values() {
        let inst = staircase();
        let too_big = SearchConfig {
            k: 4,
            ..Default::default()
        };
        assert_eq!(
            too_big.validate(&inst),
            Err(SearchError::Solution(SolutionError::CapacityTooLarge {
                k: 4,
                num_columns: 3
            }))
        );
        let no_iters = SearchConfig {
            iterations: 0,
            ..Default::default()
        };
        assert_eq!(no_iters.validate(&inst), Err(SearchError::NoIterations));
        let bad_alpha = SearchConfig {
            strategy: ConstructionStrategy::Grasp { alpha: -0.1 },
            ..Default::default()
        };
        assert!(matches!(bad_alpha.validate(&inst), Err(SearchError::InvalidAlpha(_))));
        assert!(run_search(&inst, &bad_alpha).is_err());
    }

    #[test]
    fn search_is_deterministic() {
        let inst = sample();
        let cfg = SearchConfig {
            k: 4,
            iterations: 40,
            strategy: ConstructionStrategy::Grasp { alpha: 0.6 },
            seed: Some(2024),
            ..Default::default()
        };
        let a = run_search(&inst, &cfg).unwrap();
        let b = run_search(&inst, &cfg).unwrap();
        assert_eq!(a.best.selected_columns(), b.best.selected_columns());
        assert_eq!(a.covered_rows(), b.covered_rows());
        assert_eq!(a.best_iteration, b.best_iteration);
        assert_eq!(a.seed, Some(2024));
    }

    #[test]
    fn search_reaches_full_cover_on_staircase() {
        let inst = staircase();
        for strategy in [
            ConstructionStrategy::Greedy,
            ConstructionStrategy::Grasp { alpha: 0.0 },
            ConstructionStrategy::Grasp { alpha: 1.0 },
        ] {
            let cfg = SearchConfig {
                k: 2,
                iterations: 5,
                strategy,
                seed: Some(1),
                ..Default::default()
            };
            let outcome = run_search(&inst, &cfg).unwrap();
            assert_eq!(outcome.covered_rows(), 4, "{strategy:?}");
            assert_eq!(outcome.best.selected_columns(), &[0, 2]);
        }
    }

    #[test]
    fn search_outcome_matches_from_scratch_count() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(8);
        for k in [2, 3, 5] {
            let cfg = SearchConfig {
                k,
                iterations: 30,
                max_passes: 3,
                ..Default::default()
            };
            let outcome = search_with(&inst, &cfg, &mut rng).unwrap();
            assert_eq!(outcome.best.len(), k);
            assert_eq!(
                evaluate_selection(&inst, outcome.best.selected_columns()),
                Ok(outcome.covered_rows())
            );
            assert!((1..=30).contains(&outcome.best_iteration));
            assert_eq!(outcome.seed, None);
        }
    }

    #[test]
    fn search_without_local_search_still_keeps_best() {
        let inst = sample();
        let mut rng = XorShiftRng::seed_from_u64(21);
        let cfg = SearchConfig {
            k: 3,
            iterations: 25,
            strategy: ConstructionStrategy::Grasp { alpha: 0.2 },
            max_passes: 0,
            ..Default::default()
        };
        let outcome = search_with(&inst, &cfg, &mut rng).unwrap();
        assert!(outcome.covered_rows() <= 23);
        assert_eq!(outcome.iterations, 25);
    }

    #[test]
    fn incumbent_takes_first_offer_then_only_strict_improvements() {
        let inst = staircase();
        let mut incumbent = Incumbent::new(&inst, 2);
        let mut sol = CoverageSolution::new(&inst, 2);

        sol.add(0);
        sol.add(1);
        assert!(incumbent.offer(&sol, 1));
        assert_eq!(incumbent.found_at(), Some(1));

        sol.remove(0);
        sol.add(2);
        assert!(!incumbent.offer(&sol, 2), "equal coverage is not an improvement");

        sol.remove(1);
        sol.add(0);
        assert!(incumbent.offer(&sol, 3));
        assert_eq!(incumbent.found_at(), Some(3));

        // The incumbent holds a copy: mutating the candidate leaves it alone.
        sol.remove(2);
        assert_eq!(incumbent.best().covered_rows(), 4);
        assert_eq!(incumbent.into_best().selected_columns(), &[0, 2]);
    }

    #[test]
    fn incumbent_accepts_zero_coverage_first_offer() {
        let inst = ProblemInstance::new(1, vec![vec![]], vec![1]).unwrap();
        let mut incumbent = Incumbent::new(&inst, 1);
        let mut sol = CoverageSolution::new(&inst, 1);
        sol.add(0);
        assert!(incumbent.offer(&sol, 1));
        assert_eq!(incumbent.best().selected_columns(), &[0]);
        assert_eq!(incumbent.best().covered_rows(), 0);
    }
}
