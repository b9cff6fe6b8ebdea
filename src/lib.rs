//! # Maximum Coverage Search Engine
//!
//! Local-search heuristics for the maximum coverage problem: given rows and a
//! collection of columns (each a subset of rows), select exactly `K` columns so
//! that as many distinct rows as possible are covered.
//!
//! This crate provides:
//! - A coverage state with **incremental** per-column scores (marginal gain for
//!   non-selected columns, removal loss for selected ones).
//! - Greedy and GRASP construction.
//! - A first-improvement 1-swap neighborhood search.
//! - A seeded restart driver that keeps the best selection found.
//!
//! ## Quick Start
//!
//! ```
//! use maxcov::instance::ProblemInstance;
//! use maxcov::search::{run_search, SearchConfig};
//!
//! // Column 0 covers rows {0,1}, column 1 covers {1,2}, column 2 covers {2,3}.
//! let instance =
//!     ProblemInstance::from_columns(4, &[vec![0, 1], vec![1, 2], vec![2, 3]]).unwrap();
//! let cfg = SearchConfig {
//!     k: 2,
//!     iterations: 10,
//!     seed: Some(12345),
//!     ..Default::default()
//! };
//! let outcome = run_search(&instance, &cfg).unwrap();
//! assert_eq!(outcome.covered_rows(), 4);
//! assert_eq!(outcome.best.selected_columns(), &[0, 2]);
//! ```
//!
//! ## Working with Solutions Directly
//!
//! ```
//! use maxcov::instance::ProblemInstance;
//! use maxcov::solution::CoverageSolution;
//!
//! let instance =
//!     ProblemInstance::from_columns(4, &[vec![0, 1], vec![1, 2], vec![2, 3]]).unwrap();
//! let mut solution = CoverageSolution::new(&instance, 2);
//!
//! solution.add(1);
//! assert_eq!(solution.covered_rows(), 2);
//! assert_eq!(solution.gain(0), 1); // only row 0 is new
//!
//! solution.add(2);
//! assert_eq!(solution.loss(1), 1); // row 2 is shared with column 2
//!
//! solution.remove(1);
//! assert_eq!(solution.covered_rows(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`instance`]: Immutable incidence data and the OR-Library format loader.
//! - [`solution`]: Coverage state with incremental score maintenance.
//! - [`select`]: Greedy-max and GRASP column selection.
//! - [`construction`]: Greedy and GRASP construction heuristics.
//! - [`neighborhood`]: 1-swap local search.
//! - [`search`]: Restart driver with incumbent tracking.
//! - [`validate`]: From-scratch verification.
//! - [`rng`]: The injected random service.
//!
//! ## Performance Notes
//!
//! - `add`/`remove` cost `O(Σ deg(r))` over the rows of the column, not `O(rows × columns)`.
//! - Selection scans every column once per pick; construction is `O(K × columns)` picks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Hot-path accessors
#![allow(clippy::missing_panics_doc)] // Contract violations are documented per type
#![allow(clippy::doc_markdown)]

pub mod construction;
pub mod instance;
pub mod neighborhood;
pub mod rng;
pub mod search;
pub mod select;
pub mod solution;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::construction::{grasp_construct, greedy_construct, ConstructionStrategy};
    pub use crate::instance::{parse_instance, InstanceError, ProblemInstance};
    pub use crate::neighborhood::{improve, improve_until_stable, PassSummary};
    pub use crate::rng::RandomSource;
    pub use crate::search::{run_search, search_with, SearchConfig, SearchError, SearchOutcome};
    pub use crate::select::{pick_grasp, pick_greedy_max, ColumnSelector};
    pub use crate::solution::{CoverageSolution, SolutionError};
    pub use crate::validate::{check_solution, evaluate_selection, ValidationError};
}
