//! A library for determining the satisfiability of pseudo-Boolean formulas, and for optimizing a linear objective over them.
//!
//! otter_pb reasons with linear inequalities over literals, Σ c·l ≥ d, using the cutting planes proof system during conflict analysis.
//! Clauses and cardinality constraints are special cases, and are stored and propagated as such.
//!
//! # Orientation
//!
//! The library is designed around a [solver](crate::solver), which owns the databases of a solve and a [shared context](crate::context::SharedContext) of configuration, counters, and pools of scratch space.
//!
//! - Constraints are added programatically through [add_constraint](crate::solver::GenericSolver::add_constraint) and friends.
//! - A formula is stored in a [constraint database](crate::db), with each constraint in one of a handful of encodings.
//! - During conflict analysis constraints are expanded to [constraint expressions](crate::ce), at a precision tier chosen by the size of their coefficients.
//! - The [procedures] mutate a solver, and [solve](crate::procedures::solve) ties them together.
//! - [Optimization](crate::optimization) wraps a solver, and minimizes a linear objective through a mix of core-guided search and solution improving search.
//!
//! Useful starting points, then, may be:
//! - The high-level [solve procedure](crate::procedures::solve) to inspect the dynamics of a solve.
//! - The [constraint expression module](crate::ce) to see how cutting planes are derived.
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Examples
//!
//! ```rust
//! # use otter_pb::config::Config;
//! # use otter_pb::reports::SolveState;
//! # use otter_pb::solver::Solver;
//! # use otter_pb::structures::{origin::Origin, simple::ConstrSimple};
//! let mut solver = Solver::from_config(Config::default());
//! let x = solver.new_vars(3);
//!
//! // 2 x1 + x2 + x3 >= 2, and at most one of x1, x2
//! let knapsack = ConstrSimple::new([(2, x[0]), (1, x[1]), (1, x[2])], 2);
//! assert!(solver.add_simple(&knapsack, Origin::Formula).is_ok());
//! let at_most_one = ConstrSimple::new([(1, -x[0]), (1, -x[1])], 1);
//! assert!(solver.add_simple(&at_most_one, Origin::Formula).is_ok());
//!
//! assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
//! let solution = solver.last_solution().unwrap();
//! assert!(solution.contains(&x[0]) || (solution.contains(&x[1]) && solution.contains(&x[2])));
//! ```
//!
//! # Logs
//!
//! Detailed calls to [log!](log) are made, with targets listed in [misc::log].
//! For example, with [env_logger](https://docs.rs/env_logger/latest/env_logger/), `RUST_LOG=optimization=info …` shows bounds found during optimization.

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::len_without_is_empty)]

pub mod procedures;
pub mod solver;

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod ce;
pub mod numeric;

pub mod db;

pub mod generic;

pub mod dispatch;
pub mod reports;

pub mod lp;
pub mod optimization;

pub mod misc;
