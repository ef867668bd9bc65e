//! Various procedures for mutating a solver.
//!
//! For the most part these are methods accessed via a solver, and primarily placed here for documentation.

pub mod add;
pub mod analysis;
pub mod assumptions;
pub mod backjump;
pub mod decision;
pub mod inprocess;
pub mod learn;
pub mod propagate;
pub mod reduce;
pub mod schedulers;
pub mod solve;
