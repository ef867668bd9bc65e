//! Abstract elements of a solve and their representation.
//!
//! - [Literals](literal) are signed integers, with the absolute value of a literal its variable.
//! - [Terms](term) pair a coefficient with a literal.
//! - [Origins](origin) record the provenance of a constraint.
//! - [Simple constraints](simple) are the plain input form of a constraint, with arbitrary precision coefficients.

pub mod literal;
pub mod origin;
pub mod simple;
pub mod term;
