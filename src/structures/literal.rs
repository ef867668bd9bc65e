//! Variables and literals.
//!
//! A variable is a positive integer, and a literal is a non-zero integer whose absolute value is a variable.
//! A positive literal is true when its variable is assigned true, and a negative literal is true when its variable is assigned false.
//!
//! ```rust
//! # use otter_pb::structures::literal::{var, lit_index, fresh};
//! let literal = fresh(7, false);
//! assert_eq!(literal, -7);
//! assert_eq!(var(literal), 7);
//! assert_eq!(lit_index(7), 14);
//! assert_eq!(lit_index(-7), 15);
//! ```
//!
//! Zero is never a literal, and is free to be used as a sentinel.

/// A variable, always positive.
pub type Var = i32;

/// A literal, with sign indicating polarity.
pub type Lit = i32;

/// The variable of a literal.
#[inline(always)]
pub fn var(literal: Lit) -> Var {
    literal.abs()
}

/// A literal from a variable and polarity.
#[inline(always)]
pub fn fresh(variable: Var, polarity: bool) -> Lit {
    match polarity {
        true => variable,
        false => -variable,
    }
}

/// A dense index for a literal, with the literals of a variable adjacent.
#[inline(always)]
pub fn lit_index(literal: Lit) -> usize {
    ((literal.unsigned_abs() as usize) << 1) | (literal < 0) as usize
}

/// The number of literal indicies required for variables up to (and including) `variable`.
#[inline(always)]
pub fn lit_span(variable: Var) -> usize {
    ((variable as usize) + 1) << 1
}
