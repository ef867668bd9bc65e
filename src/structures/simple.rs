//! The plain form of a constraint.
//!
//! A simple constraint is a list of terms and a right hand side, read as Σ c·l ≥ rhs.
//! Coefficients may be negative and literals may repeat, as the constraint is normalised when added to a solver.
//!
//! ```rust
//! # use otter_pb::structures::simple::ConstrSimple;
//! let constraint = ConstrSimple::new([(2, 1), (-3, -2)], 1);
//! assert_eq!(constraint.to_string(), "+2 x1 -3 ~x2 >= 1");
//! ```

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::structures::{
    literal::{var, Lit},
    term::Term,
};

/// A list of terms with a right hand side, read as Σ c·l ≥ rhs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstrSimple {
    pub terms: Vec<Term<BigInt>>,
    pub rhs: BigInt,
}

impl ConstrSimple {
    /// A simple constraint from (coefficient, literal) pairs.
    pub fn new(terms: impl IntoIterator<Item = (i64, Lit)>, rhs: i64) -> Self {
        ConstrSimple {
            terms: terms
                .into_iter()
                .map(|(c, l)| Term::new(BigInt::from(c), l))
                .collect(),
            rhs: BigInt::from(rhs),
        }
    }

    /// A simple constraint from arbitrary precision (coefficient, literal) pairs.
    pub fn from_big(terms: impl IntoIterator<Item = (BigInt, Lit)>, rhs: BigInt) -> Self {
        ConstrSimple {
            terms: terms.into_iter().map(|(c, l)| Term::new(c, l)).collect(),
            rhs,
        }
    }

    /// The clause over the given literals.
    pub fn clause(literals: &[Lit]) -> Self {
        Self::new(literals.iter().map(|l| (1, *l)), 1)
    }

    /// The largest variable mentioned.
    pub fn max_var(&self) -> i32 {
        self.terms.iter().map(|t| var(t.l)).max().unwrap_or(0)
    }

    /// The value of the left hand side under a (total) assignment, given as a function from literals to truth values.
    pub fn lhs_value(&self, value: impl Fn(Lit) -> bool) -> BigInt {
        let mut sum = BigInt::zero();
        for term in &self.terms {
            if value(term.l) {
                sum += &term.c;
            }
        }
        sum
    }

    /// Whether the constraint is satisfied under a (total) assignment.
    pub fn is_satisfied_by(&self, value: impl Fn(Lit) -> bool) -> bool {
        self.lhs_value(value) >= self.rhs
    }
}

impl std::fmt::Display for ConstrSimple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in &self.terms {
            let sign = match term.c.is_negative() {
                true => "-",
                false => "+",
            };
            match term.l < 0 {
                true => write!(f, "{sign}{} ~x{} ", term.c.abs(), -term.l)?,
                false => write!(f, "{sign}{} x{} ", term.c.abs(), term.l)?,
            }
        }
        write!(f, ">= {}", self.rhs)
    }
}
