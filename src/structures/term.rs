//! Terms, a coefficient paired with a literal.

use std::fmt::Display;

use crate::structures::literal::Lit;

/// A coefficient paired with a literal.
///
/// Within stored constraints coefficients are always positive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term<C> {
    pub c: C,
    pub l: Lit,
}

impl<C> Term<C> {
    pub fn new(c: C, l: Lit) -> Self {
        Term { c, l }
    }
}

impl<C: Display> Display for Term<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.l < 0 {
            true => write!(f, "+{} ~x{}", self.c, -self.l),
            false => write!(f, "+{} x{}", self.c, self.l),
        }
    }
}
