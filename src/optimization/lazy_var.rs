/*!
Lazily introduced counting variables over a core.

A core Σ l ≥ k over `n` literals is extended by variables y₁, y₂, …, with yᵢ true exactly when at least k + i literals of the core are true.
Only as many variables are introduced as have been needed, and the most recent variable stands in for every variable not yet introduced.

With `r` variables introduced, and `u = n - k` the most that could ever be introduced, the definitions are:
- At least: Σ_{i<r} yᵢ + (u - r + 1)·y_r ≥ Σ l - k, so the variables account for every literal true beyond `k`.
- At most: Σ l - Σ_{i≤r} yᵢ ≥ k, so no variable is true without cause.
- Order: y_{r-1} ∨ ¬y_r, for each later variable.

Once `u` variables are introduced the definitions are exact, and the lazy variable is complete.
*/

use num_bigint::BigInt;

use crate::{
    context::ID,
    structures::{
        literal::{Lit, Var},
        simple::ConstrSimple,
    },
};

/// A sequence of counting variables over the literals of a core.
#[derive(Clone, Debug)]
pub struct LazyVar {
    /// The literals of the core.
    lits: Vec<Lit>,

    /// The degree of the core.
    degree: usize,

    /// The cost of each counting variable in the objective when introduced.
    pub cost: BigInt,

    /// The counting variables introduced so far.
    vars: Vec<Var>,

    /// Identifiers of the current at least and at most definitions.
    pub(crate) definitions: Option<(ID, ID)>,
}

impl LazyVar {
    /// A lazy variable over `lits` with degree `degree`, with `first` as the first counting variable.
    pub fn new(lits: Vec<Lit>, degree: usize, cost: BigInt, first: Var) -> Self {
        debug_assert!(degree < lits.len());
        LazyVar {
            lits,
            degree,
            cost,
            vars: vec![first],
            definitions: None,
        }
    }

    /// The most counting variables which could be introduced.
    pub fn upper(&self) -> usize {
        self.lits.len() - self.degree
    }

    /// The most recent counting variable.
    pub fn last(&self) -> Var {
        self.vars[self.vars.len() - 1]
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn is_complete(&self) -> bool {
        self.vars.len() >= self.upper()
    }

    /// Introduces a further counting variable.
    pub fn grow(&mut self, next: Var) {
        debug_assert!(!self.is_complete());
        self.vars.push(next);
    }

    /// Σ_{i<r} yᵢ + (u - r + 1)·y_r ≥ Σ l - k, written with the core literals on the left.
    pub fn at_least(&self) -> ConstrSimple {
        let r = self.vars.len();
        let mut terms: Vec<(i64, Lit)> = self.lits.iter().map(|l| (-1, *l)).collect();
        for (i, y) in self.vars.iter().enumerate() {
            let coef = match i + 1 == r {
                true => (self.upper() - r + 1) as i64,
                false => 1,
            };
            terms.push((coef, *y));
        }
        ConstrSimple::new(terms, -(self.degree as i64))
    }

    /// Σ l - Σ yᵢ ≥ k.
    pub fn at_most(&self) -> ConstrSimple {
        let terms = self
            .lits
            .iter()
            .map(|l| (1, *l))
            .chain(self.vars.iter().map(|y| (-1, *y)));
        ConstrSimple::new(terms, self.degree as i64)
    }

    /// y_{r-1} ∨ ¬y_r, if some variable precedes the most recent.
    pub fn order(&self) -> Option<ConstrSimple> {
        match self.vars.len() {
            0 | 1 => None,
            r => Some(ConstrSimple::clause(&[self.vars[r - 2], -self.vars[r - 1]])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions() {
        let mut lazy = LazyVar::new(vec![1, 2, 3], 1, BigInt::from(2), 4);
        assert_eq!(lazy.upper(), 2);
        assert!(!lazy.is_complete());
        assert_eq!(lazy.at_least(), ConstrSimple::new([(-1, 1), (-1, 2), (-1, 3), (2, 4)], -1));
        assert_eq!(lazy.at_most(), ConstrSimple::new([(1, 1), (1, 2), (1, 3), (-1, 4)], 1));
        assert!(lazy.order().is_none());

        lazy.grow(5);
        assert!(lazy.is_complete());
        assert_eq!(lazy.last(), 5);
        assert_eq!(
            lazy.at_least(),
            ConstrSimple::new([(-1, 1), (-1, 2), (-1, 3), (1, 4), (1, 5)], -1)
        );
        assert_eq!(lazy.order(), Some(ConstrSimple::clause(&[4, -5])));
    }

    #[test]
    fn canonical_extension_satisfies_definitions() {
        let mut lazy = LazyVar::new(vec![1, 2, 3, 4], 1, BigInt::from(1), 5);
        lazy.grow(6);

        // Three of the core literals true, so both y1 and y2 hold.
        let value = |l: Lit| match l {
            1 | 2 | 3 | 5 | 6 => true,
            -4 => true,
            _ => false,
        };
        assert!(lazy.at_least().is_satisfied_by(value));
        assert!(lazy.at_most().is_satisfied_by(value));
        assert!(lazy.order().unwrap().is_satisfied_by(value));
    }
}
