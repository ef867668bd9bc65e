//! Simplification of constraint expressions to cardinality constraints, clauses, and units.
//!
//! Each simplification is a sequence of weakenings followed by a division, and so is noted in the proof buffer as such.

use crate::{
    ce::ConstrExp,
    db::trail::Trail,
    numeric::Number,
    structures::literal::{var, Lit},
};

impl<C: Number, D: Number> ConstrExp<C, D> {
    /// Orders the variables of the expression by decreasing coefficient magnitude, with ties broken by variable.
    pub fn sort_in_decreasing_coef_order(&mut self) {
        let coefs = &self.coefs;
        self.vars
            .sort_by(|a, b| match coefs[*b as usize].abs().cmp(&coefs[*a as usize].abs()) {
                std::cmp::Ordering::Equal => a.cmp(b),
                ordering => ordering,
            });
    }

    /// Coefficient magnitudes, in decreasing order.
    fn sorted_magnitudes(&self) -> Vec<C> {
        let mut magnitudes = self
            .vars
            .iter()
            .map(|v| self.coefs[*v as usize].abs())
            .filter(|c| !c.is_zero())
            .collect::<Vec<_>>();
        magnitudes.sort_by(|a, b| b.cmp(a));
        magnitudes
    }

    /// The fewest number of literals which must be true to satisfy the expression, or one more than the number of literals if unsatisfiable.
    pub fn cardinality_degree(&self) -> usize {
        if !self.degree.is_positive() {
            return 0;
        }
        let magnitudes = self.sorted_magnitudes();
        let mut sum = D::zero();
        for (index, c) in magnitudes.iter().enumerate() {
            sum = sum + c.convert::<D>();
            if sum >= self.degree {
                return index + 1;
            }
        }
        magnitudes.len() + 1
    }

    /// Whether every coefficient is one.
    pub fn is_cardinality(&self) -> bool {
        self.has_unit_coefs()
    }

    /// Whether the expression is a clause, i.e. a cardinality constraint of degree one.
    pub fn is_clause(&self) -> bool {
        self.degree.is_one() && self.has_unit_coefs()
    }

    /// Replaces the expression with the cardinality constraint requiring at least [cardinality_degree](ConstrExp::cardinality_degree) literals to be true.
    ///
    /// If `equivalence_preserving` the simplification is made only if the cardinality constraint is equivalent to the expression, and the return value notes whether it was.
    pub fn simplify_to_cardinality(&mut self, equivalence_preserving: bool) -> bool {
        if self.is_cardinality() || self.is_tautology() {
            return true;
        }
        let k = self.cardinality_degree();
        let magnitudes = self.sorted_magnitudes();
        if k > magnitudes.len() {
            // unsatisfiable, and the cardinality constraint over no literals with degree one says the same
            if equivalence_preserving {
                return false;
            }
            self.weaken_if(|_| true);
            self.remove_zeroes();
            self.set_degree(D::one());
            return true;
        }

        if equivalence_preserving {
            let mut smallest = D::zero();
            for c in magnitudes.iter().rev().take(k) {
                smallest = smallest + c.convert::<D>();
            }
            if smallest < self.degree {
                return false;
            }
        }

        // Weaken the coefficients of the k largest literals down to the k-th largest, then divide by that coefficient.
        let pivot = magnitudes[k - 1].clone();
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            let c = self.coefs[v as usize].abs();
            if c > pivot {
                let l = self.lit(v);
                self.weaken(c - pivot.clone(), l);
            }
        }
        self.divide_round_up(&pivot.convert());
        self.saturate();
        debug_assert!(self.is_cardinality());
        true
    }

    /// Replaces the expression with the clause over its literals.
    pub fn simplify_to_clause(&mut self) {
        if self.is_tautology() {
            return;
        }
        self.simplify_to_cardinality(false);
        if self.degree > D::one() {
            let degree = self.degree.clone();
            self.divide_round_up(&degree);
        }
        debug_assert!(self.is_clause() || self.is_tautology());
    }

    /// Replaces the expression, asserting `unit` at level zero, with the unit constraint of `unit`.
    ///
    /// Every other literal should be false at level zero.
    pub fn simplify_to_unit(&mut self, trail: &Trail, unit: Lit) {
        self.weaken_if(|l| l != unit && (var(l) > trail.max_var() || !trail.is_unit(-l)));
        self.remove_units_and_zeroes(trail);
        self.saturate();
        let c = self.get_coef(unit);
        if c.is_positive() {
            self.divide_round_up(&c.convert());
        }
    }

    /// Weakens all literals whose coefficient is below `limit`.
    pub fn weaken_smalls(&mut self, limit: &C) {
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            if self.coefs[v as usize].abs() < *limit {
                self.weaken_var(v);
            }
        }
        self.remove_zeroes();
        self.saturate();
    }

    /// A measure of strength, comparing the degree to the sum of coefficients.
    pub fn strength(&self) -> f64 {
        let sum = self.abs_coef_sum().as_f64();
        match sum > 0.0 {
            true => self.degree.as_f64() / sum,
            false => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ce::ConstrExp;

    fn ce(terms: &[(i32, i32)], rhs: i64) -> ConstrExp<i32, i64> {
        let mut ce = ConstrExp::default();
        for (c, l) in terms {
            ce.add_lhs(*c, *l);
        }
        ce.add_rhs(rhs);
        ce
    }

    #[test]
    fn cardinality_by_weakening() {
        // at least two of the literals must be true
        let mut a = ce(&[(5, 1), (4, 2), (3, 3), (1, 4)], 8);
        assert_eq!(a.cardinality_degree(), 2);
        assert!(!a.clone().simplify_to_cardinality(true));
        assert!(a.simplify_to_cardinality(false));
        assert!(a.is_cardinality());
        assert_eq!(*a.degree(), 2);
    }

    #[test]
    fn equivalent_cardinality() {
        let mut a = ce(&[(3, 1), (3, 2), (2, 3)], 5);
        assert!(a.simplify_to_cardinality(true));
        assert_eq!(a.to_string(), "+1 x1 +1 x2 +1 x3 >= 2");
    }

    #[test]
    fn clause_from_cardinality() {
        let mut a = ce(&[(1, 1), (1, -2), (1, 3)], 2);
        a.simplify_to_clause();
        assert!(a.is_clause());
        assert_eq!(a.len(), 3);
    }
}
