//! Cutting planes rules over constraint expressions.
//!
//! Each rule is sound: the resulting expression is implied by the expression before the rule was applied (and, for addition, the added expression).
//! Derivations are noted in the proof buffer of the expression.

use crate::{
    ce::ConstrExp,
    db::trail::Trail,
    numeric::{ceildiv, Number},
    structures::literal::{fresh, Lit},
};

impl<C: Number, D: Number> ConstrExp<C, D> {
    /// Multiplies the expression by `m`, which must be positive.
    pub fn multiply(&mut self, m: &C) {
        debug_assert!(m.is_positive());
        if m.is_one() {
            return;
        }
        let m_deg: D = m.convert();
        for v in &self.vars {
            let c = &mut self.coefs[*v as usize];
            *c = c.clone() * m.clone();
        }
        self.rhs = self.rhs.clone() * m_deg.clone();
        self.degree = self.degree.clone() * m_deg;
        self.proof.multiply(m);
    }

    /// Divides the expression by `d`, rounding coefficients and the degree up.
    pub fn divide_round_up(&mut self, d: &D) {
        debug_assert!(d.is_positive());
        if d.is_one() {
            return;
        }
        for v in &self.vars {
            let c = &mut self.coefs[*v as usize];
            if c.is_zero() {
                continue;
            }
            let magnitude: D = c.abs().convert();
            let rounded: C = ceildiv(&magnitude, d).convert();
            *c = match c.is_negative() {
                true => -rounded,
                false => rounded,
            };
        }
        let degree = ceildiv(&self.degree, d);
        self.set_degree(degree);
        self.proof.divide(d);
    }

    /// Divides the expression by `d`, rounding coefficients down.
    ///
    /// The remainder of each coefficient is weakened before division, so the division is exact on coefficients.
    pub fn divide_round_down(&mut self, d: &D) {
        self.weaken_non_divisible(d, |_| true);
        self.divide_round_up(d);
    }

    /// Weakens `amount` of the literal `l`.
    pub fn weaken(&mut self, amount: C, l: Lit) {
        if amount.is_zero() {
            return;
        }
        self.proof.add_axiom(-l, &amount);
        self.add_lhs(amount, -l);
    }

    /// Weakens the variable `v` entirely.
    pub fn weaken_var(&mut self, v: i32) {
        let c = self.coef(v);
        if c.is_zero() {
            return;
        }
        let l = fresh(v, c.is_positive());
        self.weaken(c.abs(), l);
    }

    /// Weakens every literal satisfying `to_weaken`.
    pub fn weaken_if(&mut self, to_weaken: impl Fn(Lit) -> bool) {
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            let l = self.lit(v);
            if l != 0 && to_weaken(l) {
                self.weaken_var(v);
            }
        }
    }

    /// Weakens the remainder modulo `d` of each literal satisfying `to_weaken`.
    pub fn weaken_non_divisible(&mut self, d: &D, to_weaken: impl Fn(Lit) -> bool) {
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            let l = self.lit(v);
            if l == 0 || !to_weaken(l) {
                continue;
            }
            let magnitude: D = self.coefs[v as usize].abs().convert();
            let remainder = magnitude.mod_floor(d);
            if !remainder.is_zero() {
                self.weaken(remainder.convert(), l);
            }
        }
    }

    /// Weakens remainders of literals satisfying `to_weaken`, then divides by `d` and saturates.
    pub fn weaken_divide_round(&mut self, d: &D, to_weaken: impl Fn(Lit) -> bool) {
        self.weaken_non_divisible(d, to_weaken);
        self.remove_zeroes();
        self.divide_round_up(d);
        self.saturate();
    }

    /// Caps each coefficient at the degree.
    ///
    /// If the degree is not positive the expression is reset to the trivial expression.
    pub fn saturate(&mut self) {
        if !self.degree.is_positive() {
            let orig = self.orig;
            let proof = std::mem::take(&mut self.proof);
            self.reset();
            self.orig = orig;
            self.proof = proof;
            return;
        }
        let mut changed = false;
        let mut rhs = self.degree.clone();
        for v in &self.vars {
            let c = &mut self.coefs[*v as usize];
            let magnitude: D = c.abs().convert();
            if magnitude > self.degree {
                let capped: C = self.degree.convert();
                *c = match c.is_negative() {
                    true => -capped,
                    false => capped,
                };
                changed = true;
            }
            if c.is_negative() {
                rhs = rhs + c.convert::<D>();
            }
        }
        self.rhs = rhs;
        if changed {
            self.proof.saturate();
        }
    }

    /// Whether no coefficient exceeds the degree.
    pub fn is_saturated(&self) -> bool {
        self.vars
            .iter()
            .all(|v| self.coefs[*v as usize].abs().convert::<D>() <= self.degree)
    }

    /// Literals whose coefficient is at least the degree.
    pub fn saturated_lits(&self) -> Vec<Lit> {
        self.vars
            .iter()
            .filter_map(|v| {
                let c = &self.coefs[*v as usize];
                match !c.is_zero() && c.abs().convert::<D>() >= self.degree {
                    true => Some(fresh(*v, c.is_positive())),
                    false => None,
                }
            })
            .collect()
    }

    /// Adds `m` times `other` to the expression.
    pub fn add_up(&mut self, other: &ConstrExp<C, D>, m: &C) {
        debug_assert!(m.is_positive());
        let m_deg: D = m.convert();
        self.proof.add_scaled(&other.proof, m);
        let scaled_rhs = other.rhs.clone() * m_deg;
        self.rhs = self.rhs.clone() + scaled_rhs.clone();
        self.degree = self.degree.clone() + scaled_rhs;
        for v in &other.vars {
            let c = &other.coefs[*v as usize];
            if !c.is_zero() {
                self.add(*v, c.clone() * m.clone());
            }
        }
    }

    /// Removes variables with a zero coefficient.
    pub fn remove_zeroes(&mut self) {
        let coefs = &self.coefs;
        let used = &mut self.used;
        self.vars.retain(|v| {
            let keep = !coefs[*v as usize].is_zero();
            if !keep {
                used[*v as usize] = false;
            }
            keep
        });
    }

    /// Removes literals assigned at level zero, and variables with a zero coefficient.
    ///
    /// True literals are weakened, and false literals are removed by addition of the unit fact falsifying them.
    pub fn remove_units_and_zeroes(&mut self, trail: &Trail) {
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            let l = self.lit(v);
            if l == 0 || v > trail.max_var() {
                continue;
            }
            if trail.is_unit(l) {
                self.weaken_var(v);
            } else if trail.is_unit(-l) {
                let c = self.coefs[v as usize].abs();
                self.proof.add_unit(-l, &c);
                self.add_lhs(c.clone(), -l);
                self.add_rhs(c.convert());
            }
        }
        self.remove_zeroes();
    }

    /// The greatest common divisor of the coefficients, or zero if there are no coefficients.
    pub fn coef_gcd(&self) -> C {
        let mut gcd = C::zero();
        for v in &self.vars {
            let c = &self.coefs[*v as usize];
            if c.is_zero() {
                continue;
            }
            gcd = gcd.gcd(c);
            if gcd.is_one() {
                break;
            }
        }
        gcd
    }

    /// Divides by the greatest common divisor of the coefficients, if greater than one.
    pub fn divide_by_gcd(&mut self) -> bool {
        let gcd = self.coef_gcd();
        match gcd > C::one() {
            true => {
                self.divide_round_up(&gcd.convert());
                true
            }
            false => false,
        }
    }

    /// Reverses the inequality, so the expression represents Σ -c·x ≥ -rhs.
    ///
    /// Not sound, and only of use when building expressions, e.g. for an upper bound.
    pub fn invert(&mut self) {
        self.rhs = -self.rhs.clone();
        for v in &self.vars {
            let c = &mut self.coefs[*v as usize];
            *c = -c.clone();
        }
        let mut degree = self.rhs.clone();
        for v in &self.vars {
            let c = &self.coefs[*v as usize];
            if c.is_negative() {
                degree = degree - c.convert::<D>();
            }
        }
        self.degree = degree;
    }
}

#[cfg(test)]
mod tests {
    use crate::ce::ConstrExp;

    fn ce(terms: &[(i64, i32)], rhs: i128) -> ConstrExp<i64, i128> {
        let mut ce = ConstrExp::default();
        for (c, l) in terms {
            ce.add_lhs(*c, *l);
        }
        ce.add_rhs(rhs);
        ce
    }

    #[test]
    fn add_up_sums_degree_and_rhs() {
        let mut a = ce(&[(3, 1), (2, -2)], 3);
        let b = ce(&[(1, 3), (4, 4)], 2);
        let (degree_a, rhs_a) = (*a.degree(), *a.rhs());
        let (degree_b, rhs_b) = (*b.degree(), *b.rhs());
        a.add_up(&b, &1);
        assert_eq!(*a.degree(), degree_a + degree_b);
        assert_eq!(*a.rhs(), rhs_a + rhs_b);
    }

    #[test]
    fn division_rounds_up() {
        // 3x1 + 2x2 + x3 >= 4, halved, is 2x1 + x2 + x3 >= 2
        let mut a = ce(&[(3, 1), (2, 2), (1, 3)], 4);
        a.divide_round_up(&2);
        assert_eq!(a.to_string(), "+2 x1 +1 x2 +1 x3 >= 2");
    }

    #[test]
    fn division_is_monotone() {
        let original = ce(&[(3, 1), (5, -2), (1, 3)], 4);
        let mut weakened = original.clone();
        weakened.divide_round_up(&2);
        weakened.multiply(&2);
        // every assignment satisfying the original satisfies the weakened expression
        for mask in 0..8_u32 {
            let value = |l: i32| {
                let bit = mask & (1 << (l.abs() - 1)) != 0;
                match l > 0 {
                    true => bit,
                    false => !bit,
                }
            };
            if original.is_satisfied_by(value) {
                assert!(weakened.is_satisfied_by(value));
            }
        }
    }

    #[test]
    fn saturation_caps_coefficients() {
        let mut a = ce(&[(5, 1), (7, -2), (1, 3)], 3);
        a.saturate();
        assert_eq!(a.get_coef(1), 3);
        assert_eq!(a.get_coef(-2), 3);
        assert_eq!(*a.degree(), 3);
        assert_eq!(*a.rhs(), 0);
        assert!(a.is_saturated());
    }

    #[test]
    fn weakening_lowers_degree() {
        let mut a = ce(&[(3, 1), (2, -2)], 3);
        a.weaken(2, -2);
        assert_eq!(*a.degree(), 1);
        assert_eq!(a.get_coef(-2), 0);
        a.weaken(1, 1);
        assert_eq!(*a.degree(), 0);
        assert_eq!(a.get_coef(1), 2);
    }

    #[test]
    fn gcd_division() {
        let mut a = ce(&[(4, 1), (6, 2)], 5);
        assert!(a.divide_by_gcd());
        assert_eq!(a.to_string(), "+2 x1 +3 x2 >= 3");
        assert!(!a.divide_by_gcd());
    }
}
