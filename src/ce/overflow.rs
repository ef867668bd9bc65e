//! Reduction of coefficients to a bit budget.
//!
//! During conflict analysis coefficients grow through multiplication.
//! When the largest coefficient, or the degree scaled down by [INF], reaches the overflow budget, the expression is divided so that every value is below the reduced budget.
//!
//! Before division the remainders of literals which are not false are weakened, so division is exact on those literals and the expression remains falsified (or propagating) under the assignment which made it so.
//! Coefficients of false literals (and of the literal being asserted, if any) are rounded up instead.

use crate::{
    ce::ConstrExp,
    db::trail::Trail,
    numeric::{ceildiv, powtwo, Number, INF},
    structures::literal::{var, Lit},
};

impl<C: Number, D: Number> ConstrExp<C, D> {
    /// The value checked against an overflow budget: the larger of the largest coefficient and the degree (or rhs) scaled down by [INF].
    fn overflow_measure(&self) -> D {
        let inf = D::from_i64(INF).unwrap_or_else(D::one);
        let bound = self.degree.abs().max(self.rhs.abs());
        let scaled = bound / inf;
        let largest: D = self.largest_coef().convert();
        largest.max(scaled)
    }

    /// Whether the expression breaches the overflow budget of `bits_overflow` bits.
    pub fn is_overflowing(&self, bits_overflow: u32) -> bool {
        bits_overflow > 0 && self.overflow_measure().msb() >= bits_overflow
    }

    /// Divides the expression so coefficients fit in `bits_reduced` bits if the overflow budget of `bits_overflow` bits has been breached.
    ///
    /// Literals which are false on the trail, and `asserting`, are protected from weakening.
    /// Returns true if the expression was reduced.
    ///
    /// # Soundness
    /// The expression should be saturated and free of zero coefficients.
    pub fn fix_overflow(&mut self, trail: &Trail, bits_overflow: u32, bits_reduced: u32, asserting: Lit) -> bool {
        self.fix_overflow_with(bits_overflow, bits_reduced, |l| {
            l != asserting && (var(l) > trail.max_var() || !trail.is_false(l))
        })
    }

    /// Saturates, and then fixes any overflow.
    pub fn saturate_and_fix_overflow(&mut self, trail: &Trail, bits_overflow: u32, bits_reduced: u32, asserting: Lit) -> bool {
        self.saturate();
        self.fix_overflow(trail, bits_overflow, bits_reduced, asserting)
    }

    /// Saturates, and then fixes any overflow, weakening literals judged true or unknown by a fractional assignment.
    ///
    /// A literal is protected from weakening if its value in `solution` (indexed by variable, with the value of the positive literal) is at most one half.
    pub fn saturate_and_fix_overflow_rational(&mut self, solution: &[f64], bits_overflow: u32, bits_reduced: u32) -> bool {
        self.saturate();
        self.fix_overflow_with(bits_overflow, bits_reduced, |l| {
            let value = solution.get(var(l) as usize).copied().unwrap_or(0.5);
            let value = match l < 0 {
                true => 1.0 - value,
                false => value,
            };
            value > 0.5
        })
    }

    /// Fixes overflow, weakening the remainders of literals satisfying `to_weaken`.
    pub(crate) fn fix_overflow_with(&mut self, bits_overflow: u32, bits_reduced: u32, to_weaken: impl Fn(Lit) -> bool) -> bool {
        if !self.is_overflowing(bits_overflow) {
            return false;
        }
        let bits_reduced = bits_reduced.min(bits_overflow.saturating_sub(1)).max(1);
        let limit: D = powtwo::<D>(bits_reduced) - D::one();
        let div = ceildiv(&self.overflow_measure(), &limit);
        debug_assert!(div > D::one());

        log::trace!(target: crate::misc::log::targets::OVERFLOW, "Dividing by {div} to fit {bits_reduced} bits");

        self.weaken_divide_round(&div, to_weaken);
        self.remove_zeroes();
        debug_assert!(!self.is_overflowing(bits_overflow) || self.degree.is_zero());
        true
    }

    /// The bit length of the largest coefficient.
    pub fn largest_coef_bits(&self) -> u32 {
        self.largest_coef().msb()
    }

    pub fn degree_bits(&self) -> u32 {
        self.degree.msb()
    }

    /// Whether the largest coefficient and degree fit within the given bit lengths.
    pub fn fits_in(&self, coef_bits: u32, degree_bits: u32) -> bool {
        self.largest_coef_bits() <= coef_bits && self.degree_bits() <= degree_bits && self.rhs.msb() <= degree_bits
    }

    /// Whether every value of the expression is representable as a double.
    pub fn fits_in_double(&self) -> bool {
        let limit = 1_u32 << 6;
        self.largest_coef_bits() < limit && self.degree_bits() < limit && self.rhs.msb() < limit
    }

    /// Whether the expression has a coefficient of zero for some variable it mentions.
    pub fn has_zeroes(&self) -> bool {
        self.vars.iter().any(|v| self.coefs[*v as usize].is_zero())
    }

    /// Whether the degree is negative, a state which occurs only between arithmetic operations.
    pub fn has_negative_degree(&self) -> bool {
        self.degree.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ce::ConstrExp, db::trail::Trail};

    #[test]
    fn reduction_preserves_falsification() {
        let mut trail = Trail::default();
        trail.grow(4);
        trail.decide(-1);
        trail.assign(-2, None);

        let mut ce = ConstrExp::<i64, i128>::default();
        ce.add_lhs(1_000_000, 1);
        ce.add_lhs(999_999, 2);
        ce.add_lhs(3, 3);
        ce.add_lhs(5, 4);
        ce.add_rhs(1_000_010);
        assert!(ce.has_negative_slack(&trail));

        assert!(ce.fix_overflow(&trail, 12, 8, 0));
        assert!(ce.largest_coef_bits() < 12);
        assert!(ce.has_negative_slack(&trail));
    }

    #[test]
    fn no_reduction_within_budget() {
        let trail = Trail::default();
        let mut ce = ConstrExp::<i32, i64>::default();
        ce.add_lhs(100, 1);
        ce.add_rhs(50);
        assert!(!ce.fix_overflow(&trail, 8, 4, 0));
        assert!(!ce.fix_overflow(&trail, 0, 4, 0));
        assert!(ce.fix_overflow(&trail, 7, 4, 0));
    }
}
