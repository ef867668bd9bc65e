/*!
Constraint expressions, mutable linear pseudo-Boolean expressions used as scratch space.

A [ConstrExp] over coefficient type `C` and degree type `D` represents Σ c·x ≥ rhs over variables x, where coefficients are signed.
Equivalently, the expression represents the normalised constraint Σ |c|·l ≥ degree, where l is x if c is positive and ¬x otherwise, and
degree = rhs + Σ_{c < 0} |c|.

Both the rhs and the degree are maintained by every operation, as the degree is the propagation threshold while the rhs is used when combining expressions.

Expressions are checked out of a [pool](pool) and return to the pool when dropped, and the [tier](crate::numeric::Tier) of an expression is recorded by the variant of [CeSuper](super_ce::CeSuper) which holds it.

Operations are split across modules:
- [arithmetic] for cutting planes rules (addition, multiplication, division, saturation, weakening).
- [overflow] for reduction of coefficients to a bit budget.
- [simplify] for reduction to cardinality constraints, clauses, and units.
- [resolution] for resolution and self-subsumption during conflict analysis.

```rust
# use otter_pb::ce::ConstrExp;
# use num_bigint::BigInt;
let mut ce = ConstrExp::<i32, i64>::default();
ce.add_lhs(3, 1);
ce.add_lhs(2, -2);
ce.add_rhs(2);
assert_eq!(ce.to_string(), "+3 x1 +2 ~x2 >= 4");
assert_eq!(*ce.degree(), 4);
assert_eq!(*ce.rhs(), 2);
```
*/

pub mod arithmetic;
pub mod overflow;
pub mod pool;
pub mod proof;
pub mod resolution;
pub mod simplify;
pub mod super_ce;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::{
    db::trail::Trail,
    numeric::{negpart, Number},
    structures::{
        literal::{fresh, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
        term::Term,
    },
};

use proof::ProofBuffer;

/// A constraint expression, Σ c·x ≥ rhs with signed coefficients.
#[derive(Clone, Debug, Default)]
pub struct ConstrExp<C: Number, D: Number> {
    pub(crate) vars: Vec<Var>,
    pub(crate) coefs: Vec<C>,
    pub(crate) used: Vec<bool>,
    pub(crate) rhs: D,
    pub(crate) degree: D,
    pub orig: Origin,
    pub proof: ProofBuffer,
}

impl<C: Number, D: Number> ConstrExp<C, D> {
    /// Clears the expression to the trivial constraint 0 ≥ 0, keeping allocations.
    pub fn reset(&mut self) {
        for v in self.vars.drain(..) {
            self.coefs[v as usize] = C::zero();
            self.used[v as usize] = false;
        }
        self.rhs = D::zero();
        self.degree = D::zero();
        self.orig = Origin::Unknown;
        self.proof.clear();
    }

    fn ensure(&mut self, v: Var) {
        let required = v as usize + 1;
        if self.coefs.len() < required {
            self.coefs.resize(required, C::zero());
            self.used.resize(required, false);
        }
    }

    /// The variables of the expression, which may include variables with a zero coefficient.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// A count of variables with non-zero coefficient.
    pub fn len(&self) -> usize {
        self.vars
            .iter()
            .filter(|v| !self.coefs[**v as usize].is_zero())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rhs(&self) -> &D {
        &self.rhs
    }

    pub fn degree(&self) -> &D {
        &self.degree
    }

    /// The signed coefficient of `v`.
    pub fn coef(&self, v: Var) -> C {
        match self.coefs.get(v as usize) {
            Some(c) => c.clone(),
            None => C::zero(),
        }
    }

    /// The coefficient of `l`, which is negative if ¬l occurs in the expression.
    pub fn get_coef(&self, l: Lit) -> C {
        match l < 0 {
            true => -self.coef(-l),
            false => self.coef(l),
        }
    }

    /// The literal of `v` in the normalised expression, or zero if `v` does not occur.
    pub fn lit(&self, v: Var) -> Lit {
        let c = self.coef(v);
        match c.is_zero() {
            true => 0,
            false => fresh(v, c.is_positive()),
        }
    }

    /// Whether `l` occurs in the normalised expression.
    pub fn has_lit(&self, l: Lit) -> bool {
        self.get_coef(l).is_positive()
    }

    pub fn has_var(&self, v: Var) -> bool {
        !self.coef(v).is_zero()
    }

    /// The terms of the normalised expression, with positive coefficients.
    pub fn terms(&self) -> impl Iterator<Item = Term<C>> + '_ {
        self.vars.iter().filter_map(|v| {
            let c = &self.coefs[*v as usize];
            match c.is_zero() {
                true => None,
                false => Some(Term::new(c.abs(), fresh(*v, c.is_positive()))),
            }
        })
    }

    /// Adds `c` to the signed coefficient of `v`.
    pub fn add(&mut self, v: Var, c: C) {
        if c.is_zero() {
            return;
        }
        self.ensure(v);
        let index = v as usize;
        if !self.used[index] {
            self.used[index] = true;
            self.vars.push(v);
        }
        let old: D = negpart(&self.coefs[index]).convert();
        self.coefs[index] = self.coefs[index].clone() + c;
        let new: D = negpart(&self.coefs[index]).convert();
        self.degree = self.degree.clone() + new - old;
    }

    /// Adds the term `cf·l` to the left hand side.
    pub fn add_lhs(&mut self, cf: C, l: Lit) {
        debug_assert!(l != 0);
        match l < 0 {
            true => {
                self.add_rhs(-cf.convert::<D>());
                self.add(-l, -cf);
            }
            false => self.add(l, cf),
        }
    }

    /// Adds `r` to the right hand side.
    pub fn add_rhs(&mut self, r: D) {
        self.rhs = self.rhs.clone() + r.clone();
        self.degree = self.degree.clone() + r;
    }

    /// Sets the degree, revising the rhs to match.
    pub(crate) fn set_degree(&mut self, degree: D) {
        self.degree = degree;
        self.repair_rhs();
    }

    /// Recomputes the rhs from the degree and coefficients.
    pub(crate) fn repair_rhs(&mut self) {
        let mut rhs = self.degree.clone();
        for v in &self.vars {
            let c = &self.coefs[*v as usize];
            if c.is_negative() {
                rhs = rhs + c.convert::<D>();
            }
        }
        self.rhs = rhs;
    }

    /// The largest absolute coefficient, or zero.
    pub fn largest_coef(&self) -> C {
        let mut largest = C::zero();
        for v in &self.vars {
            let c = self.coefs[*v as usize].abs();
            if c > largest {
                largest = c;
            }
        }
        largest
    }

    /// The sum of absolute coefficients.
    pub fn abs_coef_sum(&self) -> D {
        let mut sum = D::zero();
        for v in &self.vars {
            sum = sum + self.coefs[*v as usize].abs().convert::<D>();
        }
        sum
    }

    /// Whether the expression is trivially satisfied.
    pub fn is_tautology(&self) -> bool {
        !self.degree.is_positive()
    }

    /// Whether the expression can not be satisfied by any assignment.
    pub fn is_inconsistency(&self) -> bool {
        self.abs_coef_sum() < self.degree
    }

    /// Σ |c| over literals which are not false, less the degree.
    pub fn slack(&self, trail: &Trail) -> D {
        let mut slack = -self.degree.clone();
        for v in &self.vars {
            let c = &self.coefs[*v as usize];
            if c.is_zero() {
                continue;
            }
            if !trail.is_false(fresh(*v, c.is_positive())) {
                slack = slack + c.abs().convert::<D>();
            }
        }
        slack
    }

    pub fn has_negative_slack(&self, trail: &Trail) -> bool {
        self.slack(trail).is_negative()
    }

    /// Whether the expression is satisfied by a total assignment, given as the literals true under the assignment.
    pub fn is_satisfied_by(&self, value: impl Fn(Lit) -> bool) -> bool {
        let mut sum = D::zero();
        for term in self.terms() {
            if value(term.l) {
                sum = sum + term.c.convert::<D>();
            }
        }
        sum >= self.degree
    }

    /// The normalised expression as a simple constraint.
    pub fn to_simple(&self) -> ConstrSimple {
        ConstrSimple {
            terms: self.terms().map(|t| Term::new(t.c.to_big(), t.l)).collect(),
            rhs: self.degree.to_big(),
        }
    }

    /// Builds the expression from a simple constraint, if every value fits.
    pub fn extend_from_simple(&mut self, simple: &ConstrSimple) -> bool {
        for term in &simple.terms {
            match term.c.try_convert::<C>() {
                Some(c) => self.add_lhs(c, term.l),
                None => return false,
            }
        }
        match simple.rhs.try_convert::<D>() {
            Some(rhs) => self.add_rhs(rhs),
            None => return false,
        }
        true
    }

    /// Copies the expression into an expression of another tier, if every value fits.
    pub fn copy_into<C2: Number, D2: Number>(&self, out: &mut ConstrExp<C2, D2>) -> bool {
        out.reset();
        let (Some(rhs), Some(degree)) = (self.rhs.try_convert::<D2>(), self.degree.try_convert::<D2>()) else {
            return false;
        };
        for v in &self.vars {
            let c = &self.coefs[*v as usize];
            if c.is_zero() {
                continue;
            }
            match c.try_convert::<C2>() {
                Some(c2) => {
                    out.ensure(*v);
                    out.used[*v as usize] = true;
                    out.coefs[*v as usize] = c2;
                    out.vars.push(*v);
                }
                None => {
                    out.reset();
                    return false;
                }
            }
        }
        out.rhs = rhs;
        out.degree = degree;
        out.orig = self.orig;
        out.proof.copy_from(&self.proof);
        true
    }

    /// The sum of the coefficients of literals in `lits`, as a big integer.
    pub fn coef_sum_of(&self, lits: impl Iterator<Item = Lit>) -> BigInt {
        let mut sum = BigInt::zero();
        for l in lits {
            let c = self.get_coef(l);
            if c.is_positive() {
                sum += c.to_big();
            }
        }
        sum
    }

    /// Whether every coefficient is one.
    pub fn has_unit_coefs(&self) -> bool {
        self.vars.iter().all(|v| {
            let c = &self.coefs[*v as usize];
            c.is_zero() || c.abs().is_one()
        })
    }

    /// Variables with non-zero coefficient, in the order of the expression.
    pub fn support(&self) -> Vec<Var> {
        self.vars
            .iter()
            .copied()
            .filter(|v| !self.coefs[*v as usize].is_zero())
            .collect()
    }
}

impl<C: Number, D: Number> std::fmt::Display for ConstrExp<C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in self.terms() {
            write!(f, "{term} ")?;
        }
        write!(f, ">= {}", self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalisation() {
        let mut ce = ConstrExp::<i64, i128>::default();
        ce.add_lhs(-3, 1);
        ce.add_lhs(2, 2);
        ce.add_rhs(-1);
        // -3x1 + 2x2 >= -1, or 3~x1 + 2x2 >= 2
        assert_eq!(ce.lit(1), -1);
        assert_eq!(*ce.degree(), 2);
        assert_eq!(*ce.rhs(), -1);
        assert_eq!(ce.get_coef(-1), 3);
        assert!(ce.has_lit(-1));
        assert!(!ce.has_lit(1));
    }

    #[test]
    fn cancellation_reduces_degree() {
        let mut ce = ConstrExp::<i32, i64>::default();
        ce.add_lhs(2, 1);
        ce.add_rhs(1);
        ce.add_lhs(1, -1);
        // 2x1 + ~x1 >= 1 is x1 >= 0
        assert_eq!(ce.get_coef(1), 1);
        assert_eq!(*ce.degree(), 0);
        assert!(ce.is_tautology());
    }

    #[test]
    fn slack_under_trail() {
        let mut trail = Trail::default();
        trail.grow(3);
        let mut ce = ConstrExp::<i32, i64>::default();
        for l in [1, 2, 3] {
            ce.add_lhs(1, l);
        }
        ce.add_rhs(2);
        assert_eq!(ce.slack(&trail), 1);
        trail.decide(-1);
        assert_eq!(ce.slack(&trail), 0);
        trail.assign(-2, None);
        assert!(ce.has_negative_slack(&trail));
    }

    #[test]
    fn copy_between_tiers() {
        let mut wide = ConstrExp::<BigInt, BigInt>::default();
        wide.add_lhs(BigInt::from(1_i64 << 40), 1);
        wide.add_lhs(BigInt::from(1), -2);
        wide.add_rhs(BigInt::from(1_i64 << 40));

        let mut narrow = ConstrExp::<i32, i64>::default();
        assert!(!wide.copy_into(&mut narrow));
        assert!(narrow.is_empty());

        let mut medium = ConstrExp::<i64, i128>::default();
        assert!(wide.copy_into(&mut medium));
        assert_eq!(medium.get_coef(1), 1_i64 << 40);
        assert_eq!(*medium.degree(), (1_i128 << 40) + 1);
    }
}
