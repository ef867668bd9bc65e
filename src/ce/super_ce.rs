//! Constraint expressions of any tier.
//!
//! A [CeSuper] holds a pooled expression of one of the five tiers, and dispatches the tier independent operations of an expression to the expression held.
//! The [ce_apply] macro applies an expression to whichever expression is held, and [TierKind] links a tier to its number types and pool, for code generic over tiers.

use std::collections::HashSet;

use num_bigint::BigInt;

use crate::{
    ce::{
        pool::{CePools, Pool, Pooled},
        proof::ProofBuffer,
        resolution::ResolveOptions,
        ConstrExp,
    },
    db::trail::Trail,
    numeric::{Number, Tier},
    reports::AssertionStatus,
    structures::{
        literal::{Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
        term::Term,
    },
};

/// A pooled constraint expression of some tier.
#[derive(Debug)]
pub enum CeSuper {
    Ce32(Pooled<i32, i64>),
    Ce64(Pooled<i64, i128>),
    Ce96(Pooled<i128, i128>),
    Ce128(Pooled<i128, BigInt>),
    Arb(Pooled<BigInt, BigInt>),
}

/// Evaluates `$body` with `$name` bound to the expression held by a [CeSuper].
macro_rules! ce_apply {
    ($ce:expr, $name:ident => $body:expr) => {
        match $ce {
            $crate::ce::super_ce::CeSuper::Ce32($name) => $body,
            $crate::ce::super_ce::CeSuper::Ce64($name) => $body,
            $crate::ce::super_ce::CeSuper::Ce96($name) => $body,
            $crate::ce::super_ce::CeSuper::Ce128($name) => $body,
            $crate::ce::super_ce::CeSuper::Arb($name) => $body,
        }
    };
}
pub(crate) use ce_apply;

/// A tier, as a type.
pub trait TierKind: 'static {
    type C: Number;
    type D: Number;
    const TIER: Tier;

    fn pool(pools: &CePools) -> &Pool<Self::C, Self::D>;

    fn wrap(ce: Pooled<Self::C, Self::D>) -> CeSuper;
}

macro_rules! tier_kind {
    ($kind:ident, $c:ty, $d:ty, $tier:expr, $field:ident, $variant:ident) => {
        #[derive(Clone, Copy, Debug)]
        pub struct $kind;

        impl TierKind for $kind {
            type C = $c;
            type D = $d;
            const TIER: Tier = $tier;

            fn pool(pools: &CePools) -> &Pool<$c, $d> {
                &pools.$field
            }

            fn wrap(ce: Pooled<$c, $d>) -> CeSuper {
                CeSuper::$variant(ce)
            }
        }
    };
}

tier_kind!(K32, i32, i64, Tier::T32, t32, Ce32);
tier_kind!(K64, i64, i128, Tier::T64, t64, Ce64);
tier_kind!(K96, i128, i128, Tier::T96, t96, Ce96);
tier_kind!(K128, i128, BigInt, Tier::T128, t128, Ce128);
tier_kind!(KArb, BigInt, BigInt, Tier::Arb, arb, Arb);

fn copy_to_tier<C: Number, D: Number>(ce: &ConstrExp<C, D>, tier: Tier, pools: &CePools) -> Option<CeSuper> {
    let mut out = pools.take(tier);
    let copied = ce_apply!(&mut out, target => ce.copy_into(&mut **target));
    match copied {
        true => Some(out),
        false => None,
    }
}

impl CeSuper {
    pub fn tier(&self) -> Tier {
        match self {
            CeSuper::Ce32(_) => Tier::T32,
            CeSuper::Ce64(_) => Tier::T64,
            CeSuper::Ce96(_) => Tier::T96,
            CeSuper::Ce128(_) => Tier::T128,
            CeSuper::Arb(_) => Tier::Arb,
        }
    }

    /// A copy of the expression in the given tier, if every value fits.
    pub fn convert(&self, tier: Tier, pools: &CePools) -> Option<CeSuper> {
        ce_apply!(self, ce => copy_to_tier(&**ce, tier, pools))
    }

    /// A copy of the expression in the narrowest tier at least as wide as `tier` in which every value fits.
    pub fn convert_at_least(&self, tier: Tier, pools: &CePools) -> CeSuper {
        for candidate in Tier::ALL.into_iter().filter(|t| *t >= tier) {
            if let Some(converted) = self.convert(candidate, pools) {
                return converted;
            }
        }
        unreachable!("! Every expression fits in arbitrary precision")
    }

    /// A copy of the expression, in the same tier.
    pub fn clone_in(&self, pools: &CePools) -> CeSuper {
        self.convert_at_least(self.tier(), pools)
    }

    /// The narrowest tier in which the expression may be stored.
    pub fn storage_tier(&self) -> Tier {
        Tier::for_storage(self.largest_coef_bits(), self.degree_bits().max(self.rhs_bits()))
    }

    /// Resolves the expression with `reason` on `asserting`, converting the reason to the tier of the expression.
    ///
    /// See [generic_resolve](ConstrExp::generic_resolve).
    pub fn resolve_with(
        &mut self,
        reason: &CeSuper,
        asserting: Lit,
        trail: &Trail,
        options: &ResolveOptions,
        act: &mut Vec<Var>,
        pools: &CePools,
    ) -> u32 {
        let mut reason = reason.convert_at_least(self.tier(), pools);
        match (self, &mut reason) {
            (CeSuper::Ce32(a), CeSuper::Ce32(b)) => a.generic_resolve(&mut **b, asserting, trail, options, act),
            (CeSuper::Ce64(a), CeSuper::Ce64(b)) => a.generic_resolve(&mut **b, asserting, trail, options, act),
            (CeSuper::Ce96(a), CeSuper::Ce96(b)) => a.generic_resolve(&mut **b, asserting, trail, options, act),
            (CeSuper::Ce128(a), CeSuper::Ce128(b)) => a.generic_resolve(&mut **b, asserting, trail, options, act),
            (CeSuper::Arb(a), CeSuper::Arb(b)) => a.generic_resolve(&mut **b, asserting, trail, options, act),
            _ => unreachable!("! A reason wider than the analysis tier survived overflow reduction"),
        }
    }

    /// See [generic_subsume](ConstrExp::generic_subsume).
    pub fn subsume_with(&mut self, reason: &CeSuper, to_subsume: Lit, trail: &Trail, saturated: &mut HashSet<Lit>) -> u32 {
        ce_apply!(self, a => ce_apply!(reason, b => a.generic_subsume(&**b, to_subsume, trail, saturated)))
    }

    /// Adds `m` times `other`, converting `other` to the tier of the expression.
    ///
    /// # Panics
    /// If `other` does not fit in the tier of the expression.
    pub fn add_up(&mut self, other: &CeSuper, m: &BigInt, pools: &CePools) {
        let Some(mut other) = other.convert(self.tier(), pools) else {
            panic!("! Addition of an expression wider than the tier of the sum");
        };
        match (self, &mut other) {
            (CeSuper::Ce32(a), CeSuper::Ce32(b)) => a.add_up(&**b, &m.convert()),
            (CeSuper::Ce64(a), CeSuper::Ce64(b)) => a.add_up(&**b, &m.convert()),
            (CeSuper::Ce96(a), CeSuper::Ce96(b)) => a.add_up(&**b, &m.convert()),
            (CeSuper::Ce128(a), CeSuper::Ce128(b)) => a.add_up(&**b, &m.convert()),
            (CeSuper::Arb(a), CeSuper::Arb(b)) => a.add_up(&**b, m),
            _ => unreachable!(),
        }
    }

    pub fn len(&self) -> usize {
        ce_apply!(self, ce => ce.len())
    }

    pub fn is_empty(&self) -> bool {
        ce_apply!(self, ce => ce.is_empty())
    }

    pub fn vars(&self) -> Vec<Var> {
        ce_apply!(self, ce => ce.support())
    }

    pub fn lit(&self, v: Var) -> Lit {
        ce_apply!(self, ce => ce.lit(v))
    }

    pub fn has_lit(&self, l: Lit) -> bool {
        ce_apply!(self, ce => ce.has_lit(l))
    }

    pub fn get_coef(&self, l: Lit) -> BigInt {
        ce_apply!(self, ce => ce.get_coef(l).to_big())
    }

    pub fn degree(&self) -> BigInt {
        ce_apply!(self, ce => ce.degree().to_big())
    }

    pub fn rhs(&self) -> BigInt {
        ce_apply!(self, ce => ce.rhs().to_big())
    }

    /// The terms of the normalised expression.
    pub fn terms(&self) -> Vec<Term<BigInt>> {
        ce_apply!(self, ce => ce.terms().map(|t| Term::new(t.c.to_big(), t.l)).collect())
    }

    pub fn origin(&self) -> Origin {
        ce_apply!(self, ce => ce.orig)
    }

    pub fn set_origin(&mut self, origin: Origin) {
        ce_apply!(self, ce => ce.orig = origin)
    }

    pub fn proof(&self) -> &ProofBuffer {
        ce_apply!(self, ce => &ce.proof)
    }

    pub fn proof_mut(&mut self) -> &mut ProofBuffer {
        ce_apply!(self, ce => &mut ce.proof)
    }

    pub fn add_lhs(&mut self, c: &BigInt, l: Lit) {
        ce_apply!(self, ce => ce.add_lhs(c.convert(), l))
    }

    pub fn add_rhs(&mut self, r: &BigInt) {
        ce_apply!(self, ce => ce.add_rhs(r.convert()))
    }

    /// Extends the expression by a simple constraint, returning false if some value does not fit.
    pub fn extend_from_simple(&mut self, simple: &ConstrSimple) -> bool {
        ce_apply!(self, ce => ce.extend_from_simple(simple))
    }

    pub fn to_simple(&self) -> ConstrSimple {
        ce_apply!(self, ce => ce.to_simple())
    }

    pub fn is_tautology(&self) -> bool {
        ce_apply!(self, ce => ce.is_tautology())
    }

    pub fn is_inconsistency(&self) -> bool {
        ce_apply!(self, ce => ce.is_inconsistency())
    }

    pub fn is_clause(&self) -> bool {
        ce_apply!(self, ce => ce.is_clause())
    }

    pub fn is_cardinality(&self) -> bool {
        ce_apply!(self, ce => ce.is_cardinality())
    }

    pub fn cardinality_degree(&self) -> usize {
        ce_apply!(self, ce => ce.cardinality_degree())
    }

    pub fn strength(&self) -> f64 {
        ce_apply!(self, ce => ce.strength())
    }

    pub fn largest_coef_bits(&self) -> u32 {
        ce_apply!(self, ce => ce.largest_coef_bits())
    }

    pub fn degree_bits(&self) -> u32 {
        ce_apply!(self, ce => ce.degree_bits())
    }

    pub fn rhs_bits(&self) -> u32 {
        ce_apply!(self, ce => ce.rhs().msb())
    }

    pub fn saturated_lits(&self) -> Vec<Lit> {
        ce_apply!(self, ce => ce.saturated_lits())
    }

    pub fn is_satisfied_by(&self, value: impl Fn(Lit) -> bool) -> bool {
        ce_apply!(self, ce => ce.is_satisfied_by(&value))
    }

    pub fn has_negative_slack(&self, trail: &Trail) -> bool {
        ce_apply!(self, ce => ce.has_negative_slack(trail))
    }

    pub fn lbd(&self, trail: &Trail) -> u32 {
        ce_apply!(self, ce => ce.lbd(trail))
    }

    pub fn is_asserting_before(&self, trail: &Trail, lvl: i32) -> AssertionStatus {
        ce_apply!(self, ce => ce.is_asserting_before(trail, lvl))
    }

    pub fn assertion_status(&self, trail: &Trail) -> (i32, bool) {
        ce_apply!(self, ce => ce.assertion_status(trail))
    }

    pub fn remove_units_and_zeroes(&mut self, trail: &Trail) {
        ce_apply!(self, ce => ce.remove_units_and_zeroes(trail))
    }

    pub fn remove_zeroes(&mut self) {
        ce_apply!(self, ce => ce.remove_zeroes())
    }

    pub fn saturate(&mut self) {
        ce_apply!(self, ce => ce.saturate())
    }

    pub fn divide_by_gcd(&mut self) -> bool {
        ce_apply!(self, ce => ce.divide_by_gcd())
    }

    pub fn fix_overflow(&mut self, trail: &Trail, bits_overflow: u32, bits_reduced: u32, asserting: Lit) -> bool {
        ce_apply!(self, ce => ce.fix_overflow(trail, bits_overflow, bits_reduced, asserting))
    }

    pub fn saturate_and_fix_overflow_rational(&mut self, solution: &[f64], bits_overflow: u32, bits_reduced: u32) -> bool {
        ce_apply!(self, ce => ce.saturate_and_fix_overflow_rational(solution, bits_overflow, bits_reduced))
    }

    pub fn heuristic_weakening(&mut self, trail: &Trail) {
        ce_apply!(self, ce => ce.heuristic_weakening(trail))
    }

    pub fn weaken_non_falsified(&mut self, trail: &Trail) {
        ce_apply!(self, ce => ce.weaken_non_falsified(trail))
    }

    pub fn weaken_var(&mut self, v: Var) {
        ce_apply!(self, ce => ce.weaken_var(v))
    }

    /// Weakens every literal satisfying `to_weaken`, and removes the zeroes left behind.
    pub fn weaken_if(&mut self, to_weaken: impl Fn(Lit) -> bool) {
        ce_apply!(self, ce => {
            ce.weaken_if(&to_weaken);
            ce.remove_zeroes();
        })
    }

    /// Multiplies the expression by a positive `m`.
    pub fn multiply(&mut self, m: &BigInt) {
        ce_apply!(self, ce => ce.multiply(&m.convert()))
    }

    pub fn simplify_to_cardinality(&mut self, equivalence_preserving: bool) -> bool {
        ce_apply!(self, ce => ce.simplify_to_cardinality(equivalence_preserving))
    }

    pub fn simplify_to_clause(&mut self) {
        ce_apply!(self, ce => ce.simplify_to_clause())
    }

    pub fn simplify_to_unit(&mut self, trail: &Trail, unit: Lit) {
        ce_apply!(self, ce => ce.simplify_to_unit(trail, unit))
    }

    pub fn sort_in_decreasing_coef_order(&mut self) {
        ce_apply!(self, ce => ce.sort_in_decreasing_coef_order())
    }
}

impl std::fmt::Display for CeSuper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ce_apply!(self, ce => write!(f, "{}", **ce))
    }
}
