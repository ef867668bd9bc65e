//! Resolution and self-subsumption of constraint expressions, and the assertion status of an expression with respect to a trail.
//!
//! # Resolution
//!
//! Given a conflicting expression containing ¬l and a reason which propagated l, [generic_resolve](ConstrExp::generic_resolve) scales and rounds the reason so that, when added to the conflict, the coefficient of ¬l is cancelled while the sum remains falsified.
//!
//! The reason is first (optionally) multiplied by the coefficient of ¬l in the conflict, and then divided by one of:
//! - The coefficient of l in the reason ([round to one](Division::RoundToOne)).
//! - One more than the slack of the reason ([slack plus one](Division::SlackPlusOne)), when this keeps the multiplier small.
//! - A small divisor greater than the slack of the reason, found by a quick search over factors of two, three, and five ([mindiv](Division::MinDiv)).
//!
//! Before division the remainders of literals which are not false are weakened, so the slack of the reason does not grow.
//! If canceling unknowns is enabled, unassigned literals whose negation occurs in the conflict with a coefficient large enough to absorb rounding are kept.
//!
//! # Self-subsumption
//!
//! When the reason of a falsified literal l, once weakened on literals outside of the saturated literals of the conflict, remains a constraint on l and those literals, the coefficient of ¬l may be removed from the conflict.
//! See [generic_subsume](ConstrExp::generic_subsume).

use std::collections::HashSet;

use crate::{
    ce::ConstrExp,
    config::{Config, Division},
    db::{trail::Trail, MAX_LBD},
    numeric::{ceildiv, Number},
    reports::AssertionStatus,
    structures::literal::{var, Lit, Var},
};

use super::proof::ProofBuffer;

/// The configuration consulted during resolution.
#[derive(Clone, Copy, Debug)]
pub struct ResolveOptions {
    pub multiply: bool,
    pub division: Division,
    pub canceling_unknowns: bool,
    pub bits_overflow: u32,
    pub bits_reduced: u32,
}

impl ResolveOptions {
    pub fn from_config(config: &Config) -> Self {
        ResolveOptions {
            multiply: config.ca_multiply.value,
            division: config.ca_division.value,
            canceling_unknowns: config.ca_cancelingunknowns.value,
            bits_overflow: config.bits_overflow.value,
            bits_reduced: config.bits_reduced(),
        }
    }
}

impl<C: Number, D: Number> ConstrExp<C, D> {
    /// The count of distinct non-zero decision levels among falsified literals, at least one and at most [MAX_LBD].
    pub fn lbd(&self, trail: &Trail) -> u32 {
        let mut levels = HashSet::new();
        for term in self.terms() {
            if var(term.l) > trail.max_var() {
                continue;
            }
            let level = trail.false_level(term.l);
            if trail.is_false(term.l) && level > 0 {
                levels.insert(level);
            }
        }
        (levels.len() as u32).clamp(1, MAX_LBD)
    }

    /// The status of the expression under assignments made before decision level `lvl`.
    pub fn is_asserting_before(&self, trail: &Trail, lvl: i32) -> AssertionStatus {
        let mut slack = -self.degree.clone();
        let mut largest = C::zero();
        for term in self.terms() {
            if trail.false_level(term.l) < lvl {
                continue;
            }
            slack = slack + term.c.convert::<D>();
            if trail.true_level(term.l) >= lvl && term.c > largest {
                largest = term.c;
            }
        }
        if slack >= largest.convert::<D>() {
            AssertionStatus::NonAsserting
        } else if !slack.is_negative() {
            AssertionStatus::Asserting
        } else {
            AssertionStatus::Falsified
        }
    }

    /// The earliest decision level at which the expression is asserting, paired with true.
    ///
    /// If the expression does not assert at any level, the latest level at which the expression is not falsified is paired with false.
    /// A level of -1 indicates the expression is falsified at level zero.
    pub fn assertion_status(&self, trail: &Trail) -> (i32, bool) {
        let dl = trail.decision_level();
        let mut falses: Vec<(i32, D)> = Vec::new();
        let mut unknowns: Vec<(i32, C)> = Vec::new();
        let mut total = D::zero();
        let mut candidates = vec![0];
        for term in self.terms() {
            let fl = trail.false_level(term.l);
            let tl = trail.true_level(term.l);
            total = total + term.c.convert::<D>();
            if fl <= dl {
                falses.push((fl, term.c.convert()));
                candidates.push(fl);
            }
            if tl <= dl {
                candidates.push(tl);
            }
            unknowns.push((fl.min(tl), term.c));
        }
        candidates.push(dl);
        candidates.sort_unstable();
        candidates.dedup();
        falses.sort_by_key(|(level, _)| *level);
        unknowns.sort_by_key(|(level, _)| *level);

        let mut suffix_max = vec![C::zero(); unknowns.len() + 1];
        for index in (0..unknowns.len()).rev() {
            suffix_max[index] = suffix_max[index + 1].clone().max(unknowns[index].1.clone());
        }

        let mut slack = total - self.degree.clone();
        let mut false_index = 0;
        for level in candidates {
            while false_index < falses.len() && falses[false_index].0 <= level {
                slack = slack - falses[false_index].1.clone();
                false_index += 1;
            }
            if slack.is_negative() {
                return (level - 1, false);
            }
            let first_unknown = unknowns.partition_point(|(l, _)| *l <= level);
            if suffix_max[first_unknown].convert::<D>() > slack {
                return (level, true);
            }
        }
        (dl, false)
    }

    /// Weakens unassigned literals whose coefficient is at most `slack`, none of which could be propagated.
    pub fn weaken_non_implied(&mut self, trail: &Trail, slack: &D) {
        for index in 0..self.vars.len() {
            let v = self.vars[index];
            let c = self.coefs[v as usize].abs();
            if !c.is_zero() && trail.is_unknown(v) && c.convert::<D>() <= *slack {
                self.weaken_var(v);
            }
        }
    }

    /// Weakens falsified literals, smallest coefficient first, while the literal with coefficient `prop_coef` remains propagated.
    ///
    /// Returns true if some literal was weakened.
    pub fn weaken_non_implying(&mut self, trail: &Trail, prop_coef: &C, slack: &D) -> bool {
        let mut falsified: Vec<(C, Var)> = self
            .vars
            .iter()
            .filter_map(|v| {
                let c = &self.coefs[*v as usize];
                match !c.is_zero() && trail.is_false(self.lit(*v)) {
                    true => Some((c.abs(), *v)),
                    false => None,
                }
            })
            .collect();
        falsified.sort();

        let mut slack = slack.clone();
        let prop_coef: D = prop_coef.convert();
        let mut weakened = false;
        for (c, v) in falsified {
            let c: D = c.convert();
            if slack.clone() + c.clone() >= prop_coef {
                break;
            }
            slack = slack + c;
            self.weaken_var(v);
            weakened = true;
        }
        weakened
    }

    /// Weakens literals which are neither implying nor implied by the expression, for a propagating expression.
    pub fn heuristic_weakening(&mut self, trail: &Trail) {
        let slack = self.slack(trail);
        if slack.is_negative() {
            return;
        }
        let mut prop_coef = C::zero();
        for v in &self.vars {
            let c = self.coefs[*v as usize].abs();
            if trail.is_unknown(*v) && c > prop_coef {
                prop_coef = c;
            }
        }
        if prop_coef.convert::<D>() <= slack {
            return;
        }
        self.weaken_non_implied(trail, &slack);
        if self.weaken_non_implying(trail, &prop_coef, &slack) {
            self.saturate();
        }
        self.remove_zeroes();
    }

    /// Weakens every literal which is not false.
    pub fn weaken_non_falsified(&mut self, trail: &Trail) {
        self.weaken_if(|l| !trail.is_false(l));
        self.remove_zeroes();
    }

    /// Resolves the expression with `reason` on the literal `asserting`, true on the trail and propagated by the reason.
    ///
    /// Variables of falsified literals in the (scaled) reason are added to `act`, and the lbd of the reason is returned.
    ///
    /// # Soundness
    /// The reason should be free of units and zeroes, saturated, and fit the analysis budget.
    pub fn generic_resolve(
        &mut self,
        reason: &mut ConstrExp<C, D>,
        asserting: Lit,
        trail: &Trail,
        options: &ResolveOptions,
        act: &mut Vec<Var>,
    ) -> u32 {
        let confl_coef = self.get_coef(-asserting);
        debug_assert!(confl_coef.is_positive());
        debug_assert!(reason.get_coef(asserting).is_positive());

        let non_false = |l: Lit| !trail.is_false(l);

        if reason.get_coef(asserting).is_one() {
            reason.multiply(&confl_coef);
        } else {
            if options.multiply {
                reason.multiply(&confl_coef);
            }
            let reason_coef = reason.get_coef(asserting);

            match options.division {
                Division::RoundToOne => {
                    reason.weaken_divide_round(&reason_coef.convert(), non_false);
                    reason.multiply(&confl_coef);
                }

                Division::SlackPlusOne | Division::MinDiv => {
                    let reason_slack = reason.slack(trail);
                    let slack_plus_one = reason_slack.clone() + D::one();
                    if options.division == Division::SlackPlusOne
                        && reason_slack.is_positive()
                        && reason_coef.convert::<D>() / slack_plus_one.clone() < confl_coef.convert::<D>()
                    {
                        reason.weaken_divide_round(&slack_plus_one, non_false);
                        let divided = reason.get_coef(asserting);
                        reason.multiply(&ceildiv(&confl_coef, &divided));
                    } else {
                        let (best_div, mult) = Self::min_div(&confl_coef, &reason_coef, &reason_slack, options.multiply);
                        match options.canceling_unknowns {
                            true => {
                                let canceling = |l: Lit| !trail.is_false(l) && (trail.is_true(l) || self.get_coef(-l) < mult);
                                reason.weaken_divide_round(&best_div.convert(), canceling);
                            }
                            false => reason.weaken_divide_round(&best_div.convert(), non_false),
                        }
                        reason.multiply(&mult);
                    }
                }
            }
        }
        debug_assert!(reason.get_coef(asserting) >= confl_coef);

        for term in reason.terms() {
            if trail.is_false(term.l) {
                act.push(var(term.l));
            }
        }
        let lbd = reason.lbd(trail);

        self.add_up(reason, &C::one());
        self.remove_zeroes();
        self.saturate();
        self.fix_overflow(trail, options.bits_overflow, options.bits_reduced, 0);
        debug_assert!(self.get_coef(-asserting) <= C::zero());
        debug_assert!(self.has_negative_slack(trail));

        lbd
    }

    /// A divisor of the reason coefficient greater than the slack of the reason, and the multiplier which then matches the conflict coefficient.
    fn min_div(confl_coef: &C, reason_coef: &C, reason_slack: &D, multiplied: bool) -> (C, C) {
        let mut gcd = match multiplied {
            true => confl_coef.clone(),
            false => confl_coef.gcd(reason_coef),
        };
        let min_div = reason_coef.clone() / gcd.clone();
        let mut best_div = min_div.clone();
        let exceeds_slack = |candidate: &C| candidate.convert::<D>() > *reason_slack;

        if !exceeds_slack(&best_div) {
            best_div = reason_coef.clone();
            for p in [5, 3, 2] {
                let p = C::from_i32(p).unwrap_or_else(C::one);
                let mut pp = C::one();
                while gcd.is_multiple_of(&p) {
                    gcd = gcd / p.clone();
                    pp = pp * p.clone();
                    for candidate in [
                        reason_coef.clone() / gcd.clone(),
                        min_div.clone() * gcd.clone(),
                        reason_coef.clone() / pp.clone(),
                        min_div.clone() * pp.clone(),
                    ] {
                        if candidate < best_div && exceeds_slack(&candidate) && reason_coef.is_multiple_of(&candidate) {
                            best_div = candidate;
                        }
                    }
                }
            }
        }

        let mult = confl_coef.clone() / (reason_coef.clone() / best_div.clone());
        (best_div, mult)
    }

    /// Removes ¬`to_subsume` from the expression using `reason`, if the reason weakened to `to_subsume` and the saturated literals of the expression remains non-trivial.
    ///
    /// Returns the lbd of the weakened reason if subsumption took place, and zero otherwise.
    pub fn generic_subsume<C2: Number, D2: Number>(
        &mut self,
        reason: &ConstrExp<C2, D2>,
        to_subsume: Lit,
        trail: &Trail,
        saturated: &mut HashSet<Lit>,
    ) -> u32 {
        debug_assert!(self.get_coef(-to_subsume).is_positive());

        let mut weakened = reason.degree.clone();
        for term in reason.terms() {
            if term.l != to_subsume && !saturated.contains(&term.l) && !trail.is_unit(-term.l) {
                weakened = weakened - term.c.convert::<D2>();
                if !weakened.is_positive() {
                    return 0;
                }
            }
        }

        let v = var(to_subsume) as usize;
        let cf = self.coefs[v].clone();
        let mult = cf.abs();
        if cf.is_negative() {
            self.rhs = self.rhs.clone() - cf.convert::<D>();
        }
        self.coefs[v] = C::zero();
        saturated.remove(&-to_subsume);

        if self.proof.is_active() {
            let mut step = ProofBuffer::default();
            step.set_active(true);
            step.copy_from(&reason.proof);
            for term in reason.terms() {
                if trail.is_unit(-term.l) {
                    step.add_unit(-term.l, &term.c);
                } else if term.l != to_subsume && !saturated.contains(&term.l) {
                    step.add_axiom(-term.l, &term.c);
                }
            }
            step.saturate();
            step.divide(&weakened);
            self.proof.add_scaled(&step, &mult);
            self.proof.saturate();
        }

        let mut levels = HashSet::new();
        for term in reason.terms() {
            if term.l == to_subsume || saturated.contains(&term.l) {
                let level = trail.false_level(term.l);
                if trail.is_false(term.l) && level > 0 {
                    levels.insert(level);
                }
            }
        }
        (levels.len() as u32).clamp(1, MAX_LBD)
    }
}
