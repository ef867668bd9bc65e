/*!
Analysis of a conflict.

# Overview

Analysis takes a stored constraint falsified by the trail and derives, by cutting planes resolution, a constraint which asserts some literal at an earlier decision level.

The conflicting constraint is expanded to an expression at the tier of analysis, which is chosen by the `bits_overflow` option.
Then, the trail is walked back one literal at a time.
For each literal `l`, if the expression contains `-l` then the expression is resolved with the (expanded) reason for `l` on `l`.
The walk stops once the expression is asserting with respect to assignments made before the current level, once the expression is an inconsistency, or when level zero is reached.
If the expression is falsified by assignments made before the current level, the current level is removed without resolution.

Each expanded reason is freed of level zero literals, saturated, and reduced to fit the budget of analysis.
If the reduced reason still does not fit the tier of analysis (possible only for the tier of a stored constraint) the expression is escalated to the tier of the reason.

Literals are removed from the trail as the walk passes them, without propagating, and so the trail is left at the point where the expression became asserting.

# Activity

Each variable of a falsified literal of a (scaled) reason and each variable of the derived expression is bumped.
Each stored constraint used as a reason is bumped, and its lbd is revised.
*/

use crate::{
    ce::{resolution::ResolveOptions, super_ce::CeSuper},
    db::CRef,
    misc::log::targets,
    numeric::Tier,
    reports::AssertionStatus,
    solver::GenericSolver,
    structures::literal::{var, Lit, Var},
    types::err::{self, ErrorKind},
};

/// Deterministic time taken by a single resolution step.
pub const DET_PER_RESOLUTION: f64 = 1e-5;

const VAR_ACTIVITY_LIMIT: f64 = 1e100;

const CONSTR_ACTIVITY_LIMIT: f64 = 1e20;

/// Decay of the activity of stored constraints.
const CONSTR_DECAY: f64 = 0.999;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Analyses the conflict of the constraint `conflict`, returning an expression asserting at some earlier level, or falsified at level zero.
    pub fn analyze(&mut self, conflict: CRef) -> Result<CeSuper, ErrorKind> {
        self.shared.counters.conflicts += 1;
        self.shared.counters.fresh_conflicts += 1;

        let tier = Tier::for_analysis(self.shared.config.bits_overflow.value);
        let options = ResolveOptions::from_config(&self.shared.config);
        let mut act: Vec<Var> = Vec::default();

        let mut confl = self.expand_reason(conflict, 0, tier);
        if !confl.has_negative_slack(&self.trail) {
            return Err(err::AnalysisError::NoConflict.into());
        }
        log::trace!(target: targets::ANALYSIS, "Conflict {confl}");
        self.bump_constraint(conflict, confl.lbd(&self.trail));

        loop {
            let dl = self.trail.decision_level();
            if dl == 0 || confl.is_inconsistency() {
                break;
            }
            match confl.is_asserting_before(&self.trail, dl) {
                AssertionStatus::Asserting => break,
                AssertionStatus::Falsified => {
                    // Nothing at the current level is needed for the conflict.
                    self.backjump(dl - 1);
                    continue;
                }
                AssertionStatus::NonAsserting => {}
            }
            let Some(&l) = self.trail.literals.last() else {
                break;
            };

            if confl.has_lit(-l) {
                let Some(reason) = self.trail.reason(var(l)) else {
                    return Err(err::AnalysisError::MissingReason.into());
                };
                let reason_ce = self.expand_reason(reason, l, tier);
                if reason_ce.tier() > confl.tier() {
                    confl = confl.convert_at_least(reason_ce.tier(), &self.shared.pools);
                    self.shared.counters.tier_escalations += 1;
                }
                let lbd = confl.resolve_with(&reason_ce, l, &self.trail, &options, &mut act, &self.shared.pools);
                self.shared.counters.det_time += DET_PER_RESOLUTION;
                self.bump_constraint(reason, lbd);
            }
            self.undo_one();
        }

        for v in confl.vars() {
            act.push(v);
        }
        self.bump_vars(&act);
        log::trace!(target: targets::ANALYSIS, "Derived {confl}");
        Ok(confl)
    }

    /// The stored constraint `cref` as an expression prepared for resolution on `asserting`.
    ///
    /// With `asserting` zero the constraint is prepared as a conflict.
    pub(crate) fn expand_reason(&mut self, cref: CRef, asserting: Lit, tier: Tier) -> CeSuper {
        let stored = self.db.get(cref);
        let mut ce = stored
            .constr
            .to_expanded(stored.header.id, stored.header.origin, &self.shared.pools);
        ce.remove_units_and_zeroes(&self.trail);
        ce.saturate();

        let budget = self.shared.config.bits_overflow.value;
        if ce.fix_overflow(&self.trail, budget, self.shared.config.bits_reduced(), asserting) {
            self.shared.counters.overflow_fixes += 1;
            log::trace!(target: targets::OVERFLOW, "Reduced {cref} for analysis");
        }

        match ce.convert(tier, &self.shared.pools) {
            Some(converted) => converted,
            None => {
                self.shared.counters.tier_escalations += 1;
                ce.convert_at_least(tier, &self.shared.pools)
            }
        }
    }

    fn bump_vars(&mut self, vars: &[Var]) {
        for &v in vars {
            if self.heap.bump(v, self.var_bump) > VAR_ACTIVITY_LIMIT {
                self.heap.scale_all(1.0 / VAR_ACTIVITY_LIMIT);
                self.var_bump /= VAR_ACTIVITY_LIMIT;
            }
        }
    }

    fn bump_constraint(&mut self, cref: CRef, lbd: u32) {
        let header = &mut self.db.get_mut(cref).header;
        if !header.origin.is_learned() {
            return;
        }
        header.improve_lbd(lbd);
        header.activity += self.constr_bump;
        if header.activity > CONSTR_ACTIVITY_LIMIT {
            for live in self.db.live_refs() {
                self.db.get_mut(live).header.activity /= CONSTR_ACTIVITY_LIMIT;
            }
            self.constr_bump /= CONSTR_ACTIVITY_LIMIT;
        }
    }

    /// Decays activity, by growing the amount of each bump.
    pub(crate) fn decay_activity(&mut self) {
        self.var_bump /= self.shared.config.var_weight.value;
        self.constr_bump /= CONSTR_DECAY;
    }
}
