/*!
Learning constraints.

# Overview

A constraint derived by [analysis](crate::procedures::analysis) is minimised and then committed:
- Minimisation removes falsified literals which are implied by the saturated literals of the constraint, by self-subsumption with the reason of the implied literal.
- The constraint is freed of level zero literals, saturated, and reduced to fit the learned bit budget.
- The solver [backjumps](crate::procedures::backjump) to the level at which the constraint asserts (or to the latest level at which the constraint is not falsified).
- Literals which neither imply nor are implied by the constraint may be weakened.
- The constraint is stored and attached, which propagates.

A constraint falsified at level zero shows the formula to be unsatisfiable, and is not stored.

The same commit is used for constraints learned from other sources, e.g. cores and the linear relaxation, with weakening skipped.
*/

use std::collections::HashSet;

use crate::{
    ce::super_ce::CeSuper,
    db::{constr::AttachStatus, CRef},
    misc::log::targets,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit},
        origin::Origin,
    },
};

/// Possible outcomes of learning a constraint.
#[derive(Debug, PartialEq, Eq)]
pub enum LearnOk {
    /// The constraint was stored.
    Stored(CRef),

    /// The constraint was trivially satisfied, and so not stored.
    Redundant,

    /// The constraint is falsified at level zero.
    Contradiction,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Learns the result of analysing a conflict.
    pub fn learn_from_conflict(&mut self, mut confl: CeSuper) -> LearnOk {
        if self.shared.config.ca_min.value {
            self.minimise(&mut confl);
        }
        let weaken = self.shared.config.ca_weaken_nonimplying.value;
        let result = self.commit(confl, Origin::Learned, weaken);
        if matches!(result, LearnOk::Stored(_)) {
            self.shared.counters.learned += 1;
        }
        result
    }

    /// Learns a constraint implied by the formula, e.g. a core or a cut.
    pub fn learn_constraint(&mut self, ce: CeSuper, origin: Origin) -> LearnOk {
        self.commit(ce, origin, false)
    }

    /// Removes falsified literals by self-subsumption, latest on the trail first.
    fn minimise(&mut self, confl: &mut CeSuper) {
        let mut saturated: HashSet<Lit> = confl.saturated_lits().into_iter().collect();
        let mut candidates: Vec<Lit> = saturated
            .iter()
            .copied()
            .filter(|m| {
                self.trail.is_false(*m) && self.trail.false_level(*m) > 0 && !self.trail.is_decided(var(*m))
            })
            .collect();
        candidates.sort_by_key(|m| std::cmp::Reverse(self.trail.position(var(*m))));

        for m in candidates {
            if !confl.has_lit(m) || !saturated.contains(&m) {
                continue;
            }
            let Some(reason) = self.trail.reason(var(m)) else {
                continue;
            };
            let stored = self.db.get(reason);
            let reason_ce = stored
                .constr
                .to_expanded(stored.header.id, stored.header.origin, &self.shared.pools);
            let lbd = confl.subsume_with(&reason_ce, -m, &self.trail, &mut saturated);
            if lbd > 0 {
                log::trace!(target: targets::ANALYSIS, "Subsumed {m} with {reason}");
            }
        }
    }

    /// Stores `ce` at the level where it asserts, noting the derivation with the dispatcher.
    fn commit(&mut self, mut ce: CeSuper, origin: Origin, weaken: bool) -> LearnOk {
        ce.remove_units_and_zeroes(&self.trail);
        ce.saturate();
        if ce.is_tautology() {
            return LearnOk::Redundant;
        }

        let bits_learned = self.shared.config.bits_learned.value;
        if bits_learned > 0 {
            let bits_reduced = self.shared.config.bits_reduced().min(bits_learned - 1).max(1);
            if ce.fix_overflow(&self.trail, bits_learned, bits_reduced, 0) {
                self.shared.counters.overflow_fixes += 1;
            }
        }

        let lbd = ce.lbd(&self.trail);
        let (level, asserting) = ce.assertion_status(&self.trail);

        if level < 0 || ce.is_inconsistency() {
            let id = self.shared.log_derived(ce.proof(), || ce.to_simple());
            log::info!(target: targets::ANALYSIS, "Derived {id}, falsified at level zero");
            self.note_contradiction(id);
            return LearnOk::Contradiction;
        }

        self.backjump(level);
        if weaken && asserting {
            ce.heuristic_weakening(&self.trail);
        }

        let id = self.shared.log_derived(ce.proof(), || ce.to_simple());
        let (cref, status) = self.store(&ce, id, origin, lbd);
        if level == 0 {
            self.shared.counters.units += 1;
        }
        log::trace!(target: targets::ANALYSIS, "Learned {id} at level {level}, lbd {lbd}");

        debug_assert!(status == AttachStatus::Attached, "! Learned constraint falsified at its level");
        LearnOk::Stored(cref)
    }
}
