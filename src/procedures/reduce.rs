/*!
Reduction of the constraint database.

# Overview

A reduction removes constraints which are unlikely to be of further use:
- At level zero, any constraint satisfied by the assignments made at level zero.
- Of the learned constraints with an lbd greater than `db_safelbd`, the worse half, ordered by lbd and then by activity.

A locked constraint, or a constraint which is the reason for some literal on the trail, is never removed.

Removed constraints are marked for deletion, their watches are dropped, and if enough of the arena is marked the arena is garbage collected.
After a collection every reference held by the solver (watches and reasons) is revised through the remap.
*/

use std::collections::HashSet;

use crate::{
    db::{CRef, ConstraintDB},
    misc::log::targets,
    solver::GenericSolver,
    structures::literal::var,
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Reduces the constraint database, and schedules the next reduction.
    pub fn reduce(&mut self) {
        self.shared.counters.reductions += 1;

        let reasons: HashSet<CRef> = self
            .trail
            .literals
            .iter()
            .filter_map(|l| self.trail.reason(var(*l)))
            .collect();
        let removable = |cref: &CRef, db: &ConstraintDB| {
            let header = &db.get(*cref).header;
            !header.locked && !reasons.contains(cref)
        };

        let mut deleted = 0;
        if self.trail.decision_level() == 0 {
            for cref in self.db.live_refs() {
                if removable(&cref, &self.db) && self.db.get(cref).constr.is_satisfied_at_root(&self.trail) {
                    self.delete_constraint(cref);
                    deleted += 1;
                }
            }
        }

        let safe_lbd = self.shared.config.db_safelbd.value;
        let mut learned: Vec<CRef> = self
            .db
            .live_refs()
            .into_iter()
            .filter(|cref| {
                let header = &self.db.get(*cref).header;
                header.origin.is_learned() && header.lbd > safe_lbd && removable(cref, &self.db)
            })
            .collect();
        learned.sort_by(|a, b| {
            let a = &self.db.get(*a).header;
            let b = &self.db.get(*b).header;
            a.lbd.cmp(&b.lbd).then(b.activity.total_cmp(&a.activity))
        });
        for &cref in &learned[learned.len() / 2..] {
            self.delete_constraint(cref);
            deleted += 1;
        }

        let db = &self.db;
        self.watches.retain(|cref| !db.is_deleted(cref));

        if self.db.should_collect() {
            self.collect_garbage();
        }

        self.next_reduction = self.reduction_interval();
        log::debug!(target: targets::REDUCTION, "Reduction {} removed {deleted}, {} learned remain", self.shared.counters.reductions, self.db.learned_count());
    }

    /// Compacts the constraint database, revising every held reference.
    pub(crate) fn collect_garbage(&mut self) {
        let remap = self.db.collect_garbage();
        self.watches.remap(&remap);
        for index in 0..self.trail.literals.len() {
            let v = var(self.trail.literals[index]);
            if let Some(cref) = self.trail.reason(v) {
                self.trail.set_reason(v, remap.get(cref));
            }
        }
        self.shared.counters.gc_runs += 1;
    }
}
