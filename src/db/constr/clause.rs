//! Clauses, with two watched literals.
//!
//! The watched literals of a clause are those at positions zero and one.
//! When a watched literal is falsified the remaining literals are searched for a replacement which is not false, and if none exists the other watched literal is propagated (or the clause is conflicting).
//!
//! A clause of one literal is not watched, as it is only attached at level zero, where its literal remains true.

use crate::{
    ce::{pool::CePools, super_ce::CeSuper},
    context::ID,
    db::{
        constr::{AttachStatus, WatchStatus},
        trail::Trail,
        watches::{Watch, Watches},
        CRef,
    },
    structures::{literal::Lit, origin::Origin},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// A clause over the given literals, which should be distinct and ordered with literals which are not false first.
    pub fn new(lits: Vec<Lit>) -> Self {
        Clause { lits }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn initialize_watches(&mut self, cref: CRef, trail: &mut Trail, watches: &mut Watches) -> AttachStatus {
        match self.lits.len() {
            0 => AttachStatus::Conflicting,

            1 => {
                let l = self.lits[0];
                if trail.is_false(l) {
                    AttachStatus::Conflicting
                } else {
                    if trail.is_unknown(l) {
                        trail.assign(l, Some(cref));
                    }
                    AttachStatus::Attached
                }
            }

            _ => {
                if trail.is_false(self.lits[0]) {
                    return AttachStatus::Conflicting;
                }
                watches.watch(self.lits[0], Watch { cref, idx: 0, undo: false });
                watches.watch(self.lits[1], Watch { cref, idx: 1, undo: false });
                if trail.is_false(self.lits[1]) && trail.is_unknown(self.lits[0]) {
                    trail.assign(self.lits[0], Some(cref));
                }
                AttachStatus::Attached
            }
        }
    }

    pub fn check_for_propagation(&mut self, cref: CRef, falsified: Lit, trail: &mut Trail, watches: &mut Watches) -> WatchStatus {
        if self.lits[0] == falsified {
            self.lits.swap(0, 1);
        }
        debug_assert_eq!(self.lits[1], falsified);

        if trail.is_true(self.lits[0]) {
            return WatchStatus::KeepWatch;
        }

        for index in 2..self.lits.len() {
            if !trail.is_false(self.lits[index]) {
                self.lits.swap(1, index);
                watches.watch(self.lits[1], Watch { cref, idx: 1, undo: false });
                return WatchStatus::DropWatch;
            }
        }

        if trail.is_false(self.lits[0]) {
            return WatchStatus::Conflicting;
        }
        trail.assign(self.lits[0], Some(cref));
        WatchStatus::KeepWatch
    }

    pub fn to_expanded(&self, id: ID, origin: Origin, pools: &CePools) -> CeSuper {
        let mut ce = pools.t32.take();
        for l in &self.lits {
            ce.add_lhs(1, *l);
        }
        ce.add_rhs(1);
        ce.orig = origin;
        ce.proof.reset(id);
        CeSuper::Ce32(ce)
    }

    pub fn is_satisfied_at_root(&self, trail: &Trail) -> bool {
        self.lits.iter().any(|l| trail.is_unit(*l))
    }
}
