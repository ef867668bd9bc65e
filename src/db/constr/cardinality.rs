//! Cardinality constraints, at least `degree` of the literals are true.
//!
//! The first `degree + 1` literals are watched (or every literal, for a cardinality constraint over exactly `degree` literals).
//! When a watched literal is falsified a replacement is sought beyond the watched literals, and if none exists every other watched literal must be true.

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
pub struct Cardinality {
    lits: Vec<Lit>,
    degree: u32,
}

impl Cardinality {
    /// A cardinality constraint, with literals ordered so those which are not false come first.
    pub fn new(lits: Vec<Lit>, degree: u32) -> Self {
        debug_assert!(degree as usize <= lits.len());
        Cardinality { lits, degree }
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    fn watch_count(&self) -> usize {
        (self.degree as usize + 1).min(self.lits.len())
    }

    pub fn initialize_watches(&mut self, cref: CRef, trail: &mut Trail, watches: &mut Watches) -> AttachStatus {
        let watched = self.watch_count();
        let not_false = self.lits.iter().filter(|l| !trail.is_false(**l)).count();
        if not_false < self.degree as usize {
            return AttachStatus::Conflicting;
        }
        for index in 0..watched {
            watches.watch(self.lits[index], Watch { cref, idx: index as u32, undo: false });
        }
        if not_false == self.degree as usize {
            for index in 0..self.degree as usize {
                let l = self.lits[index];
                if trail.is_unknown(l) {
                    trail.assign(l, Some(cref));
                }
            }
        }
        AttachStatus::Attached
    }

    pub fn check_for_propagation(&mut self, cref: CRef, falsified: Lit, trail: &mut Trail, watches: &mut Watches) -> WatchStatus {
        let watched = self.watch_count();
        let Some(position) = self.lits[..watched].iter().position(|l| *l == falsified) else {
            // the watch was moved by an earlier check, so the literal is no longer watched
            return WatchStatus::DropWatch;
        };

        for index in watched..self.lits.len() {
            if !trail.is_false(self.lits[index]) {
                self.lits.swap(position, index);
                watches.watch(self.lits[position], Watch { cref, idx: position as u32, undo: false });
                return WatchStatus::DropWatch;
            }
        }

        if watched - 1 < self.degree as usize {
            return WatchStatus::Conflicting;
        }
        for index in 0..watched {
            if index != position && trail.is_false(self.lits[index]) {
                return WatchStatus::Conflicting;
            }
        }
        for index in 0..watched {
            let l = self.lits[index];
            if index != position && trail.is_unknown(l) {
                trail.assign(l, Some(cref));
            }
        }
        WatchStatus::KeepWatch
    }

    pub fn to_expanded(&self, id: ID, origin: Origin, pools: &CePools) -> CeSuper {
        let mut ce = pools.t32.take();
        for l in &self.lits {
            ce.add_lhs(1, *l);
        }
        ce.add_rhs(self.degree as i64);
        ce.orig = origin;
        ce.proof.reset(id);
        CeSuper::Ce32(ce)
    }

    pub fn is_satisfied_at_root(&self, trail: &Trail) -> bool {
        self.lits.iter().filter(|l| trail.is_unit(**l)).count() >= self.degree as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_false_propagates_third() {
        let mut trail = Trail::default();
        trail.grow(4);
        let mut watches = Watches::default();
        watches.grow(4);
        let mut db = crate::db::ConstraintDB::default();
        let cref = db.insert(
            crate::db::Header::new(1, Origin::Formula),
            crate::db::constr::Constr::Clause(crate::db::constr::clause::Clause::new(vec![])),
        );

        let mut card = Cardinality::new(vec![1, 2, 3, 4], 2);
        assert_eq!(card.initialize_watches(cref, &mut trail, &mut watches), AttachStatus::Attached);
        assert!(watches.list(4).is_empty());

        trail.decide(-1);
        assert_eq!(card.check_for_propagation(cref, 1, &mut trail, &mut watches), WatchStatus::DropWatch);
        assert_eq!(watches.list(4).len(), 1);

        trail.decide(-2);
        assert_eq!(card.check_for_propagation(cref, 2, &mut trail, &mut watches), WatchStatus::KeepWatch);
        assert!(trail.is_true(3));
        assert!(trail.is_true(4));
    }
}
