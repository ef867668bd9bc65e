//! General constraints with counting propagation.
//!
//! Every literal of a counting constraint is watched, and the constraint tracks its slack: the sum of the coefficients of literals which are not (processed and) false, less the degree.
//! Processing a falsified literal lowers the slack by its coefficient, and unassigning the literal restores it.
//!
//! Terms are stored in order of decreasing coefficient, so propagation stops at the first term whose coefficient does not exceed the slack.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{
    ce::{pool::CePools, super_ce::{CeSuper, TierKind}},
    context::ID,
    db::{
        constr::{AttachStatus, WatchStatus},
        trail::Trail,
        watches::{Watch, Watches},
        CRef,
    },
    numeric::Number,
    structures::{literal::Lit, origin::Origin, term::Term},
};

pub struct Counting<K: TierKind> {
    terms: Vec<Term<K::C>>,
    degree: K::D,
    slack: K::D,
}

impl<K: TierKind> Counting<K> {
    /// A counting constraint from normalised terms, which must fit in the tier.
    pub fn new(terms: &[Term<BigInt>], degree: &BigInt) -> Self {
        let mut terms = terms
            .iter()
            .map(|t| Term::new(t.c.convert::<K::C>(), t.l))
            .collect::<Vec<_>>();
        terms.sort_by(|a, b| b.c.cmp(&a.c));
        Counting {
            terms,
            degree: degree.convert(),
            slack: K::D::zero(),
        }
    }

    pub fn terms(&self) -> &[Term<K::C>] {
        &self.terms
    }

    pub fn degree(&self) -> &K::D {
        &self.degree
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn propagate_within_slack(&self, cref: CRef, trail: &mut Trail) {
        for term in &self.terms {
            if term.c.convert::<K::D>() <= self.slack {
                break;
            }
            if trail.is_unknown(term.l) {
                trail.assign(term.l, Some(cref));
            }
        }
    }

    pub fn initialize_watches(&mut self, cref: CRef, trail: &mut Trail, watches: &mut Watches) -> AttachStatus {
        self.slack = -self.degree.clone();
        for (index, term) in self.terms.iter().enumerate() {
            watches.watch(term.l, Watch { cref, idx: index as u32, undo: true });
            if !trail.is_false_processed(term.l) {
                self.slack = self.slack.clone() + term.c.convert::<K::D>();
            }
        }
        if self.slack.is_negative() {
            return AttachStatus::Conflicting;
        }
        self.propagate_within_slack(cref, trail);
        AttachStatus::Attached
    }

    pub fn check_for_propagation(&mut self, cref: CRef, idx: u32, trail: &mut Trail) -> WatchStatus {
        let c = self.terms[idx as usize].c.convert::<K::D>();
        self.slack = self.slack.clone() - c;
        if self.slack.is_negative() {
            return WatchStatus::Conflicting;
        }
        self.propagate_within_slack(cref, trail);
        WatchStatus::KeepWatch
    }

    pub fn undo_falsified(&mut self, idx: u32) {
        let c = self.terms[idx as usize].c.convert::<K::D>();
        self.slack = self.slack.clone() + c;
    }

    pub fn to_expanded(&self, id: ID, origin: Origin, pools: &CePools) -> CeSuper {
        let mut ce = K::pool(pools).take();
        for term in &self.terms {
            ce.add_lhs(term.c.clone(), term.l);
        }
        ce.add_rhs(self.degree.clone());
        ce.orig = origin;
        ce.proof.reset(id);
        K::wrap(ce)
    }

    pub fn is_satisfied_at_root(&self, trail: &Trail) -> bool {
        let mut sum = K::D::zero();
        for term in &self.terms {
            if trail.is_unit(term.l) {
                sum = sum + term.c.convert::<K::D>();
            }
        }
        sum >= self.degree
    }
}
