//! General constraints with watched propagation.
//!
//! A watched constraint watches enough literals that the watch slack, the sum of the coefficients of watched literals which are not (processed and) false less the degree, is at least the largest coefficient.
//! While this holds no literal can be propagated, and falsifying a literal which is not watched requires no work.
//!
//! When a watched literal is falsified fresh watches are sought among the literals which are not watched.
//! If enough are found the falsified literal is no longer watched, otherwise every literal which may be watched is watched, the watch slack is the true slack, and propagation follows as for a counting constraint.

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
    structures::{literal::{var, Lit}, origin::Origin, term::Term},
};

pub struct Watched<K: TierKind> {
    terms: Vec<Term<K::C>>,
    watched: Vec<bool>,
    degree: K::D,
    watch_slack: K::D,
    /// Where the most recent search for a fresh watch ended.
    watch_idx: usize,
}

impl<K: TierKind> Watched<K> {
    /// A watched constraint from normalised terms, which must fit in the tier.
    pub fn new(terms: &[Term<BigInt>], degree: &BigInt) -> Self {
        let mut terms = terms
            .iter()
            .map(|t| Term::new(t.c.convert::<K::C>(), t.l))
            .collect::<Vec<_>>();
        terms.sort_by(|a, b| b.c.cmp(&a.c));
        Watched {
            watched: vec![false; terms.len()],
            terms,
            degree: degree.convert(),
            watch_slack: K::D::zero(),
            watch_idx: 0,
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

    fn largest_coef(&self) -> K::D {
        match self.terms.first() {
            Some(term) => term.c.convert(),
            None => K::D::zero(),
        }
    }

    fn set_watch(&mut self, cref: CRef, index: usize, watches: &mut Watches) {
        self.watched[index] = true;
        watches.watch(self.terms[index].l, Watch { cref, idx: index as u32, undo: true });
    }

    fn propagate_within_slack(&self, cref: CRef, trail: &mut Trail) {
        for term in &self.terms {
            if term.c.convert::<K::D>() <= self.watch_slack {
                break;
            }
            if trail.is_unknown(term.l) {
                trail.assign(term.l, Some(cref));
            }
        }
    }

    pub fn initialize_watches(&mut self, cref: CRef, trail: &mut Trail, watches: &mut Watches) -> AttachStatus {
        let largest = self.largest_coef();
        self.watch_slack = -self.degree.clone();
        self.watched.iter_mut().for_each(|w| *w = false);

        for index in 0..self.terms.len() {
            if self.watch_slack >= largest {
                break;
            }
            if !trail.is_false_processed(self.terms[index].l) {
                self.watch_slack = self.watch_slack.clone() + self.terms[index].c.convert::<K::D>();
                self.set_watch(cref, index, watches);
            }
        }

        if self.watch_slack < largest {
            // Watch processed falsified literals, latest first, so backjumping restores the watch slack.
            let mut falsified = (0..self.terms.len())
                .filter(|i| !self.watched[*i])
                .collect::<Vec<_>>();
            falsified.sort_by_key(|i| std::cmp::Reverse(trail.position(var(self.terms[*i].l))));
            let mut deficit = largest - self.watch_slack.clone();
            for index in falsified {
                if !deficit.is_positive() {
                    break;
                }
                deficit = deficit - self.terms[index].c.convert::<K::D>();
                self.set_watch(cref, index, watches);
            }

            if self.watch_slack.is_negative() {
                return AttachStatus::Conflicting;
            }
            self.propagate_within_slack(cref, trail);
        }
        AttachStatus::Attached
    }

    pub fn check_for_propagation(&mut self, cref: CRef, idx: u32, trail: &mut Trail, watches: &mut Watches) -> WatchStatus {
        let index = idx as usize;
        if !self.watched[index] {
            return WatchStatus::DropWatch;
        }
        let largest = self.largest_coef();
        self.watch_slack = self.watch_slack.clone() - self.terms[index].c.convert::<K::D>();
        if self.watch_slack >= largest {
            return WatchStatus::KeepWatch;
        }

        let n = self.terms.len();
        let start = self.watch_idx;
        for step in 0..n {
            if self.watch_slack >= largest {
                break;
            }
            let candidate = (start + step) % n;
            if !self.watched[candidate] && !trail.is_false(self.terms[candidate].l) {
                self.watch_slack = self.watch_slack.clone() + self.terms[candidate].c.convert::<K::D>();
                self.set_watch(cref, candidate, watches);
                self.watch_idx = candidate;
            }
        }

        if self.watch_slack >= largest {
            self.watched[index] = false;
            return WatchStatus::DropWatch;
        }

        if self.watch_slack.is_negative() {
            return WatchStatus::Conflicting;
        }
        self.propagate_within_slack(cref, trail);
        WatchStatus::KeepWatch
    }

    pub fn undo_falsified(&mut self, idx: u32) {
        self.watch_slack = self.watch_slack.clone() + self.terms[idx as usize].c.convert::<K::D>();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ce::super_ce::{K128, K32, K64, K96, KArb};
    use crate::db::{constr::clause::Clause, constr::Constr, ConstraintDB, Header};
    use crate::generic::random::MinimalPCG32;
    use num_traits::Signed;
    use rand::{Rng, SeedableRng};

    fn setup(vars: i32) -> (CRef, Trail, Watches) {
        let mut db = ConstraintDB::default();
        let cref = db.insert(Header::new(1, Origin::Formula), Constr::Clause(Clause::new(vec![])));
        let mut trail = Trail::default();
        trail.grow(vars);
        let mut watches = Watches::default();
        watches.grow(vars);
        (cref, trail, watches)
    }

    /// The watch slack is the sum of the coefficients of watched literals which are not processed and false, less the degree.
    fn assert_watch_slack<K: TierKind>(watched: &Watched<K>, trail: &Trail) {
        let sum: BigInt = watched
            .terms
            .iter()
            .zip(&watched.watched)
            .filter(|(t, w)| **w && !trail.is_false_processed(t.l))
            .map(|(t, _)| t.c.to_big())
            .sum();
        assert_eq!(watched.watch_slack.to_big(), sum - watched.degree.to_big());
    }

    #[test]
    fn watches_move_before_propagation() {
        let (cref, mut trail, mut watches) = setup(4);

        // 3 x1 + 2 x2 + 2 x3 + x4 >= 3, watching x1 and x2 gives a watch slack of 2, so x3 is watched as well
        let terms = [
            Term::new(BigInt::from(3), 1),
            Term::new(BigInt::from(2), 2),
            Term::new(BigInt::from(2), 3),
            Term::new(BigInt::from(1), 4),
        ];
        let mut watched = Watched::<KArb>::new(&terms, &BigInt::from(3));
        assert_eq!(watched.initialize_watches(cref, &mut trail, &mut watches), AttachStatus::Attached);
        assert_eq!(watched.watch_slack, BigInt::from(4));
        assert!(watches.list(4).is_empty());
        assert_watch_slack(&watched, &trail);

        trail.decide(-2);
        trail.q_head = trail.len();
        assert_eq!(watched.check_for_propagation(cref, 1, &mut trail, &mut watches), WatchStatus::DropWatch);
        assert_eq!(watched.watch_slack, BigInt::from(3));
        assert_eq!(watches.list(4).len(), 1);
        assert_watch_slack(&watched, &trail);

        trail.decide(-3);
        trail.q_head = trail.len();
        assert_eq!(watched.check_for_propagation(cref, 2, &mut trail, &mut watches), WatchStatus::KeepWatch);
        assert_eq!(watched.watch_slack, BigInt::from(1));
        assert!(trail.is_true(1));
        assert_watch_slack(&watched, &trail);
    }

    #[test]
    fn scan_continues_past_fresh_watches() {
        let (cref, mut trail, mut watches) = setup(6);

        // 2 x1 + 2 x2 + x3 + x4 + x5 + x6 >= 2, watching x1 and x2
        let terms = [
            Term::new(BigInt::from(2), 1),
            Term::new(BigInt::from(2), 2),
            Term::new(BigInt::from(1), 3),
            Term::new(BigInt::from(1), 4),
            Term::new(BigInt::from(1), 5),
            Term::new(BigInt::from(1), 6),
        ];
        let mut watched = Watched::<K64>::new(&terms, &BigInt::from(2));
        assert_eq!(watched.initialize_watches(cref, &mut trail, &mut watches), AttachStatus::Attached);
        assert_eq!(watched.watch_slack, 2);

        trail.decide(4);
        trail.decide(-6);
        trail.q_head = trail.len();

        // Replacing x2 takes x3 and then the true x4, with x1 free to be false
        trail.decide(-2);
        trail.q_head = trail.len();
        assert_eq!(watched.check_for_propagation(cref, 1, &mut trail, &mut watches), WatchStatus::DropWatch);
        assert_eq!(watched.watch_slack, 2);
        assert!(trail.is_unknown(1));
        assert_eq!(watches.list(3).len(), 1);
        assert_eq!(watches.list(4).len(), 1);
        assert!(watches.list(5).is_empty());
        assert_watch_slack(&watched, &trail);
    }

    /// Falsifies literals of a random constraint in a random order, checking each propagation and conflict is implied.
    fn random_falsifications<K: TierKind>(rng: &mut MinimalPCG32) {
        let vars = rng.gen_range(2..8);
        let terms: Vec<Term<BigInt>> = (1..=vars)
            .map(|v| {
                let l = if rng.gen_bool(0.5) { v } else { -v };
                Term::new(BigInt::from(rng.gen_range(1..6_i64)), l)
            })
            .collect();
        let total: i64 = terms.iter().map(|t| t.c.convert::<i64>()).sum();
        let degree = BigInt::from(rng.gen_range(1..=total));

        let (cref, mut trail, mut watches) = setup(vars);
        let mut watched = Watched::<K>::new(&terms, &degree);
        assert_eq!(watched.initialize_watches(cref, &mut trail, &mut watches), AttachStatus::Attached);
        trail.q_head = trail.len();
        assert_watch_slack(&watched, &trail);

        let slack = |trail: &Trail| -> BigInt {
            terms.iter().filter(|t| !trail.is_false(t.l)).map(|t| t.c.clone()).sum::<BigInt>() - &degree
        };

        loop {
            let unknown: Vec<Lit> = terms.iter().map(|t| t.l).filter(|l| trail.is_unknown(*l)).collect();
            if unknown.is_empty() {
                break;
            }
            let l = unknown[rng.gen_range(0..unknown.len())];
            if rng.gen_bool(0.3) {
                trail.decide(l);
                trail.q_head = trail.len();
                continue;
            }

            trail.decide(-l);
            trail.q_head = trail.len();
            let before = trail.len();
            let true_slack = slack(&trail);

            let mut conflict = false;
            let mut kept = Vec::default();
            for watch in watches.take(l) {
                match watched.check_for_propagation(cref, watch.idx, &mut trail, &mut watches) {
                    WatchStatus::DropWatch => {}
                    WatchStatus::KeepWatch => kept.push(watch),
                    WatchStatus::Conflicting => {
                        kept.push(watch);
                        conflict = true;
                    }
                }
            }
            watches.restore(l, kept);

            for p in &trail.literals[before..] {
                let term = terms.iter().find(|t| t.l == *p).unwrap();
                assert!(term.c > true_slack);
            }
            if conflict {
                assert!(true_slack.is_negative());
                break;
            }
            assert!(!true_slack.is_negative());

            trail.q_head = trail.len();
            assert_watch_slack(&watched, &trail);
        }
    }

    #[test]
    fn random_falsifications_every_tier() {
        let mut rng = MinimalPCG32::seed_from_u64(7);
        for _ in 0..200 {
            random_falsifications::<K32>(&mut rng);
            random_falsifications::<K64>(&mut rng);
            random_falsifications::<K96>(&mut rng);
            random_falsifications::<K128>(&mut rng);
            random_falsifications::<KArb>(&mut rng);
        }
    }
}
