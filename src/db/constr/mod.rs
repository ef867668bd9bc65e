/*!
The encodings of stored constraints.

A constraint is stored as one of a closed set of variants:
- A [Clause], where every coefficient and the degree is one.
- A [Cardinality] constraint, where every coefficient is one.
- A [Counting] constraint, with general coefficients and counting propagation.
- A [Watched] constraint, with general coefficients and watched propagation.

Counting and watched constraints are stored at the narrowest [tier](crate::numeric::Tier) in which their coefficients and degree fit, and so each has a variant per tier.
The variants at arbitrary precision keep their coefficients on the heap.

Each variant has the same capabilities:
- Initialising watches when attached, which may propagate.
- Checking for propagation when a watched literal is falsified, returning a [WatchStatus].
- Undoing the falsification of a literal, for those variants which track a slack.
- Expansion back to a [constraint expression](crate::ce::super_ce::CeSuper), for conflict analysis and inprocessing.

Use [constr_apply] to apply an expression to whichever variant is held.

```rust
# use otter_pb::ce::pool::CePools;
# use otter_pb::db::constr::Constr;
# use otter_pb::db::trail::Trail;
# use otter_pb::numeric::Tier;
let pools = CePools::default();
let mut trail = Trail::default();
trail.grow(9);

// 3 x1 + 2 x2 + ... + 2 x9 >= 3
let mut ce = pools.take(Tier::T32);
ce.add_lhs(&3.into(), 1);
for v in 2..=9 {
    ce.add_lhs(&2.into(), v);
}
ce.add_rhs(&3.into());

let constr = Constr::from_ce(&ce, &trail, 0.6);
assert!(matches!(constr, Constr::Watched32(_)));
assert_eq!(constr.len(), 9);
```
*/

pub mod cardinality;
pub mod clause;
pub mod counting;
pub mod watched;

use num_bigint::BigInt;

use crate::{
    ce::{
        pool::CePools,
        super_ce::{CeSuper, K128, K32, K64, K96, KArb},
    },
    context::ID,
    db::{
        trail::{Trail, UNASSIGNED},
        watches::{Watch, Watches},
        CRef,
    },
    numeric::{Number, Tier},
    structures::{
        literal::{var, Lit},
        origin::Origin,
        term::Term,
    },
};

pub use cardinality::Cardinality;
pub use clause::Clause;
pub use counting::Counting;
pub use watched::Watched;

/// The result of checking a constraint for propagation after a watched literal was falsified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchStatus {
    /// The literal is no longer watched, and its watch should be removed.
    DropWatch,

    /// The literal remains watched.
    KeepWatch,

    /// The constraint is falsified, and the literal remains watched.
    Conflicting,
}

/// The result of attaching a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachStatus {
    Attached,

    /// The constraint is falsified, so was not attached.
    Conflicting,
}

/// A stored constraint.
pub enum Constr {
    Clause(Clause),
    Cardinality(Cardinality),
    Counting32(Counting<K32>),
    Counting64(Counting<K64>),
    Counting96(Counting<K96>),
    Counting128(Counting<K128>),
    CountingArb(Counting<KArb>),
    Watched32(Watched<K32>),
    Watched64(Watched<K64>),
    Watched96(Watched<K96>),
    Watched128(Watched<K128>),
    WatchedArb(Watched<KArb>),
}

/// Evaluates `$body` with `$name` bound to the constraint held by a [Constr].
macro_rules! constr_apply {
    ($constr:expr, $name:ident => $body:expr) => {
        match $constr {
            $crate::db::constr::Constr::Clause($name) => $body,
            $crate::db::constr::Constr::Cardinality($name) => $body,
            $crate::db::constr::Constr::Counting32($name) => $body,
            $crate::db::constr::Constr::Counting64($name) => $body,
            $crate::db::constr::Constr::Counting96($name) => $body,
            $crate::db::constr::Constr::Counting128($name) => $body,
            $crate::db::constr::Constr::CountingArb($name) => $body,
            $crate::db::constr::Constr::Watched32($name) => $body,
            $crate::db::constr::Constr::Watched64($name) => $body,
            $crate::db::constr::Constr::Watched96($name) => $body,
            $crate::db::constr::Constr::Watched128($name) => $body,
            $crate::db::constr::Constr::WatchedArb($name) => $body,
        }
    };
}
pub(crate) use constr_apply;

/// Applies `$body` to the general variants, with `$name` bound to the counting or watched constraint.
macro_rules! general_apply {
    ($constr:expr, $name:ident => $body:expr, $otherwise:expr) => {
        match $constr {
            $crate::db::constr::Constr::Counting32($name) => $body,
            $crate::db::constr::Constr::Counting64($name) => $body,
            $crate::db::constr::Constr::Counting96($name) => $body,
            $crate::db::constr::Constr::Counting128($name) => $body,
            $crate::db::constr::Constr::CountingArb($name) => $body,
            $crate::db::constr::Constr::Watched32($name) => $body,
            $crate::db::constr::Constr::Watched64($name) => $body,
            $crate::db::constr::Constr::Watched96($name) => $body,
            $crate::db::constr::Constr::Watched128($name) => $body,
            $crate::db::constr::Constr::WatchedArb($name) => $body,
            _ => $otherwise,
        }
    };
}

/// Orders literals with those which are not false first, and false literals by decreasing position on the trail.
fn order_for_watching(lits: &mut [Lit], trail: &Trail) {
    lits.sort_by_key(|l| match trail.is_false(*l) {
        false => (0, 0),
        true => (1, UNASSIGNED - trail.position(var(*l))),
    });
}

/// Whether a general constraint should use counting propagation.
///
/// Counting is used when the coefficient mass required by watches exceeds the fraction `1 - prop_counting` of the total mass.
fn prefers_counting(terms: &[Term<BigInt>], degree: &BigInt, prop_counting: f64) -> bool {
    if prop_counting >= 1.0 {
        return true;
    }
    let total: f64 = terms.iter().map(|t| t.c.as_f64()).sum();
    let largest = terms.iter().map(|t| t.c.as_f64()).fold(0.0, f64::max);
    total > 0.0 && (degree.as_f64() + largest) / total > 1.0 - prop_counting
}

impl Constr {
    /// The stored form of a normalised, saturated expression.
    ///
    /// The expression should be neither a tautology nor an inconsistency.
    pub fn from_ce(ce: &CeSuper, trail: &Trail, prop_counting: f64) -> Constr {
        let terms = ce.terms();
        let degree = ce.degree();

        if ce.is_cardinality() {
            let mut lits = terms.iter().map(|t| t.l).collect::<Vec<_>>();
            order_for_watching(&mut lits, trail);
            return match ce.is_clause() {
                true => Constr::Clause(Clause::new(lits)),
                false => Constr::Cardinality(Cardinality::new(lits, degree.convert::<i64>() as u32)),
            };
        }

        let counting = prefers_counting(&terms, &degree, prop_counting);
        match (ce.storage_tier(), counting) {
            (Tier::T32, true) => Constr::Counting32(Counting::new(&terms, &degree)),
            (Tier::T64, true) => Constr::Counting64(Counting::new(&terms, &degree)),
            (Tier::T96, true) => Constr::Counting96(Counting::new(&terms, &degree)),
            (Tier::T128, true) => Constr::Counting128(Counting::new(&terms, &degree)),
            (Tier::Arb, true) => Constr::CountingArb(Counting::new(&terms, &degree)),
            (Tier::T32, false) => Constr::Watched32(Watched::new(&terms, &degree)),
            (Tier::T64, false) => Constr::Watched64(Watched::new(&terms, &degree)),
            (Tier::T96, false) => Constr::Watched96(Watched::new(&terms, &degree)),
            (Tier::T128, false) => Constr::Watched128(Watched::new(&terms, &degree)),
            (Tier::Arb, false) => Constr::WatchedArb(Watched::new(&terms, &degree)),
        }
    }

    pub fn len(&self) -> usize {
        constr_apply!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        constr_apply!(self, c => c.is_empty())
    }

    pub fn is_clause(&self) -> bool {
        matches!(self, Constr::Clause(_))
    }

    /// The tier of the coefficients of the constraint.
    pub fn tier(&self) -> Tier {
        match self {
            Constr::Clause(_) | Constr::Cardinality(_) | Constr::Counting32(_) | Constr::Watched32(_) => Tier::T32,
            Constr::Counting64(_) | Constr::Watched64(_) => Tier::T64,
            Constr::Counting96(_) | Constr::Watched96(_) => Tier::T96,
            Constr::Counting128(_) | Constr::Watched128(_) => Tier::T128,
            Constr::CountingArb(_) | Constr::WatchedArb(_) => Tier::Arb,
        }
    }

    /// The literals of the constraint, in storage order.
    pub fn lits(&self) -> Vec<Lit> {
        match self {
            Constr::Clause(c) => c.lits().to_vec(),
            Constr::Cardinality(c) => c.lits().to_vec(),
            _ => general_apply!(self, c => c.terms().iter().map(|t| t.l).collect(), Vec::default()),
        }
    }

    /// The literal at `index`, in storage order.
    pub fn lit(&self, index: usize) -> Lit {
        match self {
            Constr::Clause(c) => c.lits()[index],
            Constr::Cardinality(c) => c.lits()[index],
            _ => general_apply!(self, c => c.terms()[index].l, 0),
        }
    }

    /// The coefficient of the literal at `index`.
    pub fn coef(&self, index: usize) -> BigInt {
        match self {
            Constr::Clause(_) | Constr::Cardinality(_) => BigInt::from(1),
            _ => general_apply!(self, c => c.terms()[index].c.to_big(), BigInt::from(0)),
        }
    }

    /// The terms of the constraint, with arbitrary precision coefficients.
    pub fn terms(&self) -> Vec<Term<BigInt>> {
        (0..self.len()).map(|i| Term::new(self.coef(i), self.lit(i))).collect()
    }

    pub fn degree(&self) -> BigInt {
        match self {
            Constr::Clause(_) => BigInt::from(1),
            Constr::Cardinality(c) => BigInt::from(c.degree()),
            _ => general_apply!(self, c => c.degree().to_big(), BigInt::from(0)),
        }
    }

    /// Attaches the constraint, watching literals and propagating where required.
    pub fn initialize_watches(&mut self, cref: CRef, trail: &mut Trail, watches: &mut Watches) -> AttachStatus {
        constr_apply!(self, c => c.initialize_watches(cref, trail, watches))
    }

    /// Checks for propagation after the literal of `watch` was falsified.
    pub fn check_for_propagation(
        &mut self,
        watch: &Watch,
        falsified: Lit,
        trail: &mut Trail,
        watches: &mut Watches,
    ) -> WatchStatus {
        match self {
            Constr::Clause(c) => c.check_for_propagation(watch.cref, falsified, trail, watches),
            Constr::Cardinality(c) => c.check_for_propagation(watch.cref, falsified, trail, watches),
            Constr::Counting32(c) => c.check_for_propagation(watch.cref, watch.idx, trail),
            Constr::Counting64(c) => c.check_for_propagation(watch.cref, watch.idx, trail),
            Constr::Counting96(c) => c.check_for_propagation(watch.cref, watch.idx, trail),
            Constr::Counting128(c) => c.check_for_propagation(watch.cref, watch.idx, trail),
            Constr::CountingArb(c) => c.check_for_propagation(watch.cref, watch.idx, trail),
            Constr::Watched32(c) => c.check_for_propagation(watch.cref, watch.idx, trail, watches),
            Constr::Watched64(c) => c.check_for_propagation(watch.cref, watch.idx, trail, watches),
            Constr::Watched96(c) => c.check_for_propagation(watch.cref, watch.idx, trail, watches),
            Constr::Watched128(c) => c.check_for_propagation(watch.cref, watch.idx, trail, watches),
            Constr::WatchedArb(c) => c.check_for_propagation(watch.cref, watch.idx, trail, watches),
        }
    }

    /// Restores the slack lowered by the processing of the watch with index `idx`.
    pub fn undo_falsified(&mut self, idx: u32) {
        general_apply!(self, c => c.undo_falsified(idx), ())
    }

    /// The constraint as an expression, with a derivation beginning from `id`.
    pub fn to_expanded(&self, id: ID, origin: Origin, pools: &CePools) -> CeSuper {
        constr_apply!(self, c => c.to_expanded(id, origin, pools))
    }

    /// Whether the literals true at level zero satisfy the constraint.
    pub fn is_satisfied_at_root(&self, trail: &Trail) -> bool {
        constr_apply!(self, c => c.is_satisfied_at_root(trail))
    }
}

impl std::fmt::Display for Constr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in self.terms() {
            write!(f, "{term} ")?;
        }
        write!(f, ">= {}", self.degree())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ce_of(pools: &CePools, terms: &[(i64, Lit)], rhs: i64) -> CeSuper {
        let mut ce = pools.take(Tier::T32);
        for (c, l) in terms {
            ce.add_lhs(&BigInt::from(*c), *l);
        }
        ce.add_rhs(&BigInt::from(rhs));
        ce
    }

    #[test]
    fn variant_selection() {
        let pools = CePools::default();
        let mut trail = Trail::default();
        trail.grow(4);

        let clause = Constr::from_ce(&ce_of(&pools, &[(1, 1), (1, -2)], 1), &trail, 0.6);
        assert!(clause.is_clause());

        let card = Constr::from_ce(&ce_of(&pools, &[(1, 1), (1, 2), (1, 3)], 2), &trail, 0.6);
        assert!(matches!(card, Constr::Cardinality(_)));
        assert_eq!(card.degree(), BigInt::from(2));

        let counting = Constr::from_ce(&ce_of(&pools, &[(2, 1), (2, 2), (1, 3)], 4), &trail, 0.6);
        assert!(matches!(counting, Constr::Counting32(_)));

        let wide = {
            let mut ce = pools.take(Tier::Arb);
            ce.add_lhs(&(BigInt::from(1) << 100), 4);
            for v in 1..=3 {
                ce.add_lhs(&BigInt::from(1), v);
            }
            ce.add_rhs(&((BigInt::from(1) << 100) + 1));
            ce
        };
        let stored = Constr::from_ce(&wide, &trail, 0.6);
        assert_eq!(stored.tier(), Tier::T128);
        assert_eq!(stored.degree(), (BigInt::from(1) << 100) + 1);
    }

    #[test]
    fn falsified_literals_are_ordered_last() {
        let pools = CePools::default();
        let mut trail = Trail::default();
        trail.grow(4);
        trail.decide(-1);
        trail.decide(-3);
        let clause = Constr::from_ce(&ce_of(&pools, &[(1, 1), (1, 2), (1, 3), (1, 4)], 1), &trail, 0.6);
        assert_eq!(clause.lits(), vec![2, 4, 3, 1]);
    }
}
