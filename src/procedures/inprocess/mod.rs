/*!
Inprocessing, at level zero between rounds of search.

# Overview

A round of inprocessing is made of the following passes, each enabled by an option:
- [Pure literals](pure) (`inp_purelits`), fixing literals whose negation occurs in no constraint of the formula.
- [Probing](probing) (`inp_probing`), deciding each polarity of a variable in turn to find failed literals, common implications, and equalities.
- [At-most-one detection](amo) (`inp_atmostone`), building cardinality constraints from implications found when probing.
- [Dominance breaking](dominance) (`inp_dombreaklim`), forbidding assignments for which a swap of two literals gives an assignment at least as good.

Pure literals and dominance breaking preserve satisfiability (and the optimal value of the objective) though not equivalence, and so the constraints they add are noted as input.
The constraints found by probing and at-most-one detection are implied, and are learned.

A round ends early if the formula is found unsatisfiable.

```rust
# use otter_pb::config::Config;
# use otter_pb::solver::Solver;
let mut solver = Solver::from_config(Config::default());
let x = solver.new_vars(3);

// x2 follows from x1 and from -x1
solver.add_clause(&[-x[0], x[1]]).unwrap();
solver.add_clause(&[x[0], x[1]]).unwrap();
solver.add_clause(&[-x[1], x[2], -x[0]]).unwrap();

solver.inprocess();
assert_eq!(solver.value_of(x[1]), Some(true));
```
*/

pub mod amo;
pub mod dominance;
pub mod probing;
pub mod pure;

use crate::{
    ce::super_ce::CeSuper,
    misc::log::targets,
    procedures::learn::LearnOk,
    solver::GenericSolver,
    structures::{literal::Lit, origin::Origin, simple::ConstrSimple},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A round of inprocessing, at level zero.
    pub fn inprocess(&mut self) {
        self.backjump(0);
        self.shared.counters.inprocessings += 1;
        log::debug!(target: targets::INPROCESSING, "Inprocessing round {}", self.shared.counters.inprocessings);

        if self.unsat_id.is_none() && self.propagate_once() {
            let config = &self.shared.config;
            let (purelits, probing) = (config.inp_purelits.value, config.inp_probing.value);
            let (atmostone, dombreaklim) = (config.inp_atmostone.value, config.inp_dombreaklim.value);

            if purelits {
                self.fix_pure_literals();
            }
            if probing && self.unsat_id.is_none() {
                self.probe();
            }
            if atmostone > 0.0 && self.unsat_id.is_none() {
                self.detect_at_most_ones();
            }
            if dombreaklim > 0 && self.unsat_id.is_none() {
                self.break_dominance();
            }
        }

        self.next_inprocessing = self.inprocessing_interval();
    }

    /// Adds an implied constraint at level zero and propagates, returning false if the formula was found unsatisfiable.
    pub(crate) fn learn_at_root(&mut self, ce: CeSuper, origin: Origin) -> bool {
        match self.learn_constraint(ce, origin) {
            LearnOk::Contradiction => false,
            _ => self.propagate_once(),
        }
    }

    /// Adds a constraint which preserves satisfiability at level zero and propagates, returning false if the formula was found unsatisfiable.
    pub(crate) fn add_at_root(&mut self, simple: &ConstrSimple, origin: Origin) -> bool {
        match self.add_simple(simple, origin) {
            Ok(_) => self.unsat_id.is_none(),
            Err(e) => {
                log::warn!(target: targets::INPROCESSING, "Failed to add {simple}: {e}");
                false
            }
        }
    }

    /// The unit `l` as an expression.
    pub(crate) fn unit_ce(&self, l: Lit) -> CeSuper {
        self.ce_from_simple(&ConstrSimple::new([(1, l)], 1))
    }
}
