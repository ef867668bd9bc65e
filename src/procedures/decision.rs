/*!
Decisions, on assumptions and then by activity.

# Overview

A decision is made only at a fixpoint of [propagation](crate::procedures::propagate).

Assumptions are decided first, in the order given, each opening a fresh decision level:
- An assumption which is already true is skipped, and so does not open a level.
- An assumption which is false leads to the [extraction of a core](crate::procedures::assumptions), and the solve ends.

Once every assumption holds, the unassigned variable of greatest activity is decided, with the polarity saved as its phase.
If no variable remains unassigned the valuation on the trail is a solution.

```rust
# use otter_pb::config::Config;
# use otter_pb::solver::Solver;
# use otter_pb::reports::SolveState;
let mut solver = Solver::from_config(Config::default());
let x = solver.new_vars(2);
solver.add_clause(&[x[0], x[1]]).unwrap();

// Each variable is first decided true.
solver.set_solution_hints(&[x[0], x[1]]);
assert_eq!(solver.solve(), Ok(SolveState::Sat));
assert_eq!(solver.last_solution(), Ok(vec![x[0], x[1]]));
```
*/

use crate::{
    misc::log::targets,
    procedures::propagate::DET_PER_LITERAL,
    reports::SolveState,
    solver::GenericSolver,
    structures::literal::{var, Lit},
    types::err::{self, ErrorKind},
};

/// Possible outcomes of making a decision.
pub enum DecisionOk {
    /// A literal was decided.
    Literal(Lit),

    /// Every variable is assigned.
    Exhausted,

    /// Some assumption was falsified, and a core was extracted.
    Core(SolveState),
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Makes a decision, on the next assumption to hold if any and otherwise on the most active unassigned variable.
    pub fn make_decision(&mut self) -> Result<DecisionOk, ErrorKind> {
        let mut pending = None;
        for &a in &self.assumptions {
            if self.trail.is_false(a) {
                pending = Some(Err(a));
                break;
            }
            if self.trail.is_unknown(a) {
                pending = Some(Ok(a));
                break;
            }
        }

        match pending {
            Some(Err(a)) => {
                log::debug!(target: targets::ASSUMPTIONS, "Assumption {a} falsified");
                return Ok(DecisionOk::Core(self.extract_core(a)?));
            }
            Some(Ok(a)) => {
                self.decide(a);
                return Ok(DecisionOk::Literal(a));
            }
            None => {}
        }

        while let Some(v) = self.heap.pop_max() {
            if self.trail.is_unknown(v) {
                let l = self.phase[v as usize];
                self.decide(l);
                return Ok(DecisionOk::Literal(l));
            }
        }
        Ok(DecisionOk::Exhausted)
    }

    pub(crate) fn decide(&mut self, l: Lit) {
        self.shared.counters.decisions += 1;
        self.shared.counters.det_time += DET_PER_LITERAL;
        self.heap.remove(var(l));
        self.trail.decide(l);
        log::trace!(target: targets::PROPAGATION, "Decided {l} at level {}", self.trail.decision_level());
    }

    /// Sets the phase of each variable of `hints` to the polarity given.
    ///
    /// Literals of unknown variables are ignored.
    pub fn set_solution_hints(&mut self, hints: &[Lit]) {
        for &l in hints {
            if l != 0 && var(l) <= self.max_var {
                self.phase[var(l) as usize] = l;
            }
        }
    }

    /// Replaces the assumptions of the solver.
    ///
    /// Decisions are cleared, as any decision may rest on a previous assumption.
    pub fn set_assumptions(&mut self, assumptions: &[Lit]) -> Result<(), ErrorKind> {
        for &a in assumptions {
            if a == 0 || var(a) > self.max_var {
                return Err(err::UsageError::InvalidAssumption(a).into());
            }
        }
        self.backjump(0);
        self.assumptions = assumptions.to_vec();
        log::debug!(target: targets::ASSUMPTIONS, "Assumptions: {assumptions:?}");
        Ok(())
    }

    pub fn clear_assumptions(&mut self) {
        self.backjump(0);
        self.assumptions.clear();
    }

    pub fn assumptions(&self) -> &[Lit] {
        &self.assumptions
    }
}
