/*!
Extraction of a core, when some assumption is falsified.

# Overview

If an assumption `a` is false once every earlier assumption holds, then the formula together with the assumptions is inconsistent.
A core is then derived: a constraint implied by the formula over the negations of the assumptions, any solution to which falsifies some assumption.

- If `-a` holds at level zero, the core is `-a >= 1`.
- If `-a` was itself decided, `-a` is also an assumption and the core is the tautology `a + -a >= 1`.
- Otherwise `-a` was propagated by some reason, falsified by the trail once `a` is assigned in place of `-a`.
  The reason is then resolved, latest literal first, with the reasons of each propagated literal whose negation it contains, leaving only literals falsified by assumptions (or, with `cg_resprop` off, by propagated assumptions too).

Literals which are not falsified by an assumption are weakened, and the core is learned at level zero.

```rust
# use otter_pb::config::Config;
# use otter_pb::solver::Solver;
# use otter_pb::reports::SolveState;
let mut solver = Solver::from_config(Config::default());
let x = solver.new_vars(3);

// x1 and x2 imply x3
solver.add_clause(&[-x[0], -x[1], x[2]]).unwrap();

solver.set_assumptions(&[x[0], x[1], -x[2]]).unwrap();
assert_eq!(solver.solve(), Ok(SolveState::Inconsistent));

// At least one of the assumptions fails
let core = solver.last_core().unwrap();
assert_eq!(core.terms.len(), 3);
```
*/

use crate::{
    ce::resolution::ResolveOptions,
    context::ContextState,
    misc::log::targets,
    numeric::Tier,
    procedures::learn::LearnOk,
    reports::SolveState,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
    },
    types::err::{self, ErrorKind},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Derives a core from the falsified assumption `a`, learns the core, and notes the solver as inconsistent.
    pub(crate) fn extract_core(&mut self, a: Lit) -> Result<SolveState, ErrorKind> {
        self.shared.counters.cores += 1;

        if self.trail.is_unit(-a) {
            self.backjump(0);
            return Ok(self.note_core(ConstrSimple::new([(1, -a)], 1)));
        }
        if self.trail.is_decided(var(a)) {
            self.backjump(0);
            return Ok(self.note_core(ConstrSimple::new([(1, -a), (1, a)], 1)));
        }

        let Some(reason) = self.trail.reason(var(a)) else {
            return Err(err::AnalysisError::MissingReason.into());
        };
        let tier = Tier::for_analysis(self.shared.config.bits_overflow.value);
        let options = ResolveOptions::from_config(&self.shared.config);
        let resolve_propagated = self.shared.config.cg_resprop.value;
        let mut act: Vec<Var> = Vec::default();

        let mut core = self.expand_reason(reason, -a, tier);
        while !self.trail.is_unknown(a) {
            self.undo_one();
        }
        self.trail.assign(a, None);

        let mut index = self.trail.len();
        while index > 0 {
            index -= 1;
            let l = self.trail.literals[index];
            if self.trail.true_level(l) == 0 {
                break;
            }
            if !core.has_lit(-l) {
                continue;
            }
            if !resolve_propagated && self.assumptions.contains(&l) {
                continue;
            }
            let Some(reason) = self.trail.reason(var(l)) else {
                continue;
            };
            let reason_ce = self.expand_reason(reason, l, tier);
            if reason_ce.tier() > core.tier() {
                core = core.convert_at_least(reason_ce.tier(), &self.shared.pools);
                self.shared.counters.tier_escalations += 1;
            }
            core.resolve_with(&reason_ce, l, &self.trail, &options, &mut act, &self.shared.pools);
        }

        core.remove_units_and_zeroes(&self.trail);
        let trail = &self.trail;
        let assumptions = &self.assumptions;
        core.weaken_if(|lit| !(trail.is_false(lit) && assumptions.contains(&-lit)));
        core.saturate();

        self.backjump(0);
        let simple = core.to_simple();
        log::debug!(target: targets::ASSUMPTIONS, "Core of {} literals", simple.terms.len());

        match self.learn_constraint(core, Origin::Learned) {
            LearnOk::Contradiction => {
                self.state = ContextState::Unsatisfiable;
                Ok(SolveState::Unsat)
            }
            _ => Ok(self.note_core(simple)),
        }
    }

    fn note_core(&mut self, core: ConstrSimple) -> SolveState {
        self.last_core = Some(core);
        self.state = ContextState::Inconsistent;
        SolveState::Inconsistent
    }
}
