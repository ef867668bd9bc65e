/*!
The contract with an external solver of the linear relaxation.

# Overview

An [LpSolver] is given a view of the relaxation: the constraints of the formula, the objective (if any), and the current partial assignment, which fixes the bounds of assigned variables.
The solver is called synchronously, and replies with an [LpResult]:
- [NoResult](LpResult::NoResult), e.g. on reaching its own time limit.
- [Infeasible](LpResult::Infeasible), with a Farkas certificate: a constraint implied by the formula which is falsified by the current assignment.
- [Cuts](LpResult::Cuts), with constraints obtained from the duals of an optimal solution to the relaxation, along with that (fractional) solution.

Each returned constraint is learned, with cuts first saturated and reduced to fit the overflow budget by weakening literals judged not false by the fractional solution.
Constraints mentioning unknown variables are ignored.

The relaxation is consulted at a fixpoint of propagation whenever the `lp` option is positive and the deterministic time spent in the relaxation is at most `lp` times the deterministic time of the solve.

```rust
# use otter_pb::config::Config;
# use otter_pb::lp::{LpResult, LpSolver, LpView};
# use otter_pb::solver::Solver;
# use otter_pb::reports::SolveState;
struct Unhelpful;

impl LpSolver for Unhelpful {
    fn run(&mut self, _view: &LpView) -> LpResult {
        LpResult::NoResult
    }
}

let mut config = Config::default();
config.lp.value = 1.0;
let mut solver = Solver::from_config(config);
solver.set_lp_solver(Box::new(Unhelpful));

let x = solver.new_vars(2);
solver.add_clause(&[x[0], x[1]]).unwrap();
assert_eq!(solver.solve(), Ok(SolveState::Sat));
```
*/

use crate::{
    misc::log::targets,
    procedures::learn::LearnOk,
    solver::GenericSolver,
    structures::{
        literal::var,
        origin::Origin,
        simple::ConstrSimple,
    },
};

/// Deterministic time of a call to the relaxation, before accounting for its size.
const DET_PER_CALL: f64 = 1e-3;

/// Deterministic time of a call to the relaxation, per constraint.
const DET_PER_ROW: f64 = 1e-5;

/// A view of the relaxation, as given to an [LpSolver].
pub struct LpView<'a> {
    /// The constraints of the formula.
    pub constraints: Vec<ConstrSimple>,

    /// An objective to minimize, if any.
    pub objective: Option<&'a ConstrSimple>,

    /// The value of each variable on the trail, indexed by variable with index zero unused.
    pub assignment: Vec<Option<bool>>,
}

/// The reply of an [LpSolver].
#[derive(Clone, Debug, PartialEq)]
pub enum LpResult {
    NoResult,

    /// The relaxation is infeasible, with the certificate given.
    Infeasible(ConstrSimple),

    /// Cuts from an optimal solution of the relaxation.
    Cuts {
        cuts: Vec<ConstrSimple>,

        /// The value of each variable in the optimal solution, indexed by variable.
        solution: Vec<f64>,
    },
}

/// An external solver of the linear relaxation.
pub trait LpSolver {
    fn run(&mut self, view: &LpView) -> LpResult;
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    pub(crate) fn lp_due(&self) -> bool {
        let ratio = self.shared.config.lp.value;
        ratio > 0.0
            && self.lp.is_some()
            && self.shared.counters.det_time_lp <= ratio * self.shared.counters.det_time
    }

    fn lp_view(&self) -> LpView<'_> {
        let constraints = self
            .db
            .live_refs()
            .into_iter()
            .filter(|cref| self.db.get(*cref).header.origin.is_external())
            .map(|cref| {
                let constr = &self.db.get(cref).constr;
                ConstrSimple::from_big(constr.terms().into_iter().map(|t| (t.c, t.l)), constr.degree())
            })
            .collect();
        let assignment = std::iter::once(None)
            .chain((1..=self.max_var).map(|v| self.trail.value_of(v)))
            .collect();
        LpView {
            constraints,
            objective: self.objective.as_ref(),
            assignment,
        }
    }

    fn is_known(&self, constraint: &ConstrSimple) -> bool {
        constraint
            .terms
            .iter()
            .all(|t| t.l != 0 && var(t.l) <= self.max_var)
    }

    /// Consults the relaxation, returning true if some constraint was learned.
    pub(crate) fn run_lp(&mut self) -> bool {
        let Some(mut lp) = self.lp.take() else {
            return false;
        };
        let (result, rows) = {
            let view = self.lp_view();
            (lp.run(&view), view.constraints.len())
        };
        self.lp = Some(lp);
        self.shared.counters.det_time_lp += DET_PER_CALL + rows as f64 * DET_PER_ROW;

        match result {
            LpResult::NoResult => false,

            LpResult::Infeasible(farkas) => {
                if !self.is_known(&farkas) {
                    return false;
                }
                log::debug!(target: targets::LP, "Infeasible relaxation");
                let ce = self.ce_from_simple(&farkas);
                !matches!(self.learn_constraint(ce, Origin::Farkas), LearnOk::Redundant)
            }

            LpResult::Cuts { cuts, solution } => {
                let bits_overflow = self.shared.config.bits_overflow.value;
                let bits_reduced = self.shared.config.bits_reduced();
                let mut learned = false;
                for cut in &cuts {
                    if !self.is_known(cut) {
                        continue;
                    }
                    let mut ce = self.ce_from_simple(cut);
                    ce.remove_units_and_zeroes(&self.trail);
                    ce.saturate_and_fix_overflow_rational(&solution, bits_overflow, bits_reduced);
                    if ce.is_tautology() {
                        continue;
                    }
                    match self.learn_constraint(ce, Origin::Duals) {
                        LearnOk::Redundant => {}
                        LearnOk::Stored(_) => learned = true,
                        LearnOk::Contradiction => return true,
                    }
                }
                log::debug!(target: targets::LP, "{} cuts from the relaxation", cuts.len());
                learned
            }
        }
    }
}
