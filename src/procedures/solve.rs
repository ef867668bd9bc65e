/*!
The solve procedure.

# Overview

A solve is a loop of steps, where each step is one of:
- [Propagation](crate::procedures::propagate) to a conflict, followed by [analysis](crate::procedures::analysis) of the conflict and [learning](crate::procedures::learn) of the derived constraint.
- Propagation to a fixpoint, followed by any scheduled maintenance and then a [decision](crate::procedures::decision).

Maintenance, in order:
- A round of the linear relaxation, if an [LP solver](crate::lp) is present and the relaxation has used less than its share of deterministic time.
- A [restart](GenericSolver::restart), if due.
- A [reduction](crate::procedures::reduce) of the constraint database, if due.
- A round of [inprocessing](crate::procedures::inprocess), if due, after which control returns to the caller with [Inprocessed](SolveState::Inprocessed).

A step returns a [SolveState] when the solve ends:
- [Unsat](SolveState::Unsat), if some constraint is falsified at level zero. After this, any further solve is an error.
- [Sat](SolveState::Sat), if every variable is assigned without conflict. The solution is then available from [last_solution](GenericSolver::last_solution).
- [Inconsistent](SolveState::Inconsistent), if some assumption was falsified. A core is then available from [last_core](GenericSolver::last_core).

Between steps the solve checks whether a stop has been requested (by [request_stop](GenericSolver::request_stop) or the terminate callback), in which case the solve returns [Interrupted](ErrorKind::Interrupted) and the solver may not be used further, and whether a time limit has been reached, in which case the solve returns [Timeout](SolveState::Timeout) and may be resumed.

```rust
# use otter_pb::config::Config;
# use otter_pb::solver::Solver;
# use otter_pb::reports::SolveState;
# use otter_pb::types::err::{ErrorKind, UsageError};
let mut solver = Solver::from_config(Config::default());
let x = solver.new_var();
solver.add_clause(&[x]).unwrap();
solver.add_clause(&[-x]).unwrap();

assert_eq!(solver.solve(), Ok(SolveState::Unsat));
assert_eq!(solver.solve(), Err(ErrorKind::Usage(UsageError::SolveAfterUnsat)));
```
*/

use std::time::Instant;

use crate::{
    context::ContextState,
    dispatch::Dispatch,
    misc::log::targets,
    procedures::{decision::DecisionOk, learn::LearnOk},
    reports::SolveState,
    solver::GenericSolver,
    structures::literal::{var, Lit},
    types::err::{self, ErrorKind},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Solves until the solve ends, a time limit is reached, or control returns after inprocessing.
    pub fn solve(&mut self) -> Result<SolveState, ErrorKind> {
        match self.state {
            ContextState::Interrupted => return Err(ErrorKind::InvalidState),
            ContextState::Unsatisfiable => return Err(err::UsageError::SolveAfterUnsat.into()),
            _ => {}
        }

        let start = Instant::now();
        self.state = ContextState::Solving;
        self.last_core = None;

        let result = loop {
            if self.shared.stop_requested() || self.check_callback_terminate() {
                log::info!(target: targets::PROPAGATION, "Solve interrupted");
                self.state = ContextState::Interrupted;
                break Err(ErrorKind::Interrupted);
            }
            if self.shared.timed_out() {
                break Ok(SolveState::Timeout);
            }
            match self.solve_step() {
                Ok(None) => {}
                Ok(Some(state)) => break Ok(state),
                Err(e) => break Err(e),
            }
        };

        self.shared.counters.time += start.elapsed();
        result
    }

    /// Solves, resuming after each round of inprocessing.
    pub fn solve_full(&mut self) -> Result<SolveState, ErrorKind> {
        loop {
            match self.solve()? {
                SolveState::Inprocessed => continue,
                state => return Ok(state),
            }
        }
    }

    /// A single step of a solve, returning a state if the solve has ended.
    pub fn solve_step(&mut self) -> Result<Option<SolveState>, ErrorKind> {
        if self.unsat_id.is_some() {
            return Ok(Some(self.note_unsatisfiable()));
        }

        if let Some(conflict) = self.propagate() {
            if self.trail.decision_level() == 0 {
                let id = self.db.get(conflict).header.id;
                self.note_contradiction(id);
                return Ok(Some(self.note_unsatisfiable()));
            }
            let confl = self.analyze(conflict)?;
            if self.learn_from_conflict(confl) == LearnOk::Contradiction {
                return Ok(Some(self.note_unsatisfiable()));
            }
            self.decay_activity();
            return Ok(None);
        }

        if self.lp_due() && self.run_lp() {
            return Ok(None);
        }
        if self.restart_due() {
            self.restart();
        }
        if self.reduction_due() {
            self.reduce();
        }
        if self.inprocessing_due() {
            self.inprocess();
            return Ok(Some(SolveState::Inprocessed));
        }

        match self.make_decision()? {
            DecisionOk::Literal(_) => Ok(None),
            DecisionOk::Exhausted => Ok(Some(self.record_solution())),
            DecisionOk::Core(state) => Ok(Some(state)),
        }
    }

    fn note_unsatisfiable(&mut self) -> SolveState {
        log::info!(target: targets::ANALYSIS, "Unsatisfiable");
        self.backjump(0);
        self.state = ContextState::Unsatisfiable;
        SolveState::Unsat
    }

    /// Records the valuation of the trail as a solution.
    fn record_solution(&mut self) -> SolveState {
        let mut solution: Vec<Lit> = vec![0; self.max_var as usize + 1];
        for &l in &self.trail.literals {
            solution[var(l) as usize] = l;
        }
        self.shared.counters.solutions += 1;
        self.shared.dispatch(Dispatch::Solution {
            literals: solution[1..].to_vec(),
        });
        self.last_solution = Some(solution);

        self.backjump(0);
        self.state = ContextState::Satisfiable;
        SolveState::Sat
    }
}
