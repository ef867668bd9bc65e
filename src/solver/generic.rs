use std::collections::{HashMap, HashSet};

use crate::{
    context::{callbacks::CallbackTerminate, ContextState, Counters, SharedContext, ID},
    db::{trail::Trail, watches::Watches, ConstraintDB},
    generic::{activity_heap::ActivityHeap, luby::Luby},
    lp::LpSolver,
    reports::Report,
    structures::{
        literal::{var, Lit, Var},
        simple::ConstrSimple,
    },
    types::err::{self, ErrorKind},
};

/// A generic solver, parameratised to a source of randomness.
///
/// Requires a source of [rng](rand::Rng) which (also) implements [Default].
///
/// # Example
///
/// ```rust
/// # use otter_pb::solver::GenericSolver;
/// # use otter_pb::generic::random::MinimalPCG32;
/// # use otter_pb::config::Config;
/// let solver = GenericSolver::<MinimalPCG32>::from_config(Config::default());
/// ```
pub struct GenericSolver<R: rand::Rng + std::default::Default> {
    /// Configuration, counters, pools, and the dispatcher.
    pub shared: SharedContext,

    /// The trail of assignments.
    /// See [db::trail](crate::db::trail) for details.
    pub trail: Trail,

    /// Watch lists, indexed by literal.
    pub watches: Watches,

    /// The constraint database.
    /// See [db](crate::db) for details.
    pub db: ConstraintDB,

    /// Variables by activity, containing at least every unassigned variable.
    pub heap: ActivityHeap,

    /// The status of the solver.
    pub state: ContextState,

    /// The source of rng.
    pub rng: R,

    /// The saved phase of each variable, as a literal.
    pub(crate) phase: Vec<Lit>,

    pub(crate) max_var: Var,

    pub(crate) assumptions: Vec<Lit>,

    pub(crate) last_solution: Option<Vec<Lit>>,

    pub(crate) last_core: Option<ConstrSimple>,

    /// The identifier of the constraint falsified at level zero, once found.
    pub(crate) unsat_id: Option<ID>,

    /// The amount a variable is bumped by, growing with each conflict.
    pub(crate) var_bump: f64,

    /// The amount a learned constraint is bumped by, growing with each conflict.
    pub(crate) constr_bump: f64,

    pub(crate) luby: Luby,

    /// Conflicts before the next restart.
    pub(crate) restart_limit: f64,

    /// Total conflicts at which the next reduction is due.
    pub(crate) next_reduction: usize,

    /// Total conflicts at which the next round of inprocessing is due.
    pub(crate) next_inprocessing: usize,

    /// Literals implied by each literal, as found by probing.
    pub(crate) implications: HashMap<Lit, HashSet<Lit>>,

    /// An objective, consulted when inprocessing.
    pub(crate) objective: Option<ConstrSimple>,

    /// An external solver of the linear relaxation.
    pub(crate) lp: Option<Box<dyn LpSolver>>,

    /// Terminates procedures, if true.
    pub(crate) callback_terminate: Option<Box<CallbackTerminate>>,
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A report on the state of the solver.
    pub fn report(&self) -> Report {
        Report::from(self.state)
    }

    /// The largest variable of the solver.
    pub fn max_var(&self) -> Var {
        self.max_var
    }

    pub fn counters(&self) -> &Counters {
        &self.shared.counters
    }

    /// The value of `l`, from the trail if assigned and otherwise from the most recent solution, if the solver is satisfiable.
    pub fn value_of(&self, l: Lit) -> Option<bool> {
        if l == 0 || var(l) > self.max_var {
            return None;
        }
        match self.trail.value_of(l) {
            Some(value) => Some(value),
            None => match (&self.last_solution, self.state) {
                (Some(solution), ContextState::Satisfiable) => Some(solution[var(l) as usize] == l),
                _ => None,
            },
        }
    }

    /// The decision level at which `l` was made true, if true on the trail.
    pub fn level_of(&self, l: Lit) -> Option<i32> {
        if l == 0 || var(l) > self.max_var || !self.trail.is_true(l) {
            return None;
        }
        Some(self.trail.true_level(l))
    }

    pub fn has_solution(&self) -> bool {
        self.last_solution.is_some()
    }

    pub fn has_core(&self) -> bool {
        self.last_core.is_some()
    }

    /// The most recent solution, as the literal of each variable true under the solution.
    pub fn last_solution(&self) -> Result<Vec<Lit>, ErrorKind> {
        match &self.last_solution {
            Some(solution) => Ok(solution.iter().skip(1).copied().collect()),
            None => Err(err::UsageError::NoSolution.into()),
        }
    }

    /// The most recent solution, indexed by variable with index zero unused.
    pub(crate) fn solution_by_var(&self) -> Option<&[Lit]> {
        self.last_solution.as_deref()
    }

    /// The most recent core, as a constraint over the negations of assumptions at least one of which must hold.
    pub fn last_core(&self) -> Result<&ConstrSimple, ErrorKind> {
        match &self.last_core {
            Some(core) => Ok(core),
            None => Err(err::UsageError::NoCore.into()),
        }
    }

    /// The identifier of the constraint found to be falsified at level zero.
    pub fn unsatisfiable_constraint(&self) -> Result<ID, ErrorKind> {
        match (self.state, self.unsat_id) {
            (ContextState::Unsatisfiable, Some(id)) => Ok(id),
            _ => Err(ErrorKind::InvalidState),
        }
    }

    /// Requests the current (or next) solve stops at the next loop boundary.
    pub fn request_stop(&self) {
        self.shared.request_stop();
    }

    pub fn set_dispatcher(&mut self, dispatcher: std::rc::Rc<crate::dispatch::Dispatcher>) {
        self.shared.set_dispatcher(dispatcher);
    }

    /// Sets the objective consulted during inprocessing, e.g. when breaking dominance.
    pub fn set_objective(&mut self, objective: Option<ConstrSimple>) {
        self.objective = objective;
    }

    /// Sets the external solver of the linear relaxation, used when the `lp` option is positive.
    pub fn set_lp_solver(&mut self, lp: Box<dyn LpSolver>) {
        self.lp = Some(lp);
    }

    /// Literals found to be implied by `l` during probing.
    pub fn implications_of(&self, l: Lit) -> Option<&HashSet<Lit>> {
        self.implications.get(&l)
    }
}
