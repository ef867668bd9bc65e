/*!
Minimization of a linear objective over the solutions of a formula.

# Overview

An [Optimization] wraps a solver and an objective Σ c·l, normalised so each cost is positive and each variable occurs once, with any constant collected in an offset.
A lower bound and (once a solution is found) an upper bound on the value of the objective are tracked, and the optimization ends once the bounds meet.

Rounds of two kinds are interleaved, with the share of deterministic time given to core-guided rounds set by the `cg` option:
- A *core-guided* round assumes each literal of positive cost in the (reformulated) objective is false.
  If the assumptions are inconsistent, the core found raises the lower bound and the objective is reformulated.
- A *solution improving* round solves without assumptions, and each solution found lowers the upper bound, with a constraint forbidding solutions which are no better (if `opt_boundupper`).

# Reformulation

A core Σ cᵢ·lᵢ ≥ d over literals of the objective is first reduced to a cardinality constraint Σ lᵢ ≥ k, with k the least count of literals whose largest coefficients reach `d`.
With `m` the least cost among the literals of the core, the objective is rewritten using m·Σ lᵢ = m·k + m·(Σ lᵢ - k):
- The cost of each literal of the core drops by `m`, and the lower bound rises by m·k.
- A [lazy variable](lazy_var) with cost `m` counts the literals true beyond `k`, and is extended whenever its most recent counting variable occurs in a later core.

When this happens is set by the `cg_reform` option:
- [Always](Reformulation::Always), on finding each core.
- [Depletion](Reformulation::Depletion), once the current stratum is satisfiable, with the literals of each pending core set aside until then.
- [Never](Reformulation::Never), in which case no lazy variable is introduced, the lower bound still rises, and solution improving rounds close the gap.

# Stratification

Literals are assumed false only if their cost is at or above a [threshold](stratification), which is lowered whenever the assumed literals can all be false together.

# Example

```rust
# use otter_pb::config::Config;
# use otter_pb::optimization::Optimization;
# use otter_pb::reports::Report;
# use otter_pb::solver::Solver;
# use otter_pb::structures::simple::ConstrSimple;
# use num_bigint::BigInt;
let mut solver = Solver::from_config(Config::default());
let x = solver.new_var();
let y = solver.new_var();
solver.add_clause(&[x, y]).unwrap();

// Minimize 2x + 3y
let objective = ConstrSimple::new([(2, x), (3, y)], 0);
let mut optimization = Optimization::new(solver, &objective).unwrap();

assert_eq!(optimization.run_full(true), Ok(Report::Optimal));
assert_eq!(optimization.lower_bound(), &BigInt::from(2));
assert_eq!(optimization.upper_bound(), Some(&BigInt::from(2)));
```
*/

pub mod lazy_var;
pub mod stratification;

use std::collections::{BTreeMap, HashMap, HashSet};

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use slotmap::{DefaultKey, SlotMap};

use crate::{
    config::Reformulation,
    context::ID,
    dispatch::Dispatch,
    misc::log::targets,
    reports::{Report, SolveState},
    solver::GenericSolver,
    structures::{
        literal::{var, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
    },
    types::err::{self, ErrorKind},
};

use lazy_var::LazyVar;
use stratification::Stratification;

/// A core reduced to a cardinality constraint, at least `degree` of `lits`.
#[derive(Clone, Debug)]
struct Core {
    lits: Vec<Lit>,
    degree: usize,
}

/// The optimization driver.
pub struct Optimization<R: rand::Rng + std::default::Default> {
    pub solver: GenericSolver<R>,

    /// The normalised objective, with positive costs and a right hand side of zero.
    objective: ConstrSimple,

    /// The constant part of the objective.
    offset: BigInt,

    /// The reformulated objective, with positive costs only.
    costs: BTreeMap<Lit, BigInt>,

    lower: BigInt,

    upper: Option<BigInt>,

    /// The best solution found, indexed by variable.
    best: Option<Vec<Lit>>,

    strat: Stratification,

    lazy_vars: SlotMap<DefaultKey, LazyVar>,

    /// The lazy variable of each most recent counting variable.
    lazy_of: HashMap<Var, DefaultKey>,

    /// Cores awaiting reformulation, when reformulating on depletion.
    pending: Vec<Core>,

    /// Literals of pending cores, which are not assumed.
    deferred: HashSet<Lit>,

    lower_id: Option<ID>,

    upper_id: Option<ID>,

    /// Set once core-guided rounds can make no further progress.
    exhausted: bool,
}

/// Removes a constraint, ignoring constraints already removed by the solver.
fn remove_if_present<R: rand::Rng + std::default::Default>(
    solver: &mut GenericSolver<R>,
    id: ID,
) -> Result<(), ErrorKind> {
    match solver.remove_constraint(id) {
        Ok(()) | Err(ErrorKind::ConstraintDB(err::ConstraintDBError::UnknownId)) => Ok(()),
        Err(e) => Err(e),
    }
}

impl<R: rand::Rng + std::default::Default> Optimization<R> {
    /// An optimization of `solver`, minimizing the left hand side of `objective`.
    ///
    /// The right hand side of `objective` is ignored.
    pub fn new(mut solver: GenericSolver<R>, objective: &ConstrSimple) -> Result<Self, ErrorKind> {
        let mut by_var: BTreeMap<Var, BigInt> = BTreeMap::default();
        let mut offset = BigInt::zero();
        for term in &objective.terms {
            if term.l == 0 || var(term.l) > solver.max_var() {
                return Err(err::UsageError::InvalidObjective.into());
            }
            let coef = by_var.entry(var(term.l)).or_default();
            match term.l > 0 {
                true => *coef += &term.c,
                false => {
                    // c·¬x = c - c·x
                    offset += &term.c;
                    *coef -= &term.c;
                }
            }
        }

        let mut costs = BTreeMap::default();
        for (v, c) in by_var {
            if c.is_positive() {
                costs.insert(v, c);
            } else if c.is_negative() {
                // c·x = c + (-c)·¬x
                offset += &c;
                costs.insert(-v, -c);
            }
        }

        let normalised = ConstrSimple::from_big(costs.iter().map(|(l, c)| (c.clone(), *l)), BigInt::zero());
        solver.set_objective(Some(normalised.clone()));
        let strat = Stratification::new(solver.shared.config.cg_strat.value, costs.values());
        log::info!(target: targets::OPTIMIZATION, "Objective {normalised} with offset {offset}");

        Ok(Optimization {
            solver,
            objective: normalised,
            lower: offset.clone(),
            offset,
            costs,
            upper: None,
            best: None,
            strat,
            lazy_vars: SlotMap::new(),
            lazy_of: HashMap::default(),
            pending: Vec::default(),
            deferred: HashSet::default(),
            lower_id: None,
            upper_id: None,
            exhausted: false,
        })
    }

    pub fn lower_bound(&self) -> &BigInt {
        &self.lower
    }

    pub fn upper_bound(&self) -> Option<&BigInt> {
        self.upper.as_ref()
    }

    pub fn objective_bounds(&self) -> (BigInt, Option<BigInt>) {
        (self.lower.clone(), self.upper.clone())
    }

    /// The best solution found, as the literal of each variable true under the solution.
    pub fn best_solution(&self) -> Option<&[Lit]> {
        self.best.as_deref().map(|solution| &solution[1..])
    }

    /// The reformulated objective, as pairs of literal and cost.
    pub fn reformulated_objective(&self) -> Vec<(Lit, BigInt)> {
        self.costs.iter().map(|(l, c)| (*l, c.clone())).collect()
    }

    /// Lazy variables introduced by reformulation.
    pub fn lazy_vars(&self) -> impl Iterator<Item = &LazyVar> {
        self.lazy_vars.values()
    }

    pub fn is_optimal(&self) -> bool {
        self.upper.as_ref().is_some_and(|upper| self.lower >= *upper)
    }

    /// The value of the objective under a solution indexed by variable.
    fn value_of(&self, solution: &[Lit]) -> BigInt {
        let mut value = self.offset.clone();
        for term in &self.objective.terms {
            if solution[var(term.l) as usize] == term.l {
                value += &term.c;
            }
        }
        value
    }

    fn dispatch_bounds(&self) {
        self.solver.shared.dispatch(Dispatch::ObjectiveBound {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
        });
    }

    /// Bounds the objective by the most recent solution of the solver, returning true if the upper bound improved.
    pub fn bound_by_last_solution(&mut self) -> Result<bool, ErrorKind> {
        let Some(solution) = self.solver.solution_by_var() else {
            return Err(err::UsageError::NoSolution.into());
        };
        let value = self.value_of(solution);
        if self.upper.as_ref().is_some_and(|upper| value >= *upper) {
            return Ok(false);
        }
        self.best = Some(solution.to_vec());
        log::info!(target: targets::OPTIMIZATION, "Upper bound {value}");
        self.upper = Some(value.clone());
        self.dispatch_bounds();

        if self.solver.shared.config.opt_boundupper.value {
            // Σ c·l ≤ value - 1
            let rhs = -(value - &self.offset - BigInt::one());
            let bound = ConstrSimple::from_big(self.objective.terms.iter().map(|t| (-t.c.clone(), t.l)), rhs);
            let (id, _) = self.solver.add_simple(&bound, Origin::UpperBound)?;
            if let Some(old) = self.upper_id.replace(id) {
                remove_if_present(&mut self.solver, old)?;
            }
        }
        Ok(true)
    }

    /// Raises the lower bound, with a constraint noting the bound.
    fn raise_lower_bound(&mut self, lower: BigInt) -> Result<(), ErrorKind> {
        if lower <= self.lower {
            return Ok(());
        }
        log::info!(target: targets::OPTIMIZATION, "Lower bound {lower}");
        self.lower = lower;
        self.dispatch_bounds();

        let rhs = &self.lower - &self.offset;
        let bound = ConstrSimple::from_big(self.objective.terms.iter().map(|t| (t.c.clone(), t.l)), rhs);
        let (id, _) = self.solver.add_simple(&bound, Origin::LowerBound)?;
        if let Some(old) = self.lower_id.replace(id) {
            remove_if_present(&mut self.solver, old)?;
        }
        Ok(())
    }

    fn core_guided_due(&self) -> bool {
        if self.exhausted {
            return false;
        }
        if !self.solver.shared.config.opt_boundupper.value {
            return true;
        }
        let hybrid = self.solver.shared.config.cg_hybrid.value;
        let counters = &self.solver.shared.counters;
        match hybrid {
            h if h >= 1.0 => true,
            h if h <= 0.0 => false,
            h => counters.det_time_core_guided <= h * counters.det_time,
        }
    }

    /// The assumptions of a core-guided round.
    fn assumptions(&self) -> Vec<Lit> {
        self.costs
            .iter()
            .filter(|(l, c)| self.strat.admits(c) && !self.deferred.contains(l))
            .map(|(l, _)| -*l)
            .collect()
    }

    /// Ends a stratum, returning false if every literal of positive cost was assumed.
    fn deplete(&mut self) -> Result<bool, ErrorKind> {
        if !self.pending.is_empty() {
            for core in std::mem::take(&mut self.pending) {
                self.reformulate(core, true)?;
            }
            self.deferred.clear();
            return Ok(true);
        }
        let lowered = self.strat.lower(self.costs.values());
        if lowered {
            log::debug!(target: targets::OPTIMIZATION, "Stratum threshold {}", self.strat.threshold());
        }
        Ok(lowered)
    }

    /// A single round of optimization, returning a report if the optimization has ended.
    pub fn run_once(&mut self) -> Result<Option<Report>, ErrorKind> {
        if self.is_optimal() {
            return Ok(Some(Report::Optimal));
        }

        let mut core_guided = self.core_guided_due();
        let mut assumptions = Vec::default();
        if core_guided {
            assumptions = self.assumptions();
            while assumptions.is_empty() && self.deplete()? {
                assumptions = self.assumptions();
            }
            if assumptions.is_empty() {
                log::debug!(target: targets::OPTIMIZATION, "Core-guided search exhausted");
                self.exhausted = true;
                core_guided = false;
            }
        }

        match core_guided {
            true => self.solver.set_assumptions(&assumptions)?,
            false => self.solver.clear_assumptions(),
        }
        let det_start = self.solver.shared.counters.det_time;
        let state = self.solver.solve()?;
        if core_guided {
            let spent = self.solver.shared.counters.det_time - det_start;
            self.solver.shared.counters.det_time_core_guided += spent;
        }

        match state {
            SolveState::Sat => {
                self.bound_by_last_solution()?;
                if core_guided && !self.deplete()? && !self.is_optimal() {
                    self.exhausted = true;
                }
                if !core_guided && !self.solver.shared.config.opt_boundupper.value && !self.is_optimal() {
                    return Ok(Some(Report::Unknown));
                }
            }

            SolveState::Inconsistent => {
                let core = self.solver.last_core()?.clone();
                self.process_core(&core)?;
            }

            SolveState::Unsat => {
                let Some(upper) = self.upper.clone() else {
                    return Ok(Some(Report::Infeasible));
                };
                self.lower = upper;
                self.dispatch_bounds();
            }

            SolveState::Timeout => return Ok(Some(Report::Timeout)),

            SolveState::Inprocessed => {}
        }

        match self.is_optimal() {
            true => Ok(Some(Report::Optimal)),
            false => Ok(None),
        }
    }

    /// Optimizes until the optimum is found, or until the first solution if `optimize` is false.
    pub fn run_full(&mut self, optimize: bool) -> Result<Report, ErrorKind> {
        loop {
            if let Some(report) = self.run_once()? {
                return Ok(report);
            }
            if !optimize && self.best.is_some() {
                return Ok(Report::Unknown);
            }
        }
    }

    /// Reduces a core to a cardinality constraint over literals of the objective, and reformulates as configured.
    fn process_core(&mut self, core: &ConstrSimple) -> Result<(), ErrorKind> {
        let mut degree = core.rhs.clone();
        let mut terms: Vec<(BigInt, Lit)> = Vec::default();
        for term in &core.terms {
            if !term.c.is_positive() {
                continue;
            }
            match self.costs.contains_key(&term.l) {
                true => terms.push((term.c.clone(), term.l)),
                // Weakened, as the literal has no cost.
                false => degree -= &term.c,
            }
        }
        terms.sort_by(|a, b| b.0.cmp(&a.0));

        let mut count = 0;
        let mut sum = BigInt::zero();
        while sum < degree && count < terms.len() {
            sum += &terms[count].0;
            count += 1;
        }
        if count == 0 || sum < degree {
            log::warn!(target: targets::OPTIMIZATION, "Unusable core {core}");
            self.exhausted = true;
            return Ok(());
        }

        let core = Core {
            lits: terms.into_iter().map(|(_, l)| l).collect(),
            degree: count,
        };
        log::debug!(target: targets::OPTIMIZATION, "Core of {} literals with degree {}", core.lits.len(), core.degree);

        match self.solver.shared.config.cg_reform.value {
            Reformulation::Always => self.reformulate(core, true),
            Reformulation::Depletion => {
                self.deferred.extend(core.lits.iter().copied());
                self.pending.push(core);
                Ok(())
            }
            Reformulation::Never => self.reformulate(core, false),
        }
    }

    /// Moves the least cost of the literals of `core` into the lower bound, with a lazy variable for the excess if `lazy`.
    fn reformulate(&mut self, core: Core, lazy: bool) -> Result<(), ErrorKind> {
        let Some(m) = core.lits.iter().filter_map(|l| self.costs.get(l)).min().cloned() else {
            return Ok(());
        };

        for l in &core.lits {
            if let Some(cost) = self.costs.get_mut(l) {
                *cost -= &m;
                if cost.is_zero() {
                    self.costs.remove(l);
                }
            }
        }

        for l in &core.lits {
            if let Some(key) = self.lazy_of.get(&var(*l)).copied() {
                if *l > 0 {
                    self.extend_lazy_var(key)?;
                }
            }
        }

        if lazy && core.degree < core.lits.len() {
            let y = self.solver.new_var();
            let mut lazy_var = LazyVar::new(core.lits.clone(), core.degree, m.clone(), y);
            Self::define(&mut self.solver, &mut lazy_var)?;
            *self.costs.entry(y).or_default() += &m;
            let key = self.lazy_vars.insert(lazy_var);
            self.lazy_of.insert(y, key);
            log::debug!(target: targets::OPTIMIZATION, "Lazy variable {y} with cost {m}");
        }

        let lower = &self.lower + m * BigInt::from(core.degree);
        self.raise_lower_bound(lower)
    }

    /// Introduces the next counting variable of a lazy variable, if any remain.
    fn extend_lazy_var(&mut self, key: DefaultKey) -> Result<(), ErrorKind> {
        let Some(lazy_var) = self.lazy_vars.get_mut(key) else {
            return Ok(());
        };
        if lazy_var.is_complete() {
            return Ok(());
        }
        let previous = lazy_var.last();
        let next = self.solver.new_var();
        lazy_var.grow(next);
        Self::define(&mut self.solver, lazy_var)?;

        *self.costs.entry(next).or_default() += &lazy_var.cost;
        self.lazy_of.remove(&previous);
        self.lazy_of.insert(next, key);
        log::trace!(target: targets::OPTIMIZATION, "Lazy variable extended by {next}");
        Ok(())
    }

    /// Adds the current definitions of a lazy variable, replacing any previous definitions.
    fn define(solver: &mut GenericSolver<R>, lazy_var: &mut LazyVar) -> Result<(), ErrorKind> {
        let (at_least, _) = solver.add_simple(&lazy_var.at_least(), Origin::CoreGuided)?;
        let (at_most, _) = solver.add_simple(&lazy_var.at_most(), Origin::CoreGuided)?;
        if let Some(order) = lazy_var.order() {
            solver.add_simple(&order, Origin::CoreGuided)?;
        }
        if let Some((old_least, old_most)) = lazy_var.definitions.replace((at_least, at_most)) {
            remove_if_present(solver, old_least)?;
            remove_if_present(solver, old_most)?;
        }
        Ok(())
    }
}
