/*!
Methods for adding variables and constraints to a solver.

# Overview

Constraints are added at level zero, and each addition first [backjumps](crate::procedures::backjump) to level zero.

An added constraint is noted with the dispatcher as input, and is then simplified:
- Literals fixed at level zero are removed, by weakening true literals and adding the unit facts of false literals.
- The constraint is saturated, and divided by the greatest common divisor of its coefficients.

If simplification changed the constraint the result is noted as derived from the input, and so an addition returns a pair of identifiers: the identifier of the input and the identifier of the stored constraint (which are equal if nothing changed).

A tautology is not stored.
If the constraint is inconsistent, or is falsified at level zero, the solver is unsatisfiable and the next [solve](crate::procedures::solve) returns as much.
Otherwise the constraint is stored and propagated at level zero.

```rust
# use otter_pb::config::Config;
# use otter_pb::solver::Solver;
# use otter_pb::structures::{origin::Origin, simple::ConstrSimple};
let mut solver = Solver::from_config(Config::default());
let x = solver.new_vars(2);

// 4 x1 + 2 x2 >= 2 saturates to 2 x1 + 2 x2 >= 2, and division gives x1 + x2 >= 1
let (input, stored) = solver.add_simple(&ConstrSimple::new([(4, x[0]), (2, x[1])], 2), Origin::Formula).unwrap();
assert!(input < stored);

// x1 + x2 >= 1 is stored as it is
let (input, stored) = solver.add_clause(&[x[0], x[1]]).unwrap();
assert_eq!(input, stored);
```
*/

use crate::{
    ce::super_ce::CeSuper,
    context::{ContextState, ID},
    db::{
        constr::{AttachStatus, Constr},
        CRef, Header,
    },
    dispatch::Dispatch,
    misc::log::targets,
    numeric::Tier,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
    },
    types::err::{self, ErrorKind},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// A fresh variable.
    pub fn new_var(&mut self) -> Var {
        self.max_var += 1;
        let v = self.max_var;
        self.trail.grow(v);
        self.watches.grow(v);
        self.heap.grow(v);
        self.phase.push(-v);

        // A small perturbation, so ties in activity are broken by the seed.
        let jitter = self.rng.gen_range(0.0..1e-6);
        self.heap.revalue(v, jitter);
        self.heap.insert(v);

        if self.state == ContextState::Configuration {
            self.state = ContextState::Input;
        }
        v
    }

    /// `count` fresh variables.
    pub fn new_vars(&mut self, count: usize) -> Vec<Var> {
        (0..count).map(|_| self.new_var()).collect()
    }

    fn check_usable(&self) -> Result<(), ErrorKind> {
        match self.state {
            ContextState::Interrupted => Err(ErrorKind::InvalidState),
            _ => Ok(()),
        }
    }

    /// Adds a constraint expression with the given origin, returning the identifier of the input and of the stored constraint.
    pub fn add_constraint(&mut self, mut ce: CeSuper, origin: Origin) -> Result<(ID, ID), ErrorKind> {
        self.check_usable()?;
        for v in ce.vars() {
            if v > self.max_var {
                return Err(err::UsageError::UnknownVariable(v).into());
            }
        }

        self.backjump(0);
        ce.set_origin(origin);

        let input = ce.to_simple();
        let input_id = self.shared.log_input(|| input.clone());
        if self.unsat_id.is_some() {
            return Ok((input_id, input_id));
        }

        ce.proof_mut().reset(input_id);
        ce.remove_units_and_zeroes(&self.trail);
        ce.saturate();
        ce.divide_by_gcd();

        if ce.is_tautology() {
            log::trace!(target: targets::CONSTRAINT_DB, "Tautology {input_id} not stored");
            return Ok((input_id, input_id));
        }

        let simplified = ce.to_simple();
        let id = match simplified == input {
            true => input_id,
            false => self.shared.log_derived(ce.proof(), || simplified.clone()),
        };

        if ce.is_inconsistency() || ce.assertion_status(&self.trail).0 < 0 {
            log::info!(target: targets::CONSTRAINT_DB, "Constraint {id} is falsified at level zero");
            self.note_contradiction(id);
            return Ok((input_id, id));
        }

        let (cref, status) = self.store(&ce, id, origin, 0);
        self.db.note_removable(id, cref);
        if input_id != id {
            self.db.note_removable(input_id, cref);
        }

        if status == AttachStatus::Conflicting || self.propagate().is_some() {
            self.note_contradiction(id);
        }
        Ok((input_id, id))
    }

    /// Adds a simple constraint, see [add_constraint](GenericSolver::add_constraint).
    pub fn add_simple(&mut self, simple: &ConstrSimple, origin: Origin) -> Result<(ID, ID), ErrorKind> {
        self.check_usable()?;
        for term in &simple.terms {
            if term.l == 0 {
                return Err(err::UsageError::ZeroLiteral.into());
            }
            if var(term.l) > self.max_var {
                return Err(err::UsageError::UnknownVariable(var(term.l)).into());
            }
        }
        let ce = self.ce_from_simple(simple);
        self.add_constraint(ce, origin)
    }

    /// A simple constraint as an expression, in the narrowest tier in which it fits.
    pub(crate) fn ce_from_simple(&self, simple: &ConstrSimple) -> CeSuper {
        let mut ce = self.shared.pools.take(Tier::Arb);
        ce.extend_from_simple(simple);
        ce.convert_at_least(Tier::T32, &self.shared.pools)
    }

    /// Adds a clause over `lits` as part of the formula.
    pub fn add_clause(&mut self, lits: &[Lit]) -> Result<(ID, ID), ErrorKind> {
        self.add_simple(&ConstrSimple::clause(lits), Origin::Formula)
    }

    /// Removes the constraint added with identifier `id`.
    ///
    /// Assignments made at level zero by the constraint are kept, and so removal is only sound if the remaining constraints imply those assignments.
    pub fn remove_constraint(&mut self, id: ID) -> Result<(), ErrorKind> {
        self.check_usable()?;
        let Some(cref) = self.db.take_removable(id) else {
            return Err(err::ConstraintDBError::UnknownId.into());
        };
        let stored_id = self.db.get(cref).header.id;
        self.db.take_removable(stored_id);

        self.backjump(0);
        self.implications.clear();
        for l in self.trail.root_assignments().to_vec() {
            if self.trail.reason(var(l)) == Some(cref) {
                self.trail.set_reason(var(l), None);
            }
        }
        self.delete_constraint(cref);
        Ok(())
    }

    /// Stores a normalised expression and attaches the stored constraint at the current level.
    pub(crate) fn store(&mut self, ce: &CeSuper, id: ID, origin: Origin, lbd: u32) -> (CRef, AttachStatus) {
        let constr = Constr::from_ce(ce, &self.trail, self.shared.config.prop_counting.value);
        let mut header = Header::new(id, origin);
        header.lbd = lbd;
        let cref = self.db.insert(header, constr);
        let status = self
            .db
            .get_mut(cref)
            .constr
            .initialize_watches(cref, &mut self.trail, &mut self.watches);
        log::trace!(target: targets::CONSTRAINT_DB, "Attached {id} at {cref}: {status:?}");
        (cref, status)
    }

    /// Marks a constraint for deletion, and notes the deletion with the dispatcher.
    pub(crate) fn delete_constraint(&mut self, cref: CRef) {
        if !self.db.is_deleted(cref) {
            self.db.mark_for_deletion(cref);
            self.shared.log_deleted(self.db.get(cref).header.id);
        }
    }

    /// Notes the formula is unsatisfiable, due to the constraint with identifier `id`.
    pub(crate) fn note_contradiction(&mut self, id: ID) {
        if self.unsat_id.is_none() {
            self.unsat_id = Some(id);
            self.shared.dispatch(Dispatch::Contradiction { id });
        }
    }
}
