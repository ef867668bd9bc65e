//! Pure literals.
//!
//! A literal is pure if its negation occurs in no constraint of the formula and the objective (if any) does not prefer its negation.
//! Learned constraints are ignored, as any assignment satisfying the formula satisfies them too.
//!
//! Fixing a pure literal true can only raise the left hand side of each constraint, and so never loses a solution, nor an optimal solution.
//! Variables of assumptions are never fixed.

use std::collections::HashSet;

use num_traits::Signed;

use crate::{
    misc::log::targets,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit},
        origin::Origin,
        simple::ConstrSimple,
    },
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Literals occurring in some constraint of the formula, or preferred by the objective.
    pub(crate) fn formula_occurrences(&self) -> HashSet<Lit> {
        let mut occurring = HashSet::new();
        for cref in self.db.live_refs() {
            let stored = self.db.get(cref);
            if stored.header.origin.is_learned() {
                continue;
            }
            occurring.extend(stored.constr.lits());
        }
        if let Some(objective) = &self.objective {
            for term in &objective.terms {
                // A positive cost on l is a preference for -l.
                match term.c.is_positive() {
                    true => occurring.insert(-term.l),
                    false => occurring.insert(term.l),
                };
            }
        }
        occurring
    }

    /// Fixes each pure literal at level zero.
    pub fn fix_pure_literals(&mut self) {
        let occurring = self.formula_occurrences();
        let assumed: HashSet<_> = self.assumptions.iter().map(|a| var(*a)).collect();

        let mut pure = Vec::default();
        for v in 1..=self.max_var {
            if assumed.contains(&v) || !self.trail.is_unknown(v) {
                continue;
            }
            match (occurring.contains(&v), occurring.contains(&-v)) {
                (true, false) => pure.push(v),
                (false, true) => pure.push(-v),
                _ => {}
            }
        }

        let mut fixed = 0;
        for l in pure {
            if !self.trail.is_unknown(l) {
                continue;
            }
            if !self.add_at_root(&ConstrSimple::new([(1, l)], 1), Origin::Pure) {
                return;
            }
            fixed += 1;
        }
        self.shared.counters.pure_literals += fixed;
        log::debug!(target: targets::INPROCESSING, "Fixed {fixed} pure literals");
    }
}
