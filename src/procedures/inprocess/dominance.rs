/*!
Dominance breaking.

A literal `a` dominates a literal `b` if, from any assignment with `a` false and `b` true, making `a` true and `b` false gives an assignment which satisfies every constraint the first did, and which is no worse under the objective.
In terms of the coefficients of each constraint Σ c·l ≥ d of the formula, with `c(l)` zero if `l` does not occur:

```none
c(a) - c(-a) - c(b) + c(-b) >= 0
```

And in terms of the costs `w` of the objective:

```none
w(a) - w(-a) - w(b) + w(-b) <= 0
```

If `a` dominates `b` the clause `a ∨ ¬b` may be added, as some solution (or some optimal solution) satisfies it.
Within a round the variables of any two breakers are disjoint, so swaps made to satisfy one breaker do not falsify another.

Candidates for `a` are the literals sharing the shortest constraint in which `b` occurs, and each candidate pair queries the constraints of both.
A round ends once `inp_dombreaklim` constraints have been queried.
*/

use std::collections::{HashMap, HashSet};

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{
    misc::log::targets,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
    },
};

/// Occurrences of literals in the constraints of the formula, with costs from the objective.
struct Occurrences {
    /// For each literal, the coefficient of the literal in each constraint it occurs in, by index of constraint.
    coefs: HashMap<Lit, HashMap<usize, BigInt>>,

    /// The length of each constraint, by index.
    lengths: Vec<usize>,

    /// The literals of each constraint, by index.
    lits: Vec<Vec<Lit>>,

    costs: HashMap<Lit, BigInt>,
}

impl Occurrences {
    fn coef(&self, l: Lit, index: usize) -> BigInt {
        self.coefs
            .get(&l)
            .and_then(|c| c.get(&index))
            .cloned()
            .unwrap_or_default()
    }

    fn cost(&self, l: Lit) -> BigInt {
        self.costs.get(&l).cloned().unwrap_or_default()
    }

    fn indices(&self, l: Lit) -> impl Iterator<Item = usize> + '_ {
        self.coefs.get(&l).into_iter().flat_map(|c| c.keys().copied())
    }

    /// Whether `a` dominates `b`, with the count of constraints queried.
    fn dominates(&self, a: Lit, b: Lit) -> (bool, usize) {
        let objective_delta = self.cost(a) - self.cost(-a) - self.cost(b) + self.cost(-b);
        if objective_delta.is_positive() {
            return (false, 0);
        }

        let indices: HashSet<usize> = [a, -a, b, -b].into_iter().flat_map(|l| self.indices(l)).collect();
        for &index in &indices {
            let delta = self.coef(a, index) - self.coef(-a, index) - self.coef(b, index) + self.coef(-b, index);
            if delta.is_negative() {
                return (false, indices.len());
            }
        }
        (true, indices.len())
    }
}

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    fn occurrences(&self) -> Occurrences {
        let mut occurrences = Occurrences {
            coefs: HashMap::default(),
            lengths: Vec::default(),
            lits: Vec::default(),
            costs: HashMap::default(),
        };

        for cref in self.db.live_refs() {
            let stored = self.db.get(cref);
            if stored.header.origin.is_learned() {
                continue;
            }
            let index = occurrences.lengths.len();
            let terms = stored.constr.terms();
            occurrences.lengths.push(terms.len());
            occurrences.lits.push(terms.iter().map(|t| t.l).collect());
            for term in terms {
                let entry = occurrences.coefs.entry(term.l).or_default().entry(index).or_default();
                *entry += term.c;
            }
        }

        if let Some(objective) = &self.objective {
            for term in &objective.terms {
                if !term.c.is_zero() {
                    *occurrences.costs.entry(term.l).or_default() += &term.c;
                }
            }
        }
        occurrences
    }

    /// Adds clauses forbidding dominated assignments.
    pub fn break_dominance(&mut self) {
        let limit = self.shared.config.inp_dombreaklim.value as usize;
        let occurrences = self.occurrences();
        let mut excluded: HashSet<Var> = self.assumptions.iter().map(|a| var(*a)).collect();

        let mut breakers = Vec::default();
        let mut queried = 0;
        'search: for v in 1..=self.max_var {
            for b in [v, -v] {
                if queried >= limit {
                    break 'search;
                }
                if excluded.contains(&var(b)) || !self.trail.is_unknown(b) {
                    continue;
                }
                let Some(shortest) = occurrences.indices(b).min_by_key(|i| (occurrences.lengths[*i], *i)) else {
                    continue;
                };

                for &a in &occurrences.lits[shortest] {
                    if var(a) == var(b) || excluded.contains(&var(a)) || !self.trail.is_unknown(a) {
                        continue;
                    }
                    let (dominates, count) = occurrences.dominates(a, b);
                    queried += count;
                    if dominates {
                        log::trace!(target: targets::INPROCESSING, "{a} dominates {b}");
                        breakers.push(ConstrSimple::clause(&[a, -b]));
                        excluded.insert(var(a));
                        excluded.insert(var(b));
                        break;
                    }
                    if queried >= limit {
                        break 'search;
                    }
                }
            }
        }

        let mut added = 0;
        for breaker in &breakers {
            if !self.add_at_root(breaker, Origin::DomBreaker) {
                break;
            }
            added += 1;
        }
        self.shared.counters.dominance_breakers += added;
        log::debug!(target: targets::INPROCESSING, "Added {added} dominance breakers after {queried} queries");
    }
}
