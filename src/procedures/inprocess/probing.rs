/*!
Failed literal probing.

Each polarity of a variable is decided at level one and propagated:
- If either polarity leads to a conflict, the other polarity is implied.
- A literal implied by both polarities is implied.
- If `l` is implied by `v` and `-l` by `-v`, then `v` and `l` are equal, and the pair of clauses stating as much is learned.

The literals implied by each polarity are kept, for use in [at-most-one detection](super::amo).

Candidates are the unassigned variables of greatest activity, with at most `1000 * inp_basetime` probed in a round.
*/

use std::collections::HashSet;

use crate::{
    misc::log::targets,
    procedures::{analysis::DET_PER_RESOLUTION, learn::LearnOk},
    solver::GenericSolver,
    structures::{
        literal::{var, Lit, Var},
        origin::Origin,
        simple::ConstrSimple,
    },
};

/// Candidates probed in a round, scaled by `inp_basetime`.
const PROBING_BASE: f64 = 1000.0;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Probes the most active unassigned variables.
    pub fn probe(&mut self) {
        let limit = (PROBING_BASE * self.shared.config.inp_basetime.value).max(1.0) as usize;
        let mut candidates: Vec<Var> = (1..=self.max_var).filter(|v| self.trail.is_unknown(*v)).collect();
        candidates.sort_by(|a, b| self.heap.activity(*b).total_cmp(&self.heap.activity(*a)));
        candidates.truncate(limit);

        let (units_before, equalities_before) = (self.shared.counters.probing_units, self.shared.counters.equalities);
        for v in candidates {
            if self.unsat_id.is_some() {
                return;
            }
            if !self.trail.is_unknown(v) {
                continue;
            }

            let Some(positive) = self.probe_literal(v) else {
                if !self.learn_probed_unit(-v) {
                    return;
                }
                continue;
            };
            let Some(negative) = self.probe_literal(-v) else {
                if !self.learn_probed_unit(v) {
                    return;
                }
                continue;
            };

            for &l in positive.intersection(&negative) {
                if self.trail.is_unknown(l) && !self.learn_probed_unit(l) {
                    return;
                }
            }
            for &l in &positive {
                if var(l) != v && negative.contains(&-l) && self.trail.is_unknown(l) {
                    self.shared.counters.equalities += 1;
                    for clause in [[-v, l], [v, -l]] {
                        let ce = self.ce_from_simple(&ConstrSimple::clause(&clause));
                        if !self.learn_at_root(ce, Origin::Equality) {
                            return;
                        }
                    }
                }
            }

            self.implications.insert(v, positive);
            self.implications.insert(-v, negative);
        }
        log::debug!(
            target: targets::INPROCESSING,
            "Probing found {} units and {} equalities",
            self.shared.counters.probing_units - units_before,
            self.shared.counters.equalities - equalities_before
        );
    }

    /// The literals implied by `l` at level one, or none if `l` leads to a conflict.
    fn probe_literal(&mut self, l: Lit) -> Option<HashSet<Lit>> {
        self.decide(l);
        let conflict = self.propagate();
        self.shared.counters.det_time += DET_PER_RESOLUTION;
        let implied = self.trail.top_level_assignments()[1..].iter().copied().collect();
        self.backjump(0);
        match conflict {
            Some(_) => None,
            None => Some(implied),
        }
    }

    fn learn_probed_unit(&mut self, l: Lit) -> bool {
        log::trace!(target: targets::INPROCESSING, "Probing unit {l}");
        self.shared.counters.probing_units += 1;
        let ce = self.unit_ce(l);
        match self.learn_constraint(ce, Origin::Probing) {
            LearnOk::Contradiction => false,
            _ => self.propagate_once(),
        }
    }
}
