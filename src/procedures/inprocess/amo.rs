//! At-most-one detection.
//!
//! Two literals conflict if probing found either implies the negation of the other.
//! A clique of pairwise conflicting literals `K` gives the cardinality constraint Σ ¬k ≥ |K| - 1, that is, at most one literal of `K` is true.
//!
//! Cliques are grown greedily from seeds, taken in decreasing order of their count of conflicts, with `1000 * inp_atmostone` seeds tried in a round.
//! Only cliques of at least three literals are learned, as a pair is already a binary clause.

use std::collections::{HashMap, HashSet};

use crate::{
    misc::log::targets,
    solver::GenericSolver,
    structures::{
        literal::{var, Lit},
        origin::Origin,
        simple::ConstrSimple,
    },
};

/// Seeds tried in a round, scaled by `inp_atmostone`.
const SEED_BASE: f64 = 1000.0;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// The literals in conflict with each literal, from the implications of probing.
    fn conflict_graph(&self) -> HashMap<Lit, HashSet<Lit>> {
        let mut graph: HashMap<Lit, HashSet<Lit>> = HashMap::default();
        for (&a, implied) in &self.implications {
            if !self.trail.is_unknown(a) {
                continue;
            }
            for &l in implied {
                let b = -l;
                if var(b) != var(a) && self.trail.is_unknown(b) {
                    graph.entry(a).or_default().insert(b);
                    graph.entry(b).or_default().insert(a);
                }
            }
        }
        graph
    }

    /// Learns at-most-one constraints over cliques of conflicting literals.
    pub fn detect_at_most_ones(&mut self) {
        let graph = self.conflict_graph();
        let degree = |l: &Lit| graph.get(l).map_or(0, |n| n.len());

        let mut seeds: Vec<Lit> = graph.keys().copied().collect();
        seeds.sort_by(|a, b| degree(b).cmp(&degree(a)).then(a.cmp(b)));
        seeds.truncate((SEED_BASE * self.shared.config.inp_atmostone.value).max(1.0) as usize);

        let mut found: HashSet<Vec<Lit>> = HashSet::default();
        for seed in seeds {
            let Some(neighbours) = graph.get(&seed) else {
                continue;
            };
            let mut candidates: Vec<Lit> = neighbours.iter().copied().collect();
            candidates.sort_by(|a, b| degree(b).cmp(&degree(a)).then(a.cmp(b)));

            let mut clique = vec![seed];
            for c in candidates {
                let conflicts = &graph[&c];
                if clique.iter().all(|k| var(*k) != var(c) && conflicts.contains(k)) {
                    clique.push(c);
                }
            }
            if clique.len() < 3 {
                continue;
            }
            clique.sort();
            if !found.insert(clique.clone()) {
                continue;
            }

            log::trace!(target: targets::INPROCESSING, "At most one of {clique:?}");
            let amo = ConstrSimple::new(clique.iter().map(|k| (1, -k)), clique.len() as i64 - 1);
            let ce = self.ce_from_simple(&amo);
            self.shared.counters.amo_found += 1;
            if !self.learn_at_root(ce, Origin::DetectedAmo) {
                return;
            }
        }
        log::debug!(target: targets::INPROCESSING, "Found {} at-most-one constraints", found.len());
    }
}
