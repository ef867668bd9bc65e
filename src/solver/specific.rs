use std::collections::HashMap;

use crate::{
    config::Config,
    context::{ContextState, SharedContext},
    db::{trail::Trail, watches::Watches, ConstraintDB},
    generic::{activity_heap::ActivityHeap, luby::Luby, random::MinimalPCG32},
};

use super::GenericSolver;

/// A solver which uses [MinimalPCG32] as a source of randomness.
pub type Solver = GenericSolver<MinimalPCG32>;

impl<R: rand::Rng + std::default::Default + rand::SeedableRng> GenericSolver<R> {
    /// Creates a solver from some given configuration, seeding the source of randomness with the `seed` option.
    pub fn from_config(config: Config) -> Self {
        let rng = R::seed_from_u64(config.seed.value);
        let mut luby = Luby::with_base(config.luby_base.value);
        let restart_limit = luby.next().unwrap_or(1.0) * config.luby_mult.value;

        let mut solver = Self {
            trail: Trail::default(),
            watches: Watches::default(),
            db: ConstraintDB::default(),
            heap: ActivityHeap::default(),

            rng,
            state: ContextState::Configuration,

            phase: vec![0],
            max_var: 0,
            assumptions: Vec::default(),
            last_solution: None,
            last_core: None,
            unsat_id: None,

            var_bump: 1.0,
            constr_bump: 1.0,
            luby,
            restart_limit,
            next_reduction: 0,
            next_inprocessing: 0,

            implications: HashMap::default(),
            objective: None,
            lp: None,

            callback_terminate: None,

            shared: SharedContext::from_config(config),
        };
        solver.next_reduction = solver.reduction_interval();
        solver.next_inprocessing = solver.inprocessing_interval();
        solver.trail.grow(0);
        solver.watches.grow(0);
        solver.heap.grow(0);
        solver
    }
}
