/*!
Schedulers for restarts, reductions of the constraint database, and inprocessing.

Each scheduler is consulted at a fixpoint of propagation:
- A restart is due once the conflicts since the last restart reach the current element of a [luby sequence](crate::generic::luby), scaled by `luby_mult`.
- A reduction is due once the total count of conflicts reaches a limit which grows after each reduction, with the growth shaped by `db_scale`, `db_exp`, and `db_decay`.
- Inprocessing is due at level zero, once the total count of conflicts reaches a limit which grows linearly with each round, scaled by `inp_basetime` (with zero disabling inprocessing).
*/

use crate::{misc::log::targets, solver::GenericSolver};

/// Conflicts before the first reduction, scaled by `db_scale`.
const REDUCTION_BASE: f64 = 2000.0;

/// Conflicts between rounds of inprocessing, scaled by `inp_basetime` and `db_scale`.
const INPROCESSING_BASE: f64 = 10000.0;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// The total count of conflicts at which the next reduction is due.
    pub(crate) fn reduction_interval(&self) -> usize {
        let config = &self.shared.config;
        let reductions = self.shared.counters.reductions as f64;
        let interval = REDUCTION_BASE
            * config.db_scale.value
            * (reductions + 1.0).powf(1.0 / config.db_exp.value)
            * config.db_decay.value.powf(reductions);
        interval.max(1.0) as usize + self.shared.counters.conflicts
    }

    /// The total count of conflicts at which the next round of inprocessing is due.
    pub(crate) fn inprocessing_interval(&self) -> usize {
        let config = &self.shared.config;
        let rounds = self.shared.counters.inprocessings as f64 + 1.0;
        let interval = INPROCESSING_BASE * config.inp_basetime.value * config.db_scale.value * rounds;
        interval.max(1.0) as usize + self.shared.counters.conflicts
    }

    pub(crate) fn restart_due(&self) -> bool {
        self.shared.counters.fresh_conflicts as f64 >= self.restart_limit
    }

    pub(crate) fn reduction_due(&self) -> bool {
        self.shared.counters.conflicts >= self.next_reduction
    }

    pub(crate) fn inprocessing_due(&self) -> bool {
        self.shared.config.inp_basetime.value > 0.0
            && self.trail.decision_level() == 0
            && self.shared.counters.conflicts >= self.next_inprocessing
    }

    /// Clears every decision, and moves to the next element of the luby sequence.
    pub fn restart(&mut self) {
        self.backjump(0);
        self.shared.counters.restarts += 1;
        self.shared.counters.fresh_conflicts = 0;
        let unit = self.luby.next().unwrap_or(1.0);
        self.restart_limit = unit * self.shared.config.luby_mult.value;
        log::debug!(target: targets::BACKJUMP, "Restart {}, next after {} conflicts", self.shared.counters.restarts, self.restart_limit);
    }
}
