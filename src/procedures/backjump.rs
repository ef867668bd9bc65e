/*!
Undoing assignments on the trail.

A backjump to level `l` removes every assignment made at a level greater than `l`, one assignment at a time, from the most recent.

For each removed assignment:
- If the literal was processed during [propagation](crate::procedures::propagate), the adjustments made to the slack of constraints watching its negation are undone, and the queue head moves back.
- The variable returns to the activity heap.
- The value of the variable is saved as its phase, for use when the variable is next decided.

As only a processed literal has adjusted slacks, and processing is in trail order, the queue head is at most one past the literal being removed whenever its adjustments are undone.
*/

use crate::{
    misc::log::targets,
    solver::GenericSolver,
    structures::literal::{var, Lit},
};

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Removes the most recent assignment.
    pub(crate) fn undo_one(&mut self) -> Option<Lit> {
        let l = *self.trail.literals.last()?;
        if self.trail.q_head == self.trail.len() {
            for watch in self.watches.list(-l).iter().filter(|w| w.undo) {
                self.db.get_mut(watch.cref).constr.undo_falsified(watch.idx);
            }
            self.trail.q_head -= 1;
        }
        self.trail.pop();

        let v = var(l);
        self.heap.insert(v);
        self.phase[v as usize] = l;
        Some(l)
    }

    /// Removes every assignment made at a level greater than `level`.
    pub fn backjump(&mut self, level: i32) {
        if self.trail.decision_level() <= level {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {level}", self.trail.decision_level());
        while self.trail.decision_level() > level {
            self.undo_one();
        }
    }

    /// Removes every decision, and any assignment which follows from a decision.
    pub fn clear_decisions(&mut self) {
        self.backjump(0);
    }
}
