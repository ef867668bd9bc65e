/*!
Propagation of assignments on the trail.

# Overview

For each literal `p` on the trail past the queue head, the watches of `-p` are checked.
Each watch is of some stored constraint, and checking a watch may:
- Drop the watch, as the constraint has found another literal to watch.
- Keep the watch, possibly after assigning literals with the constraint as their reason.
- Find the constraint is falsified, in which case propagation stops with the constraint as a conflict.

Watches of constraints marked for deletion are dropped as they are found.

The watch list of `-p` is taken from the watch database while processing, so the constraint of a watch may add watches to other lists.
Any watches added to the list of `-p` while it was taken are kept when the list is restored.

# Conflicts

When a conflict is found the remaining watches of `-p` are left unchecked.
So that the counts of constraints tracking a slack agree with the processed literals, the adjustment made by each checked watch of `-p` is undone and the queue head is moved back to `p`.

Each check of a watch advances deterministic time.
*/

use crate::{
    db::{constr::WatchStatus, CRef},
    misc::log::targets,
    solver::GenericSolver,
};

/// Deterministic time taken by a check for propagation.
pub const DET_PER_WATCH: f64 = 1e-6;

/// Deterministic time taken to process a literal.
pub const DET_PER_LITERAL: f64 = 1e-6;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    /// Propagates every unprocessed literal on the trail, returning a falsified constraint if found.
    pub fn propagate(&mut self) -> Option<CRef> {
        while self.trail.q_head < self.trail.len() {
            let p = self.trail.literals[self.trail.q_head];
            self.trail.q_head += 1;
            self.shared.counters.propagations += 1;
            self.shared.counters.det_time += DET_PER_LITERAL;

            let falsified = -p;
            let list = self.watches.take(falsified);
            let mut kept = Vec::with_capacity(list.len());
            let mut index = 0;
            let mut conflict = None;

            while index < list.len() {
                let watch = list[index];
                index += 1;
                if self.db.is_deleted(watch.cref) {
                    continue;
                }
                self.shared.counters.det_time += DET_PER_WATCH;

                let status = self.db.get_mut(watch.cref).constr.check_for_propagation(
                    &watch,
                    falsified,
                    &mut self.trail,
                    &mut self.watches,
                );
                match status {
                    WatchStatus::DropWatch => {}
                    WatchStatus::KeepWatch => kept.push(watch),
                    WatchStatus::Conflicting => {
                        kept.push(watch);
                        conflict = Some(watch.cref);
                        break;
                    }
                }
            }

            if let Some(cref) = conflict {
                for watch in kept.iter().filter(|w| w.undo) {
                    self.db.get_mut(watch.cref).constr.undo_falsified(watch.idx);
                }
                kept.extend_from_slice(&list[index..]);
                self.watches.restore(falsified, kept);
                self.trail.q_head -= 1;
                log::trace!(target: targets::PROPAGATION, "Conflict on {p} with {cref}");
                return Some(cref);
            }

            self.watches.restore(falsified, kept);
        }
        None
    }

    /// Propagates every unprocessed literal on the trail, returning false if a conflict was found.
    ///
    /// A conflict at level zero notes the solver is unsatisfiable.
    pub fn propagate_once(&mut self) -> bool {
        match self.propagate() {
            None => true,
            Some(cref) => {
                if self.trail.decision_level() == 0 {
                    let id = self.db.get(cref).header.id;
                    self.note_contradiction(id);
                }
                false
            }
        }
    }
}
