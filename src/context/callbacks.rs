/*!
General callbacks associated with a solver.

For observing constraints as they are added, derived, and removed see [dispatch](crate::dispatch).

# Callback types

Callbacks may be mutable functions.
Still, information passed from the solver is non-mutable.
*/

use crate::solver::GenericSolver;

/// Called at each loop boundary of a solve, with the solve interrupted if true is returned.
pub type CallbackTerminate = dyn FnMut() -> bool;

impl<R: rand::Rng + std::default::Default> GenericSolver<R> {
    pub fn set_callback_terminate(&mut self, callback: Box<CallbackTerminate>) {
        self.callback_terminate = Some(callback);
    }

    pub fn check_callback_terminate(&mut self) -> bool {
        if let Some(callback) = &mut self.callback_terminate {
            callback()
        } else {
            false
        }
    }
}
