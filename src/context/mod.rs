/*!
The shared context of a solve, and the state of a solver.

A [SharedContext] is owned once per solving session and borrowed by every other component.
It holds:
- The [configuration](crate::config::Config) of the solve.
- [Counters] of things which happen during a solve.
- [Pools](crate::ce::pool::CePools) of reusable constraint expressions.
- An optional [dispatcher](crate::dispatch) observing every constraint creation, derivation, and deletion.
- A monotone source of constraint identifiers.
- A stop flag, which may be raised from outside the solve loop.

# Example
```rust
# use otter_pb::config::Config;
# use otter_pb::context::SharedContext;
let mut shared = SharedContext::from_config(Config::default());
let first = shared.fresh_id();
let second = shared.fresh_id();
assert!(first < second);

let stop = shared.stop_handle();
stop.set(true);
assert!(shared.stop_requested());
```
*/

pub mod callbacks;
mod counters;
pub use counters::Counters;

use std::{cell::Cell, rc::Rc, time::Instant};

use crate::{
    ce::{pool::CePools, proof::ProofBuffer},
    config::Config,
    dispatch::{Dispatch, Dispatcher},
    structures::simple::ConstrSimple,
};

/// Identifiers of constraints, for proof bookkeeping and external reference.
pub type ID = u64;

/// The state of a solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// The solver allows for configuration.
    Configuration,

    /// The solver has received input.
    Input,

    /// The consistency of the formula is unknown.
    Solving,

    /// A solution has been found.
    Satisfiable,

    /// The formula is consistent, though not with the assumptions made.
    Inconsistent,

    /// The formula is known to be unsatisfiable.
    Unsatisfiable,

    /// A solve was interrupted, and the solver may not be used further.
    Interrupted,
}

impl ContextState {
    fn rank(&self) -> u8 {
        match self {
            Self::Configuration => 0,
            Self::Input => 1,
            _ => 2,
        }
    }

    /// Whether the state is later in the life of a solver than `limit`.
    pub fn is_beyond(&self, limit: ContextState) -> bool {
        self.rank() > limit.rank()
    }
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Solving => write!(f, "Solving"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Inconsistent => write!(f, "Inconsistent"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Configuration, statistics, pools, and observers shared by the components of a solve.
pub struct SharedContext {
    pub config: Config,

    pub counters: Counters,

    pub pools: CePools,

    dispatcher: Option<Rc<Dispatcher>>,

    last_id: ID,

    stop: Rc<Cell<bool>>,

    started: Instant,
}

impl SharedContext {
    pub fn from_config(config: Config) -> Self {
        SharedContext {
            config,
            counters: Counters::default(),
            pools: CePools::default(),
            dispatcher: None,
            last_id: 0,
            stop: Rc::new(Cell::new(false)),
            started: Instant::now(),
        }
    }

    /// A fresh identifier, strictly greater than any previous identifier.
    pub fn fresh_id(&mut self) -> ID {
        self.last_id += 1;
        self.last_id
    }

    /// The most recent identifier issued.
    pub fn last_id(&self) -> ID {
        self.last_id
    }

    /// Sets the dispatcher, after which derivations are recorded in proof buffers.
    pub fn set_dispatcher(&mut self, dispatcher: Rc<Dispatcher>) {
        self.dispatcher = Some(dispatcher);
        self.pools.set_logging(true);
    }

    pub fn is_logging(&self) -> bool {
        self.dispatcher.is_some()
    }

    pub fn dispatch(&self, dispatch: Dispatch) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher(&dispatch)
        }
    }

    /// Notes a constraint from outside, returning its identifier.
    pub fn log_input(&mut self, constraint: impl FnOnce() -> ConstrSimple) -> ID {
        let id = self.fresh_id();
        if self.is_logging() {
            self.dispatch(Dispatch::Input {
                id,
                constraint: constraint(),
            });
        }
        id
    }

    /// Notes a constraint derived by the steps of `proof`, returning its identifier.
    pub fn log_derived(&mut self, proof: &ProofBuffer, constraint: impl FnOnce() -> ConstrSimple) -> ID {
        let id = self.fresh_id();
        if self.is_logging() {
            self.dispatch(Dispatch::Derived {
                id,
                derivation: proof.to_string(),
                constraint: constraint(),
            });
        }
        id
    }

    /// Notes the deletion of the constraint with identifier `id`.
    pub fn log_deleted(&self, id: ID) {
        if self.is_logging() {
            self.dispatch(Dispatch::Deleted { id });
        }
    }

    /// Raises the stop flag, so the next loop boundary of a solve unwinds.
    pub fn request_stop(&self) {
        self.stop.set(true);
    }

    /// A handle to the stop flag, which may be held outside the solver.
    pub fn stop_handle(&self) -> Rc<Cell<bool>> {
        self.stop.clone()
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.get()
    }

    /// Seconds since the context was created.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Whether a wall-clock or deterministic time limit has been reached.
    pub fn timed_out(&self) -> bool {
        let timeout = self.config.timeout.value;
        let timeout_det = self.config.timeout_det.value;
        (timeout > 0.0 && self.elapsed() >= timeout)
            || (timeout_det > 0.0 && self.counters.det_time >= timeout_det)
    }
}
