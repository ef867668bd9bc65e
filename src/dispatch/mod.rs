/*!
Dispatches for external observers.

Dispatches are small messages sent from a solve to an optional observer, the dispatcher.
Each constraint created, derived, or removed is dispatched with the identifier issued to it, and identifiers increase monotonically.

The dispatcher is optional and correctness of a solve never depends on it.
Though, failing to observe every dispatch will leave a transcribed proof incomplete.

- [Input](Dispatch::Input) constraints are those given to the solver, including bounds from the optimization driver.
- [Derived](Dispatch::Derived) constraints carry a derivation in reverse polish notation over earlier identifiers, of the kind written by [ProofBuffer](crate::ce::proof::ProofBuffer).
- [Deleted](Dispatch::Deleted) notes a constraint is no longer used.

A [ProofTranscriber] writes dispatches as lines of a VeriPB-style proof.

```rust
# use std::{cell::RefCell, rc::Rc};
# use otter_pb::config::Config;
# use otter_pb::dispatch::{Dispatch, ProofTranscriber};
# use otter_pb::solver::Solver;
# use otter_pb::structures::origin::Origin;
let lines = Rc::new(RefCell::new(Vec::new()));
let mut solver = Solver::from_config(Config::default());
let lines_clone = lines.clone();
solver.set_dispatcher(Rc::new(move |d: &Dispatch| lines_clone.borrow_mut().push(d.clone())));

let x = solver.new_var();
assert!(solver.add_clause(&[x]).is_ok());

let mut transcriber = ProofTranscriber::new(Vec::new());
for dispatch in lines.borrow().iter() {
    assert!(transcriber.transcribe(dispatch).is_ok());
}
let proof = String::from_utf8(transcriber.into_inner()).unwrap();
assert!(proof.starts_with("f 1 : +1 x1 >= 1"));
```
*/

mod transcriber;
pub use transcriber::ProofTranscriber;

use num_bigint::BigInt;

use crate::{context::ID, structures::literal::Lit, structures::simple::ConstrSimple};

/// A dispatcher, called with each dispatch.
pub type Dispatcher = dyn Fn(&Dispatch);

/// A dispatch from a solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A constraint given to the solver.
    Input { id: ID, constraint: ConstrSimple },

    /// A constraint derived from earlier constraints.
    Derived {
        id: ID,
        derivation: String,
        constraint: ConstrSimple,
    },

    /// A constraint no longer in use.
    Deleted { id: ID },

    /// A solution, as the literals true under the solution.
    Solution { literals: Vec<Lit> },

    /// Bounds on the objective value.
    ObjectiveBound { lower: BigInt, upper: Option<BigInt> },

    /// The formula was found unsatisfiable, with the constraint of the given identifier falsified at level zero.
    Contradiction { id: ID },
}
