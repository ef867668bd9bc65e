/*!
The solver, owning the databases of a solve.

A [GenericSolver] is parameterised to a source of randomness, and [Solver] fixes this source to [MinimalPCG32](crate::generic::random::MinimalPCG32).

The solver owns:
- A [shared context](crate::context::SharedContext), of configuration, counters, pools, and the dispatcher.
- The [trail](crate::db::trail) of assignments.
- The [constraint database](crate::db) and its [watches](crate::db::watches).
- A heap of variables by activity, and the saved phase of each variable.

Methods which mutate a solver are, for the most part, found in [procedures](crate::procedures).

# Life of a solver

```none
  Configuration ──> Input ──> Solving ──┬──> Satisfiable
                                        ├──> Inconsistent     (a core of the assumptions was found)
                                        ├──> Unsatisfiable    (final)
                                        └──> Interrupted      (final, any further call is an error)
```

A solver which is satisfiable or inconsistent may be given further constraints or assumptions and solved again.

# Example

```rust
# use otter_pb::config::Config;
# use otter_pb::reports::SolveState;
# use otter_pb::solver::Solver;
let mut solver = Solver::from_config(Config::default());
let p = solver.new_var();
let q = solver.new_var();
assert!(solver.add_clause(&[-p, q]).is_ok());
assert!(solver.add_clause(&[p, -q]).is_ok());

assert!(solver.set_assumptions(&[p]).is_ok());
assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
assert_eq!(solver.value_of(q), Some(true));

assert!(solver.add_clause(&[-q]).is_ok());
assert_eq!(solver.solve_full(), Ok(SolveState::Inconsistent));
assert!(solver.last_core().is_ok());
```
*/

mod generic;
pub use generic::GenericSolver;

mod specific;
pub use specific::Solver;
