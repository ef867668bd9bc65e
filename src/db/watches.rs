/*!
Watch lists, indexed by literal.

A watch on a literal is noted in the list of the literal and is checked when the literal becomes false.
So, when a literal `l` is assigned true the watches of `-l` are examined.

Counting constraints, and watched constraints, adjust their slack when a watched literal is processed.
The watches of these constraints are flagged with `undo`, and when the literal of such a watch is unassigned the adjustment is reversed.

```rust
# use otter_pb::db::{ConstraintDB, Header};
# use otter_pb::db::constr::{Constr, clause::Clause};
# use otter_pb::db::watches::{Watch, Watches};
# use otter_pb::structures::origin::Origin;
let mut db = ConstraintDB::default();
let cref = db.insert(Header::new(1, Origin::Formula), Constr::Clause(Clause::new(vec![1, 2])));

let mut watches = Watches::default();
watches.grow(2);
watches.watch(1, Watch { cref, idx: 0, undo: false });
watches.watch(2, Watch { cref, idx: 1, undo: false });
assert_eq!(watches.list(1).len(), 1);
assert!(watches.list(-1).is_empty());

db.mark_for_deletion(cref);
let remap = db.collect_garbage();
watches.remap(&remap);
assert!(watches.list(2).is_empty());
```
*/

use crate::{
    db::{CRef, Remap},
    structures::literal::{lit_index, lit_span, Lit, Var},
};

/// A watch of a stored constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watch {
    pub cref: CRef,

    /// The index of the watched term, for constraints which need it.
    pub idx: u32,

    /// Whether processing the watch adjusts a slack which must be restored when the literal is unassigned.
    pub undo: bool,
}

/// A list of watches for each literal.
#[derive(Default)]
pub struct Watches {
    lists: Vec<Vec<Watch>>,
}

impl Watches {
    pub fn grow(&mut self, max_var: Var) {
        let span = lit_span(max_var);
        if self.lists.len() < span {
            self.lists.resize_with(span, Vec::default);
        }
    }

    /// Adds a watch to be checked when `l` becomes false.
    pub fn watch(&mut self, l: Lit, watch: Watch) {
        self.lists[lit_index(l)].push(watch);
    }

    pub fn list(&self, l: Lit) -> &[Watch] {
        &self.lists[lit_index(l)]
    }

    /// Takes the watch list of `l`, leaving an empty list in its place.
    pub fn take(&mut self, l: Lit) -> Vec<Watch> {
        std::mem::take(&mut self.lists[lit_index(l)])
    }

    /// Restores a taken watch list, keeping any watches added in the interim.
    pub fn restore(&mut self, l: Lit, list: Vec<Watch>) {
        let added = std::mem::replace(&mut self.lists[lit_index(l)], list);
        self.lists[lit_index(l)].extend(added);
    }

    /// Drops every watch of a constraint marked for deletion.
    pub fn retain(&mut self, keep: impl Fn(CRef) -> bool) {
        for list in self.lists.iter_mut() {
            list.retain(|w| keep(w.cref));
        }
    }

    /// Rewrites every watch through `remap`, dropping watches of collected constraints.
    pub fn remap(&mut self, remap: &Remap) {
        for list in self.lists.iter_mut() {
            list.retain_mut(|w| match remap.get(w.cref) {
                Some(fresh) => {
                    w.cref = fresh;
                    true
                }
                None => false,
            });
        }
    }

    /// Removes every watch.
    pub fn clear(&mut self) {
        for list in self.lists.iter_mut() {
            list.clear();
        }
    }
}
