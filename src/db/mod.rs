/*!
The constraint database, an arena of stored constraints addressed by [CRef]s.

# Overview

Constraints are stored in an append-only arena, and a [CRef] is the index of a constraint in the arena.
Alongside each constraint is a [Header], noting the identifier, [origin](Origin), lbd, and activity of the constraint.

Removal of a constraint is in two steps:
- The constraint is marked for deletion, after which the constraint is no longer used for propagation (watches of the constraint are dropped when found) and will not be the reason of any new assignment.
- At some later point [garbage collection](ConstraintDB::collect_garbage) compacts the arena and returns a [Remap] from the old references of surviving constraints to their new references.

Garbage collection invalidates every reference held outside of the database.
Any held reference must be updated through the remap, and a reference without a remap (i.e. to a removed constraint) must not be used.

```rust
# use otter_pb::db::{ConstraintDB, Header};
# use otter_pb::db::constr::{Constr, clause::Clause};
# use otter_pb::structures::origin::Origin;
let mut db = ConstraintDB::default();
let a = db.insert(Header::new(1, Origin::Formula), Constr::Clause(Clause::new(vec![1, 2])));
let b = db.insert(Header::new(2, Origin::Learned), Constr::Clause(Clause::new(vec![-1, 2])));
let c = db.insert(Header::new(3, Origin::Learned), Constr::Clause(Clause::new(vec![1, -2])));

db.mark_for_deletion(b);
assert!(db.should_collect());

let remap = db.collect_garbage();
assert_eq!(remap.get(a), Some(a));
assert_eq!(remap.get(b), None);
assert_eq!(db.get(remap.get(c).unwrap()).header.id, 3);
```
*/

pub mod constr;
pub mod trail;
pub mod watches;

use std::collections::HashMap;

use crate::{context::ID, misc::log::targets, structures::origin::Origin};

use constr::Constr;

/// The largest lbd recorded, as lbds are stored in 24 bits.
pub const MAX_LBD: u32 = (1 << 24) - 1;

/// A reference to a stored constraint, valid until the next garbage collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CRef(u32);

impl CRef {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Bookkeeping for a stored constraint.
#[derive(Clone, Debug)]
pub struct Header {
    pub id: ID,

    pub origin: Origin,

    /// The lbd of the constraint when learned, revised down when the constraint is used during analysis.
    pub lbd: u32,

    /// A locked constraint is never removed by reduction.
    pub locked: bool,

    pub marked_for_deletion: bool,

    pub activity: f64,
}

impl Header {
    pub fn new(id: ID, origin: Origin) -> Self {
        Header {
            id,
            origin,
            lbd: 0,
            locked: false,
            marked_for_deletion: false,
            activity: 0.0,
        }
    }

    /// Revises the lbd to `lbd`, if lower.
    pub fn improve_lbd(&mut self, lbd: u32) {
        let lbd = lbd.min(MAX_LBD);
        if self.lbd == 0 || lbd < self.lbd {
            self.lbd = lbd;
        }
    }
}

/// A constraint together with its header.
pub struct StoredConstr {
    pub header: Header,
    pub constr: Constr,
}

/// A map from references before garbage collection to references after.
#[derive(Debug, Default)]
pub struct Remap {
    map: Vec<Option<CRef>>,
}

impl Remap {
    /// The reference after garbage collection, if the constraint survived.
    pub fn get(&self, cref: CRef) -> Option<CRef> {
        self.map.get(cref.index()).copied().flatten()
    }
}

/// The arena of stored constraints.
#[derive(Default)]
pub struct ConstraintDB {
    constraints: Vec<StoredConstr>,

    /// A count of constraints marked for deletion.
    dead: usize,

    /// A count of stored learned constraints which are not marked for deletion.
    learned: usize,

    /// Constraints added with an identifier which may later be used to remove the constraint.
    removable: HashMap<ID, CRef>,
}

impl ConstraintDB {
    /// Stores a constraint, returning a reference to the constraint.
    pub fn insert(&mut self, header: Header, constr: Constr) -> CRef {
        let cref = CRef(self.constraints.len() as u32);
        if header.origin.is_learned() {
            self.learned += 1;
        }
        log::trace!(target: targets::CONSTRAINT_DB, "Stored {} at {cref}", header.id);
        self.constraints.push(StoredConstr { header, constr });
        cref
    }

    pub fn get(&self, cref: CRef) -> &StoredConstr {
        &self.constraints[cref.index()]
    }

    pub fn get_mut(&mut self, cref: CRef) -> &mut StoredConstr {
        &mut self.constraints[cref.index()]
    }

    /// The count of constraints in the arena, including those marked for deletion.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The count of learned constraints which have not been marked for deletion.
    pub fn learned_count(&self) -> usize {
        self.learned
    }

    pub fn is_deleted(&self, cref: CRef) -> bool {
        self.constraints[cref.index()].header.marked_for_deletion
    }

    /// Marks a constraint for deletion, with no effect if already marked.
    pub fn mark_for_deletion(&mut self, cref: CRef) {
        let stored = &mut self.constraints[cref.index()];
        if !stored.header.marked_for_deletion {
            stored.header.marked_for_deletion = true;
            self.dead += 1;
            if stored.header.origin.is_learned() {
                self.learned -= 1;
            }
        }
    }

    /// References to every constraint not marked for deletion.
    pub fn live_refs(&self) -> Vec<CRef> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, stored)| !stored.header.marked_for_deletion)
            .map(|(index, _)| CRef(index as u32))
            .collect()
    }

    /// Notes `id` may be used to remove the constraint `cref`.
    pub fn note_removable(&mut self, id: ID, cref: CRef) {
        self.removable.insert(id, cref);
    }

    /// Takes the reference of the removable constraint with identifier `id`.
    pub fn take_removable(&mut self, id: ID) -> Option<CRef> {
        self.removable.remove(&id)
    }

    /// Whether at least half of the arena is marked for deletion.
    pub fn should_collect(&self) -> bool {
        self.dead > 0 && self.dead * 2 >= self.constraints.len()
    }

    /// Compacts the arena by dropping every constraint marked for deletion.
    pub fn collect_garbage(&mut self) -> Remap {
        let mut remap = Remap {
            map: Vec::with_capacity(self.constraints.len()),
        };
        let old = std::mem::take(&mut self.constraints);
        for stored in old {
            match stored.header.marked_for_deletion {
                true => remap.map.push(None),
                false => {
                    remap.map.push(Some(CRef(self.constraints.len() as u32)));
                    self.constraints.push(stored);
                }
            }
        }
        log::debug!(target: targets::CONSTRAINT_DB, "Garbage collected {} constraints", self.dead);
        self.dead = 0;
        self.removable.retain(|_, cref| match remap.get(*cref) {
            Some(fresh) => {
                *cref = fresh;
                true
            }
            None => false,
        });
        remap
    }
}
