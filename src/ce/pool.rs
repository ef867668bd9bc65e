//! Pools of constraint expressions.
//!
//! Expressions are taken from a pool as a [Pooled] guard, which dereferences to the expression and returns it to the pool (reset) when dropped.
//! So, an expression is returned on every exit path, including early returns through `?`.
//!
//! ```rust
//! # use otter_pb::ce::pool::Pool;
//! let pool = Pool::<i32, i64>::default();
//! {
//!     let mut ce = pool.take();
//!     ce.add_lhs(2, 1);
//!     ce.add_rhs(1);
//!     assert_eq!(pool.free_count(), 0);
//! }
//! assert_eq!(pool.free_count(), 1);
//! assert!(pool.take().is_empty());
//! ```

use std::{
    cell::{Cell, RefCell},
    ops::{Deref, DerefMut},
    rc::Rc,
};

use crate::{ce::ConstrExp, numeric::Number};

use super::super_ce::CeSuper;

use crate::numeric::Tier;

/// A pool of expressions of a single tier.
pub struct Pool<C: Number, D: Number> {
    free: Rc<RefCell<Vec<ConstrExp<C, D>>>>,
    logging: Rc<Cell<bool>>,
}

impl<C: Number, D: Number> Default for Pool<C, D> {
    fn default() -> Self {
        Pool {
            free: Rc::default(),
            logging: Rc::new(Cell::new(false)),
        }
    }
}

impl<C: Number, D: Number> Pool<C, D> {
    fn with_logging(logging: Rc<Cell<bool>>) -> Self {
        Pool {
            free: Rc::default(),
            logging,
        }
    }

    /// A reset expression, with an active proof buffer if derivations are being logged.
    pub fn take(&self) -> Pooled<C, D> {
        let mut ce = self.free.borrow_mut().pop().unwrap_or_default();
        ce.proof.set_active(self.logging.get());
        Pooled {
            ce,
            home: self.free.clone(),
        }
    }

    /// A copy of `ce`, taken from the pool.
    pub fn take_copy(&self, ce: &ConstrExp<C, D>) -> Pooled<C, D> {
        let mut copy = self.take();
        ce.copy_into(&mut copy);
        copy
    }

    /// A count of expressions waiting in the pool.
    pub fn free_count(&self) -> usize {
        self.free.borrow().len()
    }
}

/// An expression on loan from a pool.
pub struct Pooled<C: Number, D: Number> {
    ce: ConstrExp<C, D>,
    home: Rc<RefCell<Vec<ConstrExp<C, D>>>>,
}

impl<C: Number, D: Number> Pooled<C, D> {
    /// Takes the expression out of the pool's care.
    pub fn detach(mut self) -> ConstrExp<C, D> {
        std::mem::take(&mut self.ce)
    }
}

impl<C: Number, D: Number> Deref for Pooled<C, D> {
    type Target = ConstrExp<C, D>;

    fn deref(&self) -> &Self::Target {
        &self.ce
    }
}

impl<C: Number, D: Number> DerefMut for Pooled<C, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ce
    }
}

impl<C: Number, D: Number> Drop for Pooled<C, D> {
    fn drop(&mut self) {
        let mut ce = std::mem::take(&mut self.ce);
        ce.reset();
        self.home.borrow_mut().push(ce);
    }
}

impl<C: Number, D: Number> std::fmt::Debug for Pooled<C, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ce)
    }
}

/// A pool for each tier, sharing a note of whether derivations are logged.
pub struct CePools {
    pub t32: Pool<i32, i64>,
    pub t64: Pool<i64, i128>,
    pub t96: Pool<i128, i128>,
    pub t128: Pool<i128, num_bigint::BigInt>,
    pub arb: Pool<num_bigint::BigInt, num_bigint::BigInt>,
    logging: Rc<Cell<bool>>,
}

impl Default for CePools {
    fn default() -> Self {
        let logging = Rc::new(Cell::new(false));
        CePools {
            t32: Pool::with_logging(logging.clone()),
            t64: Pool::with_logging(logging.clone()),
            t96: Pool::with_logging(logging.clone()),
            t128: Pool::with_logging(logging.clone()),
            arb: Pool::with_logging(logging.clone()),
            logging,
        }
    }
}

impl CePools {
    pub fn set_logging(&self, logging: bool) {
        self.logging.set(logging);
    }

    pub fn is_logging(&self) -> bool {
        self.logging.get()
    }

    /// A reset expression of the given tier.
    pub fn take(&self, tier: Tier) -> CeSuper {
        match tier {
            Tier::T32 => CeSuper::Ce32(self.t32.take()),
            Tier::T64 => CeSuper::Ce64(self.t64.take()),
            Tier::T96 => CeSuper::Ce96(self.t96.take()),
            Tier::T128 => CeSuper::Ce128(self.t128.take()),
            Tier::Arb => CeSuper::Arb(self.arb.take()),
        }
    }
}
