//! Derivations of constraint expressions, in reverse polish notation.
//!
//! A proof buffer is only written to when active, which is the case exactly when the [shared context](crate::context::SharedContext) has a dispatcher.
//!
//! ```rust
//! # use otter_pb::ce::proof::ProofBuffer;
//! let mut proof = ProofBuffer::default();
//! proof.set_active(true);
//! proof.reset(4);
//! proof.multiply(&3);
//! proof.add_axiom(-2, &5);
//! proof.saturate();
//! assert_eq!(proof.to_string(), "4 3 * ~x2 5 * + s");
//! ```

use std::fmt::{Display, Write};

use crate::{context::ID, structures::literal::Lit};

#[derive(Clone, Debug, Default)]
pub struct ProofBuffer {
    active: bool,
    steps: String,
}

impl ProofBuffer {
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.steps.clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Begins a derivation from the constraint with identifier `id`.
    pub fn reset(&mut self, id: ID) {
        if self.active {
            self.steps.clear();
            let _ = write!(self.steps, "{id}");
        }
    }

    pub fn copy_from(&mut self, other: &ProofBuffer) {
        if self.active {
            self.steps.clear();
            self.steps.push_str(&other.steps);
        }
    }

    pub fn multiply(&mut self, m: &impl Display) {
        if self.active {
            let _ = write!(self.steps, " {m} *");
        }
    }

    pub fn divide(&mut self, d: &impl Display) {
        if self.active {
            let _ = write!(self.steps, " {d} d");
        }
    }

    pub fn saturate(&mut self) {
        if self.active {
            self.steps.push_str(" s");
        }
    }

    /// Adds `m` times the literal axiom `l ≥ 0`, as used to weaken `¬l`.
    pub fn add_axiom(&mut self, l: Lit, m: &impl Display) {
        if self.active {
            match l < 0 {
                true => {
                    let _ = write!(self.steps, " ~x{} {m} * +", -l);
                }
                false => {
                    let _ = write!(self.steps, " x{l} {m} * +");
                }
            }
        }
    }

    /// Adds `m` times the unit fact `l ≥ 1`, known at level zero.
    pub fn add_unit(&mut self, l: Lit, m: &impl Display) {
        if self.active {
            match l < 0 {
                true => {
                    let _ = write!(self.steps, " u~x{} {m} * +", -l);
                }
                false => {
                    let _ = write!(self.steps, " ux{l} {m} * +");
                }
            }
        }
    }

    /// Adds `m` times the derivation of `other`.
    pub fn add_scaled(&mut self, other: &ProofBuffer, m: &impl Display) {
        if self.active && !other.steps.is_empty() {
            let _ = write!(self.steps, " {} {m} * +", other.steps);
        }
    }
}

impl Display for ProofBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.steps)
    }
}
