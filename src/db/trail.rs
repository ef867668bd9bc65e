//! The trail of assignments, partitioned into decision levels, and the valuation it induces.
//!
//! For each literal the trail records the decision level at which the literal became true, and for each variable its position on the trail and the reason for its assignment.
//! Literals which are not true have level [UNASSIGNED], and unassigned variables have position [UNASSIGNED].
//!
//! The queue head marks the extent of propagation: a literal at a position before the queue head has had its watches processed.

use crate::{
    db::CRef,
    structures::literal::{lit_index, lit_span, var, Lit, Var},
};

/// The level of a literal which is not true, and the position of an unassigned variable.
pub const UNASSIGNED: i32 = i32::MAX;

#[derive(Default)]
pub struct Trail {
    pub literals: Vec<Lit>,
    pub level_indicies: Vec<usize>,
    pub q_head: usize,
    level: Vec<i32>,
    position: Vec<i32>,
    reasons: Vec<Option<CRef>>,
}

impl Trail {
    /// Extends the trail to valuate variables up to and including `max_var`.
    pub fn grow(&mut self, max_var: Var) {
        let span = lit_span(max_var);
        if self.level.len() < span {
            self.level.resize(span, UNASSIGNED);
        }
        let vars = max_var as usize + 1;
        if self.position.len() < vars {
            self.position.resize(vars, UNASSIGNED);
            self.reasons.resize(vars, None);
        }
    }

    /// The largest variable the trail may valuate.
    pub fn max_var(&self) -> Var {
        (self.position.len() as Var - 1).max(0)
    }

    /// The current decision level.
    pub fn decision_level(&self) -> i32 {
        self.level_indicies.len() as i32
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    #[inline(always)]
    pub fn is_true(&self, l: Lit) -> bool {
        self.level[lit_index(l)] != UNASSIGNED
    }

    #[inline(always)]
    pub fn is_false(&self, l: Lit) -> bool {
        self.level[lit_index(-l)] != UNASSIGNED
    }

    #[inline(always)]
    pub fn is_unknown(&self, l: Lit) -> bool {
        self.position[var(l) as usize] == UNASSIGNED
    }

    /// Whether `l` is true at level zero.
    #[inline(always)]
    pub fn is_unit(&self, l: Lit) -> bool {
        self.level[lit_index(l)] == 0
    }

    /// The level at which `l` became true, or [UNASSIGNED].
    #[inline(always)]
    pub fn true_level(&self, l: Lit) -> i32 {
        self.level[lit_index(l)]
    }

    /// The level at which `l` became false, or [UNASSIGNED].
    #[inline(always)]
    pub fn false_level(&self, l: Lit) -> i32 {
        self.level[lit_index(-l)]
    }

    /// The position of `v` on the trail, or [UNASSIGNED].
    #[inline(always)]
    pub fn position(&self, v: Var) -> i32 {
        self.position[v as usize]
    }

    /// Whether the watches of the literal assigned to `v` have been processed.
    #[inline(always)]
    pub fn is_processed(&self, v: Var) -> bool {
        self.position[v as usize] < self.q_head as i32
    }

    /// Whether `l` is false and its watches have been processed.
    #[inline(always)]
    pub fn is_false_processed(&self, l: Lit) -> bool {
        self.is_false(l) && self.is_processed(var(l))
    }

    pub fn reason(&self, v: Var) -> Option<CRef> {
        self.reasons[v as usize]
    }

    pub fn set_reason(&mut self, v: Var, reason: Option<CRef>) {
        self.reasons[v as usize] = reason;
    }

    /// Whether `v` was assigned without a reason, as a decision.
    pub fn is_decided(&self, v: Var) -> bool {
        self.position[v as usize] != UNASSIGNED && self.reasons[v as usize].is_none()
    }

    /// The truth value of `l`, if assigned.
    pub fn value_of(&self, l: Lit) -> Option<bool> {
        match (self.is_true(l), self.is_false(l)) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Assigns `l` true at the current level.
    pub fn assign(&mut self, l: Lit, reason: Option<CRef>) {
        debug_assert!(self.is_unknown(l));
        let v = var(l) as usize;
        self.level[lit_index(l)] = self.decision_level();
        self.position[v] = self.literals.len() as i32;
        self.reasons[v] = reason;
        self.literals.push(l);
    }

    /// Opens a fresh decision level with `l`.
    pub fn decide(&mut self, l: Lit) {
        self.level_indicies.push(self.literals.len());
        self.assign(l, None);
    }

    /// Removes the most recent assignment, closing its level if it was the decision of the level.
    ///
    /// # Soundness
    /// The queue head is not revised, and undoing any propagation of the literal is the responsibility of the caller.
    pub fn pop(&mut self) -> Option<Lit> {
        let l = self.literals.pop()?;
        let v = var(l) as usize;
        self.level[lit_index(l)] = UNASSIGNED;
        self.position[v] = UNASSIGNED;
        self.reasons[v] = None;
        if self.level_indicies.last() == Some(&self.literals.len()) {
            self.level_indicies.pop();
        }
        Some(l)
    }

    /// The literals assigned at the top level, in order of assignment.
    pub fn top_level_assignments(&self) -> &[Lit] {
        match self.level_indicies.last() {
            Some(&start) => &self.literals[start..],
            None => &self.literals,
        }
    }

    /// The literals assigned at level zero.
    pub fn root_assignments(&self) -> &[Lit] {
        match self.level_indicies.first() {
            Some(&end) => &self.literals[..end],
            None => &self.literals,
        }
    }
}
