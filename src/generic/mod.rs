//! Generic structures, independent of constraints.

pub mod activity_heap;
pub mod luby;
pub mod random;
