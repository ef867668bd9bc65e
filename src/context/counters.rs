use std::time::Duration;

/// Counts for various things which count, roughly.
///
/// Counters are written at fixed points of a solve and are never read to make a decision, with the exception of deterministic time.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct Counters {
    /// A count of every conflict seen.
    pub conflicts: usize,

    /// A count of conflicts since the last restart.
    pub fresh_conflicts: usize,

    pub decisions: usize,

    pub propagations: usize,

    pub restarts: usize,

    /// Reductions of the learned constraint database.
    pub reductions: usize,

    pub inprocessings: usize,

    /// Garbage collections of the constraint arena.
    pub gc_runs: usize,

    /// Constraints learned by conflict analysis.
    pub learned: usize,

    pub cores: usize,

    pub solutions: usize,

    /// Units fixed at level zero.
    pub units: usize,

    pub pure_literals: usize,

    pub probing_units: usize,

    pub equalities: usize,

    pub amo_found: usize,

    pub dominance_breakers: usize,

    /// Reductions of a constraint expression due to coefficient overflow.
    pub overflow_fixes: usize,

    /// Constraints stored at a wider tier than the tier of analysis.
    pub tier_escalations: usize,

    /// Deterministic time, advanced by propagation and analysis work.
    pub det_time: f64,

    /// Deterministic time spent in core-guided rounds of optimization.
    pub det_time_core_guided: f64,

    /// Deterministic time spent in the linear relaxation.
    pub det_time_lp: f64,

    /// The time taken during solves.
    pub time: Duration,
}
