/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [propagation](crate::procedures::propagate)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to learned constraint deletion
    pub const REDUCTION: &str = "reduction";

    /// Logs related to the [constraint database](crate::db)
    pub const CONSTRAINT_DB: &str = "constraint_db";

    /// Logs related to [backjumping](crate::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to [inprocessing](crate::procedures::inprocess)
    pub const INPROCESSING: &str = "inprocessing";

    /// Logs related to the [optimization driver](crate::optimization)
    pub const OPTIMIZATION: &str = "optimization";

    /// Logs related to coefficient overflow and tier selection
    pub const OVERFLOW: &str = "overflow";

    /// Logs related to [assumptions](crate::procedures::assumptions) and cores
    pub const ASSUMPTIONS: &str = "assumptions";

    /// Logs related to the [linear relaxation](crate::lp)
    pub const LP: &str = "lp";
}
