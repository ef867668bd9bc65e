//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - Some are external, e.g. a solver returns a `SolveAfterUnsat` error when asked to solve a formula already shown to be unsatisfiable.
//! - Interruption by a termination callback is also reported as an error, as the state of the solver is no longer a valid starting point for a further solve.
//!
//! Names of the error enums, for the most part, overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::literal::{Lit, Var};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Analysis(AnalysisError),
    ConstraintDB(ConstraintDBError),
    Option(OptionError),
    Usage(UsageError),

    /// A solve was interrupted by a termination request.
    Interrupted,

    /// A call was made to a solver left in an unusable state.
    InvalidState,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis(e) => write!(f, "analysis error: {e:?}"),
            Self::ConstraintDB(e) => write!(f, "constraint database error: {e:?}"),
            Self::Option(e) => write!(f, "option error: {e:?}"),
            Self::Usage(e) => write!(f, "usage error: {e:?}"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::InvalidState => write!(f, "invalid state"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Noted errors during conflict analysis.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// Resolution failed to terminate with an asserting constraint.
    NoAssertion,

    /// A literal without a reason was found where a propagated literal was required.
    MissingReason,

    /// Analysis was called on a constraint which is not conflicting.
    NoConflict,
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

/// Errors in the constraint database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintDBError {
    /// A reference to a constraint which has been collected.
    Missing,

    /// An identifier with no corresponding removable constraint.
    UnknownId,

    /// An attempt to remove a constraint which is the reason for some literal.
    Locked,
}

impl From<ConstraintDBError> for ErrorKind {
    fn from(e: ConstraintDBError) -> Self {
        ErrorKind::ConstraintDB(e)
    }
}

/// Errors when reading or setting options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OptionError {
    /// No option with the given name.
    UnknownOption(String),

    /// The value could not be parsed for the option.
    UnparsableValue(String),

    /// The value is outside the permitted range of the option.
    OutOfRange(String),

    /// The option may not be changed once solving has begun.
    Locked(String),
}

impl From<OptionError> for ErrorKind {
    fn from(e: OptionError) -> Self {
        ErrorKind::Option(e)
    }
}

/// Errors due to requests which are invalid given the state of the solver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UsageError {
    /// A solve was requested after the formula was found unsatisfiable.
    SolveAfterUnsat,

    /// A constraint mentions a variable unknown to the solver.
    UnknownVariable(Var),

    /// An assumption mentions a variable unknown to the solver, or is the zero literal.
    InvalidAssumption(Lit),

    /// The zero literal was used.
    ZeroLiteral,

    /// An objective was given which mentions a variable unknown to the solver.
    InvalidObjective,

    /// A solution was requested, though none is available.
    NoSolution,

    /// A core was requested, though none is available.
    NoCore,
}

impl From<UsageError> for ErrorKind {
    fn from(e: UsageError) -> Self {
        ErrorKind::Usage(e)
    }
}
