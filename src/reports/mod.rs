/*!
Reports from a solver and from the optimization driver.
*/

use crate::context::ContextState;

/// The outcome of a call to [solve](crate::solver::GenericSolver::solve).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SolveState {
    /// The formula is unsatisfiable, and no further solve is valid.
    Unsat,

    /// A solution has been found, and is available as the last solution.
    Sat,

    /// The formula is inconsistent with the assumptions, and a core is available.
    Inconsistent,

    /// A time limit was reached, though a further solve may resume.
    Timeout,

    /// Control was returned after inprocessing, and a further solve may resume.
    Inprocessed,
}

impl std::fmt::Display for SolveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsat => write!(f, "UNSAT"),
            Self::Sat => write!(f, "SAT"),
            Self::Inconsistent => write!(f, "INCONSISTENT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Inprocessed => write!(f, "INPROCESSED"),
        }
    }
}

/// The status of a constraint with respect to the assignments made before some decision level.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AssertionStatus {
    /// Neither falsified nor propagating.
    NonAsserting,

    /// Propagating some literal.
    Asserting,

    /// Falsified.
    Falsified,
}

/// High-level reports regarding a solve or an optimization.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula is satisfiable and, if optimizing, the best solution found is optimal.
    Optimal,

    /// The formula is unsatisfiable.
    Infeasible,

    /// The formula is inconsistent with the assumptions given.
    Inconsistent,

    /// A time limit was reached.
    Timeout,

    /// Nothing conclusive is known, e.g. a solution exists but has not been shown optimal.
    Unknown,
}

impl From<ContextState> for Report {
    fn from(value: ContextState) -> Self {
        match value {
            ContextState::Configuration | ContextState::Input | ContextState::Solving | ContextState::Interrupted => {
                Self::Unknown
            }
            ContextState::Satisfiable => Self::Optimal,
            ContextState::Inconsistent => Self::Inconsistent,
            ContextState::Unsatisfiable => Self::Infeasible,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "Optimal"),
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Inconsistent => write!(f, "Inconsistent"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
