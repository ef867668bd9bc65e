//! The provenance of a constraint.

/// Where a constraint came from.
///
/// The origin of a constraint determines whether it may be deleted during reduction and how it is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Origin {
    #[default]
    Unknown,

    /// Part of the input formula.
    Formula,

    /// A bound on the objective from below.
    LowerBound,

    /// A bound on the objective from above, from the best known solution.
    UpperBound,

    /// Added by the optimization driver to define lazily introduced variables.
    CoreGuided,

    /// Learned by conflict analysis.
    Learned,

    /// A Farkas certificate from the linear relaxation.
    Farkas,

    /// A cut obtained from the duals of the linear relaxation.
    Duals,

    /// A unit found by probing.
    Probing,

    /// An equality between literals found by probing.
    Equality,

    /// An at-most-one constraint detected from binary implications.
    DetectedAmo,

    /// A unit found to be pure.
    Pure,

    /// A dominance breaking constraint.
    DomBreaker,
}

impl Origin {
    /// Whether a constraint with the origin may be removed by reduction of the database.
    pub fn is_learned(&self) -> bool {
        matches!(
            self,
            Origin::Learned | Origin::Farkas | Origin::Duals | Origin::Probing | Origin::Equality | Origin::DetectedAmo
        )
    }

    /// Whether a constraint with the origin is part of the input, or is an external bound.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Origin::Formula | Origin::LowerBound | Origin::UpperBound | Origin::CoreGuided
        )
    }

    /// Whether a constraint with the origin depends on the objective, and so may not be used when inprocessing ignores it.
    pub fn is_bound(&self) -> bool {
        matches!(self, Origin::LowerBound | Origin::UpperBound)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Origin::Unknown => "unknown",
            Origin::Formula => "formula",
            Origin::LowerBound => "lowerbound",
            Origin::UpperBound => "upperbound",
            Origin::CoreGuided => "coreguided",
            Origin::Learned => "learned",
            Origin::Farkas => "farkas",
            Origin::Duals => "duals",
            Origin::Probing => "probing",
            Origin::Equality => "equality",
            Origin::DetectedAmo => "detectedamo",
            Origin::Pure => "pure",
            Origin::DomBreaker => "dombreaker",
        };
        write!(f, "{name}")
    }
}
