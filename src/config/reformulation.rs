use std::str::FromStr;

/// When the objective is reformulated with lazily introduced variables after a core is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reformulation {
    /// Introduce a lazy variable as soon as a core is found.
    Always = 0,

    /// Introduce lazy variables for the cores of a stratum once the stratum is satisfiable.
    Depletion,

    /// Never introduce lazy variables, and keep cores as constraints.
    Never,
}

impl Reformulation {
    pub const MIN: Reformulation = Reformulation::Always;

    pub const MAX: Reformulation = Reformulation::Never;
}

impl std::fmt::Display for Reformulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Depletion => write!(f, "depletion"),
            Self::Never => write!(f, "never"),
        }
    }
}

impl FromStr for Reformulation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "depletion" => Ok(Self::Depletion),
            "never" => Ok(Self::Never),
            _unknown_string => Err(()),
        }
    }
}
