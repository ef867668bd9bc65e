use std::str::FromStr;

/// How a reason is divided during resolution, so its slack becomes non-positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Division {
    /// Divide by the coefficient of the asserting literal, rounding up, after weakening non-falsified literals.
    RoundToOne = 0,

    /// Divide by the slack of the reason plus one.
    SlackPlusOne,

    /// Divide by the smallest divisor greater than the slack built from small prime factors of the coefficient.
    MinDiv,
}

impl Division {
    pub const MIN: Division = Division::RoundToOne;

    pub const MAX: Division = Division::MinDiv;
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoundToOne => write!(f, "rto"),
            Self::SlackPlusOne => write!(f, "slack+1"),
            Self::MinDiv => write!(f, "mindiv"),
        }
    }
}

impl FromStr for Division {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rto" => Ok(Self::RoundToOne),
            "slack+1" => Ok(Self::SlackPlusOne),
            "mindiv" => Ok(Self::MinDiv),
            _unknown_string => Err(()),
        }
    }
}
