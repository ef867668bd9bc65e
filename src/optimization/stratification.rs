//! Stratification of the objective by cost.
//!
//! Only literals with a cost at or above a threshold are assumed false in a core-guided round.
//! The threshold starts at the largest cost and, each time the literals above it can all be false together, drops by the factor `cg_strat`, to at most the largest cost below the previous threshold.
//! A factor of one disables stratification, with every literal of positive cost assumed from the first round.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, ToPrimitive};

#[derive(Clone, Debug)]
pub struct Stratification {
    factor: f64,
    threshold: BigInt,
}

impl Stratification {
    pub fn new<'a>(factor: f64, costs: impl Iterator<Item = &'a BigInt>) -> Self {
        let threshold = match factor > 1.0 {
            true => costs.max().cloned().unwrap_or_else(BigInt::one),
            false => BigInt::one(),
        };
        Stratification { factor, threshold }
    }

    pub fn threshold(&self) -> &BigInt {
        &self.threshold
    }

    pub fn admits(&self, cost: &BigInt) -> bool {
        *cost >= self.threshold
    }

    /// Lowers the threshold, returning false if no cost lies below the current threshold.
    pub fn lower<'a>(&mut self, costs: impl Iterator<Item = &'a BigInt>) -> bool {
        let Some(below) = costs.filter(|c| **c < self.threshold).max() else {
            return false;
        };
        let scaled = self
            .threshold
            .to_f64()
            .and_then(|t| BigInt::from_f64((t / self.factor).floor()))
            .unwrap_or_else(BigInt::one)
            .max(BigInt::one());
        self.threshold = scaled.min(below.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(costs: &[i64]) -> Vec<BigInt> {
        costs.iter().map(|c| BigInt::from(*c)).collect()
    }

    #[test]
    fn lowering() {
        let costs = big(&[1, 3, 40, 100]);
        let mut strat = Stratification::new(2.0, costs.iter());
        assert_eq!(strat.threshold(), &BigInt::from(100));

        assert!(strat.lower(costs.iter()));
        assert_eq!(strat.threshold(), &BigInt::from(40));

        assert!(strat.lower(costs.iter()));
        assert_eq!(strat.threshold(), &BigInt::from(3));
        assert!(strat.admits(&BigInt::from(40)));
        assert!(!strat.admits(&BigInt::from(1)));

        assert!(strat.lower(costs.iter()));
        assert_eq!(strat.threshold(), &BigInt::from(1));
        assert!(!strat.lower(costs.iter()));
    }

    #[test]
    fn disabled() {
        let costs = big(&[5, 7]);
        let mut strat = Stratification::new(1.0, costs.iter());
        assert_eq!(strat.threshold(), &BigInt::one());
        assert!(!strat.lower(costs.iter()));
    }
}
