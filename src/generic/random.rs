//! A small pseudorandom number generator.
//!
//! The generator follows the minimal C implementation of PCG32 from <https://www.pcg-random.org/>, exposed through [RngCore] so the rest of the library may use [rand::Rng].
//! The seed of a solver is given by the `seed` option, so runs are reproducible.

use rand::SeedableRng;
use rand_core::{impls, Error, RngCore};

/// The PCG32 generator.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl MinimalPCG32 {
    const MULTIPLIER: u64 = 6364136223846793005;

    const INCREMENT: u64 = 3215534235932367344;

    /// The generator seeded from an integer.
    pub fn from_u64(seed: u64) -> Self {
        Self::from_seed(seed.to_le_bytes())
    }

    fn step(&mut self) -> u64 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(self.inc);
        old_state
    }
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.step();
        let xorshifted = ((old_state >> 18) ^ old_state) >> 27;
        xorshifted.rotate_right((old_state >> 59) as u32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: (u64::from_le_bytes(seed)).wrapping_add(Self::INCREMENT),
            inc: Self::INCREMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn seeded_sequence() {
        let mut rng = MinimalPCG32::from_u64(2);
        assert_eq!(rng.next_u64(), 748672126);
        assert_eq!(rng.next_u64(), 733451027);
        assert_eq!(rng.next_u64(), 448);
    }

    #[test]
    fn reproducible() {
        let mut a = MinimalPCG32::from_u64(1);
        let mut b = MinimalPCG32::from_u64(1);
        for _ in 0..32 {
            assert_eq!(a.gen_bool(0.5), b.gen_bool(0.5));
        }
    }
}
