//! Numbers, and the precision tiers of constraint expressions.
//!
//! Arithmetic in the library is generic over the [Number] trait, implemented for `i32`, `i64`, `i128`, and [BigInt].
//! A [tier](Tier) pairs a coefficient type with a (wider) degree type, so that sums of coefficients fit in the degree type.
//!
//! | Tier | Coefficient | Degree | Analysis budget (bits) | Storage limit (bits) |
//! |------|-------------|--------|------------------------|----------------------|
//! | T32  | i32         | i64    | 14                     | 30                   |
//! | T64  | i64         | i128   | 30                     | 62                   |
//! | T96  | i128        | i128   | 48                     | 96                   |
//! | T128 | i128        | BigInt | 62                     | 126                  |
//! | Arb  | BigInt      | BigInt | unlimited              | unlimited            |
//!
//! Budgets for analysis are conservative, as resolution multiplies coefficients before reducing them again.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive};

/// Degrees and right hand sides may exceed the largest coefficient by at most this factor before being reduced.
pub const INF: i64 = 1_000_000_001;

/// An integer type usable as a coefficient or degree.
pub trait Number:
    Clone + Debug + Display + Default + Ord + Hash + Signed + Integer + FromPrimitive + ToPrimitive + 'static
{
    /// The number of magnitude bits of the type, if bounded.
    const CAPACITY: Option<u32>;

    fn to_big(&self) -> BigInt;

    fn try_from_big(value: &BigInt) -> Option<Self>;

    /// The bit length of the magnitude, zero for zero.
    fn msb(&self) -> u32;

    /// The value as another number type, if it fits.
    fn try_convert<T: Number>(&self) -> Option<T> {
        match self.to_i128() {
            Some(value) => T::from_i128(value),
            None => T::try_from_big(&self.to_big()),
        }
    }

    /// The value as another number type.
    ///
    /// # Panics
    /// Tier selection guarantees values fit, so failure to convert is a defect.
    fn convert<T: Number>(&self) -> T {
        match self.try_convert() {
            Some(value) => value,
            None => panic!("! {self} exceeds the capacity of the target type"),
        }
    }

    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::MAX)
    }
}

macro_rules! fixed_width {
    ($t:ty) => {
        impl Number for $t {
            const CAPACITY: Option<u32> = Some(<$t>::BITS - 1);

            fn to_big(&self) -> BigInt {
                BigInt::from(*self)
            }

            fn try_from_big(value: &BigInt) -> Option<Self> {
                <$t>::try_from(value).ok()
            }

            fn msb(&self) -> u32 {
                <$t>::BITS - self.unsigned_abs().leading_zeros()
            }
        }
    };
}

fixed_width!(i32);
fixed_width!(i64);
fixed_width!(i128);

impl Number for BigInt {
    const CAPACITY: Option<u32> = None;

    fn to_big(&self) -> BigInt {
        self.clone()
    }

    fn try_from_big(value: &BigInt) -> Option<Self> {
        Some(value.clone())
    }

    fn msb(&self) -> u32 {
        self.bits() as u32
    }
}

/// ⌈a / b⌉, for positive b.
pub fn ceildiv<T: Number>(a: &T, b: &T) -> T {
    let (q, r) = a.div_mod_floor(b);
    match r.is_zero() {
        true => q,
        false => q + T::one(),
    }
}

/// ⌊a / b⌋, for positive b.
pub fn floordiv<T: Number>(a: &T, b: &T) -> T {
    Integer::div_floor(a, b)
}

/// 2 to the power of `bits`.
pub fn powtwo<T: Number>(bits: u32) -> T {
    num_traits::pow(T::one() + T::one(), bits as usize)
}

/// The non-negative part of a number.
pub fn pospart<T: Number>(value: &T) -> T {
    match value.is_positive() {
        true => value.clone(),
        false => T::zero(),
    }
}

/// The magnitude of the non-positive part of a number.
pub fn negpart<T: Number>(value: &T) -> T {
    match value.is_negative() {
        true => -value.clone(),
        false => T::zero(),
    }
}

/// The precision tiers of constraint expressions, ordered by width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Tier {
    T32,
    T64,
    T96,
    T128,
    Arb,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::T32, Tier::T64, Tier::T96, Tier::T128, Tier::Arb];

    /// The largest bit budget for coefficients during conflict analysis in the tier, if bounded.
    pub fn analysis_budget(&self) -> Option<u32> {
        match self {
            Tier::T32 => Some(14),
            Tier::T64 => Some(30),
            Tier::T96 => Some(48),
            Tier::T128 => Some(62),
            Tier::Arb => None,
        }
    }

    /// The largest coefficient and degree bit lengths for which a constraint may be stored in the tier, if bounded.
    pub fn storage_limits(&self) -> Option<(u32, u32)> {
        match self {
            Tier::T32 => Some((30, 62)),
            Tier::T64 => Some((62, 126)),
            Tier::T96 => Some((96, 126)),
            Tier::T128 => Some((126, u32::MAX)),
            Tier::Arb => None,
        }
    }

    /// The tier used for conflict analysis given an overflow bit budget, with zero for unbounded.
    pub fn for_analysis(bits_overflow: u32) -> Tier {
        match bits_overflow {
            0 => Tier::Arb,
            1..=14 => Tier::T32,
            15..=30 => Tier::T64,
            31..=48 => Tier::T96,
            49..=62 => Tier::T128,
            _ => Tier::Arb,
        }
    }

    /// The smallest tier in which a constraint with the given largest coefficient and degree bit lengths may be stored.
    pub fn for_storage(coef_bits: u32, degree_bits: u32) -> Tier {
        for tier in Tier::ALL {
            match tier.storage_limits() {
                Some((max_coef, max_degree)) => {
                    if coef_bits <= max_coef && degree_bits <= max_degree {
                        return tier;
                    }
                }
                None => return tier,
            }
        }
        Tier::Arb
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::T32 => write!(f, "32"),
            Tier::T64 => write!(f, "64"),
            Tier::T96 => write!(f, "96"),
            Tier::T128 => write!(f, "128"),
            Tier::Arb => write!(f, "arb"),
        }
    }
}
