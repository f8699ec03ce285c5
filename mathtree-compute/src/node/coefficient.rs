use num_integer::Integer;
use std::{cmp::Ordering, fmt, ops::{Add, Div, Mul, Neg}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integers at or beyond this magnitude cannot be represented exactly by an `f64`.
const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Returns true if the value is an integer that an `f64` represents exactly.
fn is_whole(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < EXACT_LIMIT
}

/// The numeric coefficient of a [`Product`](super::Product), `numer / denom`.
///
/// When both parts are whole the fraction is kept reduced with a positive denominator;
/// otherwise it is collapsed to a single real over `1`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coefficient {
    numer: f64,
    denom: f64,
}

impl Coefficient {
    /// The multiplicative identity.
    pub const ONE: Self = Self { numer: 1.0, denom: 1.0 };

    /// The additive identity.
    pub const ZERO: Self = Self { numer: 0.0, denom: 1.0 };

    /// Negative one.
    pub const MINUS_ONE: Self = Self { numer: -1.0, denom: 1.0 };

    /// Creates the coefficient `numer / denom`. The denominator must be nonzero.
    pub fn new(numer: f64, denom: f64) -> Self {
        debug_assert!(denom != 0.0, "coefficient with zero denominator");
        let (mut numer, mut denom) = if denom < 0.0 { (-numer, -denom) } else { (numer, denom) };

        if is_whole(numer) && is_whole(denom) {
            let gcd = (numer as i64).gcd(&(denom as i64));
            if gcd > 1 {
                numer /= gcd as f64;
                denom /= gcd as f64;
            }
        } else {
            numer /= denom;
            denom = 1.0;
        }

        Self { numer: numer + 0.0, denom }
    }

    /// Returns the numerator.
    pub fn numer(self) -> f64 {
        self.numer
    }

    /// Returns the denominator, which is always positive.
    pub fn denom(self) -> f64 {
        self.denom
    }

    /// Returns the value of the coefficient as a single real.
    pub fn value(self) -> f64 {
        self.numer / self.denom
    }

    pub fn is_one(self) -> bool {
        self.numer == 1.0 && self.denom == 1.0
    }

    pub fn is_zero(self) -> bool {
        self.numer == 0.0
    }

    pub fn is_negative(self) -> bool {
        self.numer < 0.0
    }

    /// Returns true if the coefficient is a whole number.
    pub fn is_integer(self) -> bool {
        self.denom == 1.0 && self.numer.fract() == 0.0
    }

    /// Raises the coefficient to an integer power.
    pub fn powi(self, exponent: i32) -> Self {
        if exponent < 0 {
            Self::new(self.denom.powi(-exponent), self.numer.powi(-exponent))
        } else {
            Self::new(self.numer.powi(exponent), self.denom.powi(exponent))
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Self::new(value, 1.0)
    }
}

impl Add for Coefficient {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.numer * rhs.denom + rhs.numer * self.denom, self.denom * rhs.denom)
    }
}

impl Mul for Coefficient {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.numer * rhs.numer, self.denom * rhs.denom)
    }
}

impl Div for Coefficient {
    type Output = Self;

    /// Divides by a nonzero coefficient.
    fn div(self, rhs: Self) -> Self {
        Self::new(self.numer * rhs.denom, self.denom * rhs.numer)
    }
}

impl Neg for Coefficient {
    type Output = Self;

    fn neg(self) -> Self {
        Self { numer: -self.numer + 0.0, denom: self.denom }
    }
}

impl PartialEq for Coefficient {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coefficient {}

impl PartialOrd for Coefficient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coefficient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value()
            .total_cmp(&other.value())
            .then_with(|| self.numer.total_cmp(&other.numer))
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1.0 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
