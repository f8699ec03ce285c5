use std::{cmp::Ordering, f64::consts, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symbolic mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// Euler's number.
    E,

    /// The ratio of a circle's circumference to its diameter.
    Pi,
}

impl Constant {
    /// Returns the constant with the given name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "e" => Some(Constant::E),
            "pi" => Some(Constant::Pi),
            _ => None,
        }
    }

    /// Returns the name of the constant.
    pub fn name(self) -> &'static str {
        match self {
            Constant::E => "e",
            Constant::Pi => "pi",
        }
    }

    /// Returns the numeric value of the constant.
    pub fn value(self) -> f64 {
        match self {
            Constant::E => consts::E,
            Constant::Pi => consts::PI,
        }
    }
}

/// A numeric leaf: either a real literal or a symbolic constant.
///
/// Reals are compared with [`f64::total_cmp`], so equality and ordering agree. Construct reals
/// with [`Number::real`], which normalizes `-0.0` to `0.0`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// A real number.
    Real(f64),

    /// A symbolic constant, kept distinct from real numbers.
    Const(Constant),
}

impl Number {
    /// Creates a real number.
    pub fn real(value: f64) -> Self {
        Number::Real(value + 0.0)
    }

    /// Returns the numeric value of the number.
    pub fn value(self) -> f64 {
        match self {
            Number::Real(value) => value,
            Number::Const(c) => c.value(),
        }
    }

    /// Returns the value of the number if it is a real literal.
    pub fn as_real(self) -> Option<f64> {
        match self {
            Number::Real(value) => Some(value),
            Number::Const(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    /// Reals are ordered by value and come before constants.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => a.total_cmp(b),
            (Number::Real(_), Number::Const(_)) => Ordering::Less,
            (Number::Const(_), Number::Real(_)) => Ordering::Greater,
            (Number::Const(a), Number::Const(b)) => a.cmp(b),
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::real(value)
    }
}

impl From<Constant> for Number {
    fn from(c: Constant) -> Self {
        Number::Const(c)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Real(value) => write!(f, "{}", value),
            Number::Const(c) => write!(f, "{}", c.name()),
        }
    }
}
