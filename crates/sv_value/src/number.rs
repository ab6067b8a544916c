use core::fmt;

use num_bigint::BigInt;

// -----------------------------------------------------------------------------
// Number

/// The numeric leaf of a [`Value`](crate::Value).
///
/// Three representations are kept apart rather than normalized: a 64-bit
/// integer, a 64-bit float, and an arbitrary-precision integer for values
/// outside the `i64` range. Equality is representation equality; `Int(1)` and
/// `Float(1.0)` are *not* equal. Cross-representation acceptance is a
/// decode-time validation concern, not a data-model one.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// An integer outside the `i64` range.
    Big(BigInt),
}

impl Number {
    /// Returns the integer value, if this number is an `Int`.
    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value, if this number is a `Float`.
    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the big integer, if this number is a `Big`.
    #[inline]
    pub const fn as_big(&self) -> Option<&BigInt> {
        match self {
            Self::Big(b) => Some(b),
            _ => None,
        }
    }

    /// Returns this number as an `f64`, converting lossily if needed.
    pub fn to_float_lossy(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Big(b) => {
                use num_bigint::Sign;
                // Saturate; a Big by construction does not fit i64 anyway.
                match b.sign() {
                    Sign::Minus => f64::NEG_INFINITY,
                    Sign::NoSign => 0.0,
                    Sign::Plus => f64::INFINITY,
                }
            }
        }
    }
}

impl From<i64> for Number {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Big(BigInt::from(value)),
        }
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<BigInt> for Number {
    #[inline]
    fn from(value: BigInt) -> Self {
        Self::Big(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Big(b) => write!(f, "{b}"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
