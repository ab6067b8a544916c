//! The decode-time validation engine.
//!
//! Validation applies only while decoding; encoding trusts the host model.
//! Object-shaped checks (extra/missing properties) run in the object
//! converter; the basic-type check below runs wherever a primitive value is
//! read, through [`DecodeContext::expect_basic`](crate::engine::DecodeContext::expect_basic).

use alloc::string::ToString;

use bitflags::bitflags;
use sv_value::{Number, Value, ValueKind};

use crate::error::Error;

// -----------------------------------------------------------------------------
// ValidationFlags

bitflags! {
    /// How strictly input is verified while decoding.
    ///
    /// Flags compose independently. The empty set ([`STANDARD`]) performs
    /// only the type-compatibility checks needed to avoid undefined
    /// behavior, nothing more.
    ///
    /// [`STANDARD`]: ValidationFlags::STANDARD
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct ValidationFlags: u8 {
        /// Every key in an input map must be a property of the target type.
        const NO_EXTRA_PROPERTIES = 1 << 0;
        /// Every required property of the target type must be present.
        const ALL_PROPERTIES = 1 << 1;
        /// Basic types must match their expected kind exactly instead of
        /// accepting everything convertible.
        const STRICT_BASIC_TYPES = 1 << 2;

        /// Properties are exactly the ones declared.
        const FULL_PROPERTY_VALIDATION =
            Self::NO_EXTRA_PROPERTIES.bits() | Self::ALL_PROPERTIES.bits();
        /// Everything above.
        const FULL_VALIDATION =
            Self::FULL_PROPERTY_VALIDATION.bits() | Self::STRICT_BASIC_TYPES.bits();
    }
}

impl ValidationFlags {
    /// No extra validation.
    pub const STANDARD: Self = Self::empty();
}

impl Default for ValidationFlags {
    #[inline]
    fn default() -> Self {
        Self::STANDARD
    }
}

// -----------------------------------------------------------------------------
// Basic-type checking

/// Checks a primitive input value against an expected kind, returning the
/// (possibly coerced) value to use.
///
/// Under [`STRICT_BASIC_TYPES`](ValidationFlags::STRICT_BASIC_TYPES) the
/// input kind must match exactly. Otherwise convertible inputs are accepted:
/// numeric representations cross over losslessly, and string-encoded
/// numbers and booleans parse. Anything else is a
/// [`TypeMismatch`](crate::ErrorKind::TypeMismatch).
pub fn basic(input: &Value, expected: ValueKind, flags: ValidationFlags) -> Result<Value, Error> {
    if input.kind() == expected {
        return Ok(input.clone());
    }
    if flags.contains(ValidationFlags::STRICT_BASIC_TYPES) {
        return Err(Error::kind_mismatch(expected, input.kind()));
    }

    let coerced = match (expected, input) {
        (ValueKind::Int, Value::Number(Number::Float(f))) => {
            // Accept only representation changes, not value changes.
            let truncated = *f as i64;
            (truncated as f64 == *f).then(|| Value::from(truncated))
        }
        (ValueKind::Int, Value::Bool(b)) => Some(Value::from(*b as i64)),
        (ValueKind::Int, Value::String(s)) => s.parse::<i64>().ok().map(Value::from),

        (ValueKind::Float, Value::Number(Number::Int(i))) => Some(Value::from(*i as f64)),
        (ValueKind::Float, Value::String(s)) => s.parse::<f64>().ok().map(Value::from),

        (ValueKind::Bool, Value::String(s)) => match s.as_str() {
            "true" => Some(Value::from(true)),
            "false" => Some(Value::from(false)),
            _ => None,
        },
        (ValueKind::Bool, Value::Number(Number::Int(0))) => Some(Value::from(false)),
        (ValueKind::Bool, Value::Number(Number::Int(1))) => Some(Value::from(true)),

        (ValueKind::String, Value::Number(n)) => Some(Value::from(n.to_string())),
        (ValueKind::String, Value::Bool(b)) => Some(Value::from(b.to_string())),

        (ValueKind::BigInt, Value::Number(Number::Int(i))) => {
            Some(Value::from(sv_value::num_bigint::BigInt::from(*i)))
        }
        (ValueKind::BigInt, Value::String(s)) => {
            s.parse::<sv_value::num_bigint::BigInt>().ok().map(Value::from)
        }
        (ValueKind::Int, Value::Number(Number::Big(b))) => {
            i64::try_from(b.clone()).ok().map(Value::from)
        }

        (ValueKind::Bytes, Value::String(s)) => Some(Value::Bytes(s.as_bytes().to_vec())),

        _ => None,
    };

    coerced.ok_or_else(|| Error::kind_mismatch(expected, input.kind()))
}

// -----------------------------------------------------------------------------
// Tests
