use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use num_bigint::BigInt;

use crate::Number;

// -----------------------------------------------------------------------------
// Value

/// A generic tree-structured interchange value.
///
/// This is the common currency of the conversion pipeline: converters produce
/// and consume `Value` trees, and an external format crate turns finished
/// trees into bytes. The data model is JSON/CBOR-like:
///
/// - [`Map`](Value::Map) entries keep their **encounter order**; duplicate
///   keys are representable (multi-map encodings rely on this not being
///   collapsed by the data model).
/// - [`Tagged`](Value::Tagged) wraps any payload, including another tagged
///   value. Tags carry small integer discriminators, used among other things
///   for polymorphic subtype markers.
///
/// `Value` is a pure data model; it has no conversion behavior of its own.
///
/// # Examples
///
/// ```
/// use sv_value::Value;
///
/// let value = Value::Map(vec![
///     ("id".into(), Value::from(7)),
///     ("name".into(), Value::from("sv")),
/// ]);
///
/// assert_eq!(value.get("id"), Some(&Value::from(7)));
/// assert_eq!(value.get("missing"), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, see [`Number`].
    Number(Number),
    /// A UTF-8 string.
    String(String),
    /// A byte string.
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An ordered sequence of key/value pairs.
    ///
    /// Key order is the encounter order and is preserved through the
    /// pipeline. Lookup helpers return the first entry for a key.
    Map(Vec<(String, Value)>),
    /// A payload wrapped with an integer discriminator.
    Tagged(u64, Box<Value>),
}

impl Value {
    /// Returns the [`ValueKind`] of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(Number::Int(_)) => ValueKind::Int,
            Self::Number(Number::Float(_)) => ValueKind::Float,
            Self::Number(Number::Big(_)) => ValueKind::BigInt,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
            Self::Tagged(..) => ValueKind::Tagged,
        }
    }

    /// Whether this value is [`Null`](Value::Null).
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this value is a `Bool`.
    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number, if this value is a `Number`.
    #[inline]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer, if this value is an integer `Number`.
    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_int(),
            _ => None,
        }
    }

    /// Returns the float, if this value is a float `Number`.
    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_float(),
            _ => None,
        }
    }

    /// Returns the string slice, if this value is a `String`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the byte slice, if this value is a `Bytes`.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements, if this value is an `Array`.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this value is a `Map`.
    #[inline]
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the tag and payload, if this value is `Tagged`.
    #[inline]
    pub fn as_tagged(&self) -> Option<(u64, &Value)> {
        match self {
            Self::Tagged(tag, payload) => Some((*tag, payload)),
            _ => None,
        }
    }

    /// Returns the value of the first map entry with the given key.
    ///
    /// Returns `None` for non-map values as well as for missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Wraps this value with the given tag.
    #[inline]
    pub fn tagged(self, tag: u64) -> Self {
        Self::Tagged(tag, Box::new(self))
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Number(Number::Int(value as i64))
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Number(Number::Int(value))
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Number(Number::Float(value))
    }
}

impl From<BigInt> for Value {
    #[inline]
    fn from(value: BigInt) -> Self {
        Self::Number(Number::Big(value))
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Number> for Value {
    #[inline]
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// The coarse kind of a [`Value`], used in validation and error reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    BigInt,
    String,
    Bytes,
    Array,
    Map,
    Tagged,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Float => "float",
            Self::BigInt => "big integer",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tagged => "tagged",
        };
        f.write_str(name)
    }
}

// -----------------------------------------------------------------------------
// Tests
