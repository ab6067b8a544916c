use alloc::borrow::Cow;
use alloc::string::String;
use core::{error, fmt};

use sv_value::ValueKind;

use crate::types::TypeKey;

// -----------------------------------------------------------------------------
// ErrorKind

/// An enumeration of all error outcomes of an encode or decode call.
///
/// Every decode-time kind is a deterministic function of the input tree, the
/// declared type and the serializer configuration; no partial value is ever
/// returned alongside an error.
#[derive(Debug)]
pub enum ErrorKind {
    /// No converter resolved for a declared type.
    UnsupportedType { ty: TypeKey },
    /// The input value's kind is incompatible with the declared type, or a
    /// strict basic-type check failed.
    TypeMismatch {
        expected: Cow<'static, str>,
        found: ValueKind,
    },
    /// A required property of the target type was absent from the input map.
    MissingProperty { name: String },
    /// The input map carried a key that is not a property of the target type.
    UnknownProperty { name: String },
    /// A subtype tag with no registered candidate types.
    InvalidPolymorphicTag { tag: u64 },
    /// A subtype tag whose candidates exist, but none is assignable to the
    /// declared type.
    IncompatiblePolymorphicType { tag: u64, declared: String },
    /// A converter's internal transform failed.
    ConversionFailed { message: Cow<'static, str> },
}

// -----------------------------------------------------------------------------
// Error

/// A conversion failure, carrying the [`ErrorKind`] and a trace hint.
///
/// The trace hint is a human-readable property/index path into the value tree
/// (for example `friends[2].address.city`). It is attached while the failure
/// unwinds through the engine and is purely diagnostic; it never affects
/// control flow.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    trace: Option<String>,
}

impl Error {
    /// Creates an error with no trace hint.
    #[inline]
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind, trace: None }
    }

    /// The failure kind.
    #[inline]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The trace hint, if the error has unwound through an engine context.
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Attaches a trace hint unless one is already present.
    ///
    /// The innermost context frame sees the deepest path, so first write wins.
    pub fn with_trace(mut self, trace: String) -> Self {
        if self.trace.is_none() && !trace.is_empty() {
            self.trace = Some(trace);
        }
        self
    }

    /// A [`ErrorKind::UnsupportedType`] error.
    #[inline]
    pub const fn unsupported_type(ty: TypeKey) -> Self {
        Self::new(ErrorKind::UnsupportedType { ty })
    }

    /// A [`ErrorKind::TypeMismatch`] error with a free-form expectation.
    pub fn type_mismatch(expected: impl Into<Cow<'static, str>>, found: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            found,
        })
    }

    /// A [`ErrorKind::TypeMismatch`] error expecting an exact value kind.
    pub fn kind_mismatch(expected: ValueKind, found: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: Cow::Owned(alloc::format!("{expected} value")),
            found,
        })
    }

    /// A [`ErrorKind::MissingProperty`] error.
    pub fn missing_property(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingProperty { name: name.into() })
    }

    /// A [`ErrorKind::UnknownProperty`] error.
    pub fn unknown_property(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownProperty { name: name.into() })
    }

    /// An [`ErrorKind::InvalidPolymorphicTag`] error.
    #[inline]
    pub const fn invalid_tag(tag: u64) -> Self {
        Self::new(ErrorKind::InvalidPolymorphicTag { tag })
    }

    /// An [`ErrorKind::IncompatiblePolymorphicType`] error.
    pub fn incompatible_tag(tag: u64, declared: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompatiblePolymorphicType {
            tag,
            declared: declared.into(),
        })
    }

    /// A [`ErrorKind::ConversionFailed`] error.
    pub fn conversion_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ConversionFailed {
            message: message.into(),
        })
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnsupportedType { ty } => {
                write!(f, "no converter is registered for type {ty}")
            }
            ErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found} value")
            }
            ErrorKind::MissingProperty { name } => {
                write!(f, "required property `{name}` is missing from the input")
            }
            ErrorKind::UnknownProperty { name } => {
                write!(f, "input property `{name}` does not exist on the target type")
            }
            ErrorKind::InvalidPolymorphicTag { tag } => {
                write!(f, "subtype tag {tag} has no registered candidate types")
            }
            ErrorKind::IncompatiblePolymorphicType { tag, declared } => {
                write!(
                    f,
                    "no candidate for subtype tag {tag} is assignable to `{declared}`"
                )
            }
            ErrorKind::ConversionFailed { message } => f.write_str(message),
        }?;

        if let Some(trace) = &self.trace {
            write!(f, " (at {trace})")?;
        }
        Ok(())
    }
}

impl error::Error for Error {}

// -----------------------------------------------------------------------------
// Tests
