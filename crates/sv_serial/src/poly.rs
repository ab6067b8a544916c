//! The polymorphic subtype resolver.
//!
//! Polymorphism is expressed on the wire as a [`Tagged`](sv_value::Value::Tagged)
//! wrapper around an object's encoded body: the tag identifies the concrete
//! runtime type. On encode the tag comes from the type registry; on decode
//! the candidate types for a tag come from the host model, and the resolver
//! disambiguates them against the declared type using the registry's explicit
//! is-assignable-to relation — no language-level inheritance is consulted.

use alloc::format;

use crate::error::Error;
use crate::types::{TypeDescriptor, TypeKey, TypeRegistry};

// -----------------------------------------------------------------------------
// PolymorphMode

/// When subtype discriminator tags are emitted and required.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PolymorphMode {
    /// Never emit a tag; any subtype information in the input is ignored on
    /// decode and the declared type is used verbatim.
    Disabled,
    /// Emit a tag when the declared type is marked polymorphic or the dynamic
    /// type differs from the declared one. A missing tag on decode is
    /// accepted and means "exactly the declared type".
    #[default]
    Enabled,
    /// Always emit a tag; a missing tag on decode is an error.
    Forced,
}

// -----------------------------------------------------------------------------
// PolymorphResolver

/// Decides tag emission on encode and resolves tag candidates on decode.
pub struct PolymorphResolver<'a> {
    types: &'a TypeRegistry,
}

impl<'a> PolymorphResolver<'a> {
    /// Creates a resolver over the given registry.
    #[inline]
    pub const fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// The tag to wrap an encoded object with, or `None` for no tag.
    ///
    /// `dynamic` is the descriptor of the value's concrete runtime type;
    /// `declared` is the static context it is encoded into. A mode that
    /// demands a tag for a type with no registered tag is a conversion
    /// failure — the subtype could never be recovered on decode.
    pub fn encode_tag(
        &self,
        declared: &TypeDescriptor,
        dynamic: &TypeDescriptor,
        mode: PolymorphMode,
    ) -> Result<Option<u64>, Error> {
        let wants_tag = match mode {
            PolymorphMode::Disabled => false,
            PolymorphMode::Enabled => {
                declared.is_polymorphic() || dynamic.key() != declared.key()
            }
            PolymorphMode::Forced => true,
        };
        if !wants_tag {
            return Ok(None);
        }

        match dynamic.tag() {
            Some(tag) => Ok(Some(tag)),
            None => Err(Error::conversion_failed(format!(
                "type `{}` has no subtype tag registered for polymorphic encoding",
                dynamic.name()
            ))),
        }
    }

    /// Resolves the concrete type to decode a tagged value at.
    ///
    /// `candidates` is the host model's answer for the tag. An empty answer
    /// fails with [`InvalidPolymorphicTag`](crate::ErrorKind::InvalidPolymorphicTag);
    /// candidates that exist but are not assignable to the declared type fail
    /// with [`IncompatiblePolymorphicType`](crate::ErrorKind::IncompatiblePolymorphicType).
    /// Among several assignable candidates the most derived one wins.
    pub fn decode_type(
        &self,
        tag: u64,
        declared: &TypeDescriptor,
        candidates: &[TypeKey],
    ) -> Result<TypeKey, Error> {
        if candidates.is_empty() {
            return Err(Error::invalid_tag(tag));
        }

        let mut best: Option<(usize, TypeKey)> = None;
        for &candidate in candidates {
            let Some(depth) = self.types.derivation_depth(candidate, declared.key()) else {
                continue;
            };
            if best.is_none_or(|(d, _)| depth > d) {
                best = Some((depth, candidate));
            }
        }

        match best {
            Some((_, key)) => Ok(key),
            None => Err(Error::incompatible_tag(tag, declared.name())),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
