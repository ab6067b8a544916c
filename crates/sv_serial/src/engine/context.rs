use alloc::string::String;

use sv_value::{Value, ValueKind};

use crate::config::SerializerConfig;
use crate::convert::Direction;
use crate::engine::trace::{TracePath, TraceSegment};
use crate::engine::Serializer;
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeKey, TypeRegistry};
use crate::validate;

// -----------------------------------------------------------------------------
// EncodeContext

/// The bridge a converter uses to recurse during encoding.
///
/// A context is a per-call, stack-scoped object: the engine creates one at
/// the top of [`Serializer::encode`] and threads it through the recursive
/// descent. Besides recursion it gives converters access to the registries,
/// the host model, the configuration and the current [`TracePath`].
pub struct EncodeContext<'s, 'r, M: ObjectModel> {
    engine: &'s Serializer<'r, M>,
    trace: TracePath,
}

impl<'s, 'r, M: ObjectModel> EncodeContext<'s, 'r, M> {
    pub(crate) fn new(engine: &'s Serializer<'r, M>) -> Self {
        Self {
            engine,
            trace: TracePath::new(),
        }
    }

    /// The type registry.
    #[inline]
    pub fn types(&self) -> &'r TypeRegistry {
        self.engine.types()
    }

    /// The host object model.
    #[inline]
    pub fn model(&self) -> &'r M {
        self.engine.model()
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &'s SerializerConfig {
        self.engine.config()
    }

    /// The current trace path.
    #[inline]
    pub fn trace(&self) -> &TracePath {
        &self.trace
    }

    /// The canonical (de-aliased) name of a type.
    ///
    /// Consults the type registry first and falls back to the host model for
    /// unregistered builtins.
    pub fn type_name(&self, ty: TypeKey) -> String {
        type_name(self.engine, ty)
    }

    /// Encodes a sub-value at a declared type, without a new trace segment.
    pub fn encode(&mut self, value: &M::Value, declared: TypeKey) -> Result<Value, Error> {
        let result = self.encode_inner(value, declared);
        result.map_err(|e| e.with_trace(self.trace.render()))
    }

    /// Encodes an object property.
    pub fn encode_field(
        &mut self,
        name: &str,
        value: &M::Value,
        declared: TypeKey,
    ) -> Result<Value, Error> {
        self.trace.push(TraceSegment::Field(String::from(name)));
        let result = self.encode(value, declared);
        self.trace.pop();
        result
    }

    /// Encodes a container or tuple element.
    pub fn encode_item(
        &mut self,
        index: usize,
        value: &M::Value,
        declared: TypeKey,
    ) -> Result<Value, Error> {
        self.trace.push(TraceSegment::Index(index));
        let result = self.encode(value, declared);
        self.trace.pop();
        result
    }

    /// Encodes a map entry value.
    pub fn encode_key(
        &mut self,
        key: &str,
        value: &M::Value,
        declared: TypeKey,
    ) -> Result<Value, Error> {
        self.trace.push(TraceSegment::Key(String::from(key)));
        let result = self.encode(value, declared);
        self.trace.pop();
        result
    }

    fn encode_inner(&mut self, value: &M::Value, declared: TypeKey) -> Result<Value, Error> {
        let Some(descriptor) = self.engine.types().get(declared) else {
            return Err(Error::unsupported_type(declared));
        };
        let Some(converter) = self.engine.resolve(descriptor, Direction::Encode) else {
            return Err(Error::unsupported_type(declared));
        };
        converter.encode(value, descriptor, self)
    }
}

// -----------------------------------------------------------------------------
// DecodeContext

/// The bridge a converter uses to recurse during decoding.
///
/// The mirror of [`EncodeContext`], with the decode-side additions: the
/// engine-level null policy and the basic-type validation helper.
pub struct DecodeContext<'s, 'r, M: ObjectModel> {
    engine: &'s Serializer<'r, M>,
    trace: TracePath,
}

impl<'s, 'r, M: ObjectModel> DecodeContext<'s, 'r, M> {
    pub(crate) fn new(engine: &'s Serializer<'r, M>) -> Self {
        Self {
            engine,
            trace: TracePath::new(),
        }
    }

    /// The type registry.
    #[inline]
    pub fn types(&self) -> &'r TypeRegistry {
        self.engine.types()
    }

    /// The host object model.
    #[inline]
    pub fn model(&self) -> &'r M {
        self.engine.model()
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &'s SerializerConfig {
        self.engine.config()
    }

    /// The current trace path.
    #[inline]
    pub fn trace(&self) -> &TracePath {
        &self.trace
    }

    /// The canonical (de-aliased) name of a type.
    pub fn type_name(&self, ty: TypeKey) -> String {
        type_name(self.engine, ty)
    }

    /// Checks a basic (primitive) input value against an expected kind under
    /// the configured strictness, returning the possibly coerced value.
    ///
    /// Primitive converters call this instead of matching kinds themselves so
    /// that [`StrictBasicTypes`](crate::validate::ValidationFlags::STRICT_BASIC_TYPES)
    /// applies uniformly.
    pub fn expect_basic(&self, input: &Value, expected: ValueKind) -> Result<Value, Error> {
        validate::basic(input, expected, self.config().validation)
    }

    /// Decodes a sub-value at a declared type, without a new trace segment.
    pub fn decode(&mut self, input: &Value, declared: TypeKey) -> Result<M::Value, Error> {
        let result = self.decode_inner(input, declared);
        result.map_err(|e| e.with_trace(self.trace.render()))
    }

    /// Decodes an object property.
    pub fn decode_field(
        &mut self,
        name: &str,
        input: &Value,
        declared: TypeKey,
    ) -> Result<M::Value, Error> {
        self.trace.push(TraceSegment::Field(String::from(name)));
        let result = self.decode(input, declared);
        self.trace.pop();
        result
    }

    /// Decodes a container or tuple element.
    pub fn decode_item(
        &mut self,
        index: usize,
        input: &Value,
        declared: TypeKey,
    ) -> Result<M::Value, Error> {
        self.trace.push(TraceSegment::Index(index));
        let result = self.decode(input, declared);
        self.trace.pop();
        result
    }

    /// Decodes a map entry value.
    pub fn decode_key(
        &mut self,
        key: &str,
        input: &Value,
        declared: TypeKey,
    ) -> Result<M::Value, Error> {
        self.trace.push(TraceSegment::Key(String::from(key)));
        let result = self.decode(input, declared);
        self.trace.pop();
        result
    }

    fn decode_inner(&mut self, input: &Value, declared: TypeKey) -> Result<M::Value, Error> {
        let Some(descriptor) = self.engine.types().get(declared) else {
            return Err(Error::unsupported_type(declared));
        };

        // Null into a non-wrapper type never reaches a converter: it either
        // becomes the type's default instance or is rejected here.
        if input.is_null() && !descriptor.is_optional_like() && !descriptor.is_pointer_like() {
            return if self.config().allow_null_for_value_types {
                self.engine.model().instantiate(declared).ok_or_else(|| {
                    Error::conversion_failed(alloc::format!(
                        "type `{}` has no default instance",
                        self.type_name(declared)
                    ))
                })
            } else {
                Err(Error::type_mismatch(
                    alloc::format!("non-null value for `{}`", self.type_name(declared)),
                    ValueKind::Null,
                ))
            };
        }

        let Some(converter) = self.engine.resolve(descriptor, Direction::Decode) else {
            return Err(Error::unsupported_type(declared));
        };
        converter.decode(input, descriptor, self)
    }
}

// -----------------------------------------------------------------------------

fn type_name<M: ObjectModel>(engine: &Serializer<'_, M>, ty: TypeKey) -> String {
    match engine.types().canonical_name(ty) {
        Some(name) => String::from(name),
        None => match engine.model().canonical_name(ty) {
            Some(name) => name,
            None => alloc::format!("{ty}"),
        },
    }
}
