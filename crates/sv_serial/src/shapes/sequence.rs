use alloc::format;
use alloc::vec::Vec;

use sv_value::{Value, ValueKind};

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// SequenceConverter

/// Converts sequence- and set-like containers to and from arrays.
///
/// Elements encode at the container's declared element type, in iteration
/// order; order is preserved on decode. Decoding into a set type goes through
/// the host's insertion semantics, so duplicate array entries collapse per
/// the set's own equality — accepted information loss, not an error.
pub struct SequenceConverter;

fn element_type(ty: &TypeDescriptor) -> Option<crate::types::TypeKey> {
    match ty.shape() {
        TypeShape::Sequence { element } | TypeShape::Set { element } => Some(*element),
        _ => None,
    }
}

impl<M: ObjectModel> Converter<M> for SequenceConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        element_type(ty).is_some()
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let element = element_type(ty).ok_or_else(|| non_sequence(ty))?;
        let items = ctx.model().sequence_elements(value).ok_or_else(|| {
            Error::conversion_failed(format!(
                "value of type `{}` is not iterable as a sequence",
                ty.name()
            ))
        })?;

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            out.push(ctx.encode_item(index, item, element)?);
        }
        Ok(Value::Array(out))
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let element = element_type(ty).ok_or_else(|| non_sequence(ty))?;
        let Some(items) = input.as_array() else {
            return Err(Error::kind_mismatch(ValueKind::Array, input.kind()));
        };

        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            decoded.push(ctx.decode_item(index, item, element)?);
        }
        ctx.model().build_sequence(ty.key(), decoded).ok_or_else(|| {
            Error::conversion_failed(format!("cannot build a `{}` from elements", ty.name()))
        })
    }
}

fn non_sequence(ty: &TypeDescriptor) -> Error {
    Error::conversion_failed(format!(
        "sequence converter resolved for non-sequence type `{}`",
        ty.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests
