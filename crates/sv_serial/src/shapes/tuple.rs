use alloc::format;
use alloc::vec::Vec;

use sv_value::{Value, ValueKind};

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeKey, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// TupleConverter

/// Converts pairs and fixed-arity tuples to and from fixed-length arrays.
///
/// Decoding fails with a type mismatch when the input array length differs
/// from the declared arity.
pub struct TupleConverter;

fn field_types(ty: &TypeDescriptor) -> Option<Vec<TypeKey>> {
    match ty.shape() {
        TypeShape::Pair { first, second } => Some(alloc::vec![*first, *second]),
        TypeShape::Tuple { fields } => Some(fields.clone()),
        _ => None,
    }
}

impl<M: ObjectModel> Converter<M> for TupleConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        matches!(ty.shape(), TypeShape::Pair { .. } | TypeShape::Tuple { .. })
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let field_tys = field_types(ty).ok_or_else(|| wrong_shape(ty))?;
        let fields = ctx.model().tuple_fields(value).ok_or_else(|| {
            Error::conversion_failed(format!("value of type `{}` has no tuple fields", ty.name()))
        })?;
        if fields.len() != field_tys.len() {
            return Err(Error::conversion_failed(format!(
                "value of type `{}` has {} fields, expected {}",
                ty.name(),
                fields.len(),
                field_tys.len()
            )));
        }

        let mut out = Vec::with_capacity(fields.len());
        for (index, (field, &field_ty)) in fields.iter().zip(&field_tys).enumerate() {
            out.push(ctx.encode_item(index, field, field_ty)?);
        }
        Ok(Value::Array(out))
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let field_tys = field_types(ty).ok_or_else(|| wrong_shape(ty))?;
        let Some(items) = input.as_array() else {
            return Err(Error::kind_mismatch(ValueKind::Array, input.kind()));
        };
        if items.len() != field_tys.len() {
            return Err(Error::type_mismatch(
                format!("array of length {}", field_tys.len()),
                input.kind(),
            ));
        }

        let mut decoded = Vec::with_capacity(items.len());
        for (index, (item, &field_ty)) in items.iter().zip(&field_tys).enumerate() {
            decoded.push(ctx.decode_item(index, item, field_ty)?);
        }
        ctx.model().build_tuple(ty.key(), decoded).ok_or_else(|| {
            Error::conversion_failed(format!("cannot build a `{}` from fields", ty.name()))
        })
    }
}

fn wrong_shape(ty: &TypeDescriptor) -> Error {
    Error::conversion_failed(format!(
        "tuple converter resolved for non-tuple type `{}`",
        ty.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests
