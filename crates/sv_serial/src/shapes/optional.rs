use alloc::format;

use sv_value::Value;

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// OptionalConverter

/// Converts optional wrappers.
///
/// The empty state encodes as null; a present state encodes as the payload
/// itself, with no extra nesting. Decoding null yields the empty state; any
/// other input attempts the payload decode.
pub struct OptionalConverter;

impl<M: ObjectModel> Converter<M> for OptionalConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        matches!(ty.shape(), TypeShape::Optional { .. })
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let &TypeShape::Optional { payload } = ty.shape() else {
            return Err(wrong_shape(ty));
        };
        let state = ctx.model().optional_payload(value).ok_or_else(|| {
            Error::conversion_failed(format!(
                "value of type `{}` has no optional state",
                ty.name()
            ))
        })?;

        match state {
            None => Ok(Value::Null),
            Some(present) => ctx.encode(&present, payload),
        }
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let &TypeShape::Optional { payload } = ty.shape() else {
            return Err(wrong_shape(ty));
        };

        let decoded = match input {
            Value::Null => None,
            _ => Some(ctx.decode(input, payload)?),
        };
        ctx.model().build_optional(ty.key(), decoded).ok_or_else(|| {
            Error::conversion_failed(format!("cannot build a `{}`", ty.name()))
        })
    }
}

fn wrong_shape(ty: &TypeDescriptor) -> Error {
    Error::conversion_failed(format!(
        "optional converter resolved for non-optional type `{}`",
        ty.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use sv_value::Value;

    use crate::testing::{Fixture, Host, TY_INT};
    use crate::types::TypeKey;

    const TY_OPT: TypeKey = TypeKey::new(24);

    fn fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.types.register_optional(TY_OPT, "Option<i64>", TY_INT);
        fixture
    }

    #[test]
    fn empty_state_encodes_as_null() {
        let fixture = fixture();
        let serializer = fixture.serializer();
        let empty = Host::Opt {
            ty: TY_OPT,
            payload: None,
        };

        let encoded = serializer.encode(&empty, TY_OPT).unwrap();
        assert_eq!(encoded, Value::Null);
        assert_eq!(serializer.decode(&encoded, TY_OPT).unwrap(), empty);
    }

    #[test]
    fn present_state_encodes_as_the_payload() {
        let fixture = fixture();
        let serializer = fixture.serializer();
        let present = Host::Opt {
            ty: TY_OPT,
            payload: Some(Box::new(Host::Int(5))),
        };

        let encoded = serializer.encode(&present, TY_OPT).unwrap();
        assert_eq!(encoded, Value::from(5));
        assert_eq!(serializer.decode(&encoded, TY_OPT).unwrap(), present);
    }
}
