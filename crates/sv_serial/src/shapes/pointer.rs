use alloc::format;

use sv_value::Value;

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// PointerConverter

/// Converts shared and weak ownership wrappers.
///
/// The conversion delegates entirely to the target type's converter. A null
/// pointer — or a weak reference whose target is gone — encodes as null,
/// which is documented information loss and never an error; null decodes back
/// into the wrapper's empty state.
pub struct PointerConverter;

impl<M: ObjectModel> Converter<M> for PointerConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        ty.is_pointer_like()
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let &TypeShape::Pointer { target, .. } = ty.shape() else {
            return Err(wrong_shape(ty));
        };
        let referent = ctx.model().pointer_target(value).ok_or_else(|| {
            Error::conversion_failed(format!(
                "value of type `{}` has no pointer state",
                ty.name()
            ))
        })?;

        match referent {
            None => Ok(Value::Null),
            Some(present) => ctx.encode(&present, target),
        }
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let &TypeShape::Pointer { target, .. } = ty.shape() else {
            return Err(wrong_shape(ty));
        };

        let decoded = match input {
            Value::Null => None,
            _ => Some(ctx.decode(input, target)?),
        };
        ctx.model().build_pointer(ty.key(), decoded).ok_or_else(|| {
            Error::conversion_failed(format!("cannot build a `{}`", ty.name()))
        })
    }
}

fn wrong_shape(ty: &TypeDescriptor) -> Error {
    Error::conversion_failed(format!(
        "pointer converter resolved for non-pointer type `{}`",
        ty.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use sv_value::Value;

    use crate::model::PropertySpec;
    use crate::testing::{FakeModel, Fixture, Host, TY_STR};
    use crate::types::TypeKey;

    const TY_NODE: TypeKey = TypeKey::new(28);
    const TY_SHARED: TypeKey = TypeKey::new(29);
    const TY_WEAK: TypeKey = TypeKey::new(31);

    fn fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.types.register_object(TY_NODE, "Node", &[]);
        fixture
            .types
            .register_pointer(TY_SHARED, "Arc<Node>", TY_NODE, false);
        fixture
            .types
            .register_pointer(TY_WEAK, "Weak<Node>", TY_NODE, true);
        fixture.model =
            FakeModel::default().with_object(TY_NODE, vec![PropertySpec::new("name", TY_STR)]);
        fixture
    }

    #[test]
    fn live_pointer_delegates_to_the_target_converter() {
        let fixture = fixture();
        let serializer = fixture.serializer();
        let pointer = Host::Ptr {
            ty: TY_SHARED,
            target: Some(Box::new(Host::obj(TY_NODE, &[("name", Host::str("n"))]))),
        };

        let encoded = serializer.encode(&pointer, TY_SHARED).unwrap();
        assert_eq!(
            encoded,
            Value::Map(vec![("name".into(), Value::from("n"))])
        );
        assert_eq!(serializer.decode(&encoded, TY_SHARED).unwrap(), pointer);
    }

    #[test]
    fn dead_weak_reference_encodes_as_null_without_error() {
        let fixture = fixture();
        let serializer = fixture.serializer();
        let dangling = Host::Ptr {
            ty: TY_WEAK,
            target: None,
        };

        let encoded = serializer.encode(&dangling, TY_WEAK).unwrap();
        assert_eq!(encoded, Value::Null);
        assert_eq!(serializer.decode(&encoded, TY_WEAK).unwrap(), dangling);
    }
}
