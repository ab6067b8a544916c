use alloc::format;

use sv_value::Value;

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeKey, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// VariantConverter

/// Converts discriminated unions.
///
/// By default the held alternative encodes as itself, with no marker, and
/// decoding tries each alternative's declared type in declaration order,
/// accepting the first that decodes cleanly. That linear search is ambiguous
/// when two alternatives can decode the same shape; declaration order then
/// decides, which is preserved for compatibility. The opt-in
/// [`variant_discriminator`](crate::SerializerConfig::variant_discriminator)
/// setting instead wraps the payload in a tag carrying the alternative index,
/// and uses the tag on decode when present.
pub struct VariantConverter;

fn alternatives(ty: &TypeDescriptor) -> Option<&[TypeKey]> {
    match ty.shape() {
        TypeShape::Variant { alternatives } => Some(alternatives),
        _ => None,
    }
}

impl<M: ObjectModel> Converter<M> for VariantConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        alternatives(ty).is_some()
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let alts = alternatives(ty).ok_or_else(|| wrong_shape(ty))?;
        let (arm, payload) = ctx.model().variant_arm(value).ok_or_else(|| {
            Error::conversion_failed(format!(
                "value of type `{}` holds no variant alternative",
                ty.name()
            ))
        })?;
        let Some(&alternative) = alts.get(arm) else {
            return Err(Error::conversion_failed(format!(
                "alternative index {arm} is out of range for `{}`",
                ty.name()
            )));
        };

        let encoded = ctx.encode(&payload, alternative)?;
        Ok(if ctx.config().variant_discriminator {
            encoded.tagged(arm as u64)
        } else {
            encoded
        })
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let alts = alternatives(ty).ok_or_else(|| wrong_shape(ty))?;

        // An explicit discriminator removes the ambiguity of the linear
        // search; untagged input still falls back to first-match for
        // compatibility with data written without it.
        if ctx.config().variant_discriminator
            && let Value::Tagged(tag, payload) = input
        {
            let arm = usize::try_from(*tag).ok().filter(|a| *a < alts.len());
            let Some(arm) = arm else {
                return Err(Error::conversion_failed(format!(
                    "variant discriminator {tag} is out of range for `{}`",
                    ty.name()
                )));
            };
            let decoded = ctx.decode(payload, alts[arm])?;
            return build(ctx.model(), ty, arm, decoded);
        }

        for (arm, &alternative) in alts.iter().enumerate() {
            match ctx.decode(input, alternative) {
                Ok(decoded) => return build(ctx.model(), ty, arm, decoded),
                Err(_) => continue,
            }
        }
        Err(Error::conversion_failed(format!(
            "no alternative of `{}` accepts the input",
            ty.name()
        )))
    }
}

fn build<M: ObjectModel>(
    model: &M,
    ty: &TypeDescriptor,
    arm: usize,
    payload: M::Value,
) -> Result<M::Value, Error> {
    model.build_variant(ty.key(), arm, payload).ok_or_else(|| {
        Error::conversion_failed(format!("cannot build a `{}`", ty.name()))
    })
}

fn wrong_shape(ty: &TypeDescriptor) -> Error {
    Error::conversion_failed(format!(
        "variant converter resolved for non-variant type `{}`",
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

    use crate::ErrorKind;
    use crate::testing::{Fixture, Host, TY_INT, TY_STR};
    use crate::types::TypeKey;
    use crate::validate::ValidationFlags;

    const TY_VAR: TypeKey = TypeKey::new(25);

    fn fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture
            .types
            .register_variant(TY_VAR, "Either<i64, String>", &[TY_INT, TY_STR]);
        fixture
    }

    fn holding(arm: usize, payload: Host) -> Host {
        Host::Var {
            ty: TY_VAR,
            arm,
            payload: Box::new(payload),
        }
    }

    #[test]
    fn encodes_the_held_alternative_without_a_marker() {
        let fixture = fixture();
        let serializer = fixture.serializer();

        let encoded = serializer.encode(&holding(1, Host::str("hi")), TY_VAR).unwrap();
        assert_eq!(encoded, Value::from("hi"));
    }

    #[test]
    fn decode_is_first_match_in_declaration_order() {
        let fixture = fixture();
        let serializer = fixture.serializer();

        // Under standard validation the string parses as an integer, so the
        // earlier alternative wins even though the later one matches exactly.
        let decoded = serializer.decode(&Value::from("7"), TY_VAR).unwrap();
        assert_eq!(decoded, holding(0, Host::Int(7)));
    }

    #[test]
    fn strictness_changes_which_alternative_accepts() {
        let fixture = fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().validation = ValidationFlags::STRICT_BASIC_TYPES;

        let decoded = serializer.decode(&Value::from("7"), TY_VAR).unwrap();
        assert_eq!(decoded, holding(1, Host::str("7")));
    }

    #[test]
    fn input_matching_no_alternative_fails() {
        let fixture = fixture();
        let serializer = fixture.serializer();

        let err = serializer.decode(&Value::Array(vec![]), TY_VAR).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ConversionFailed { .. }));
    }

    #[test]
    fn explicit_discriminator_selects_the_tagged_alternative() {
        let fixture = fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().variant_discriminator = true;

        let encoded = serializer.encode(&holding(1, Host::str("7")), TY_VAR).unwrap();
        assert_eq!(encoded, Value::from("7").tagged(1));

        // With the tag present, the ambiguous "7" goes to alternative 1 even
        // though alternative 0 would also accept it.
        let decoded = serializer.decode(&encoded, TY_VAR).unwrap();
        assert_eq!(decoded, holding(1, Host::str("7")));
    }
}
