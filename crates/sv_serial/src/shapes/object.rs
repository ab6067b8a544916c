use alloc::format;
use alloc::vec::Vec;

use sv_value::{Value, ValueKind};

use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::poly::{PolymorphMode, PolymorphResolver};
use crate::types::{TypeDescriptor, TypeRegistry};
use crate::validate::ValidationFlags;

// -----------------------------------------------------------------------------
// ObjectConverter

/// Converts property-bag objects to and from maps.
///
/// This is where the polymorphism resolver and the validation engine hook
/// into the traversal:
///
/// - On encode, the resolver decides whether the body is wrapped in a
///   [`Tagged`](Value::Tagged) subtype marker, and the property set comes
///   from the value's dynamic type when polymorphism applies.
/// - On decode, a tagged input resolves to a concrete target type (or is
///   stripped and ignored when polymorphism is disabled), and the configured
///   [`ValidationFlags`] run against the input map before and while
///   properties are written back.
pub struct ObjectConverter;

impl<M: ObjectModel> Converter<M> for ObjectConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        ty.is_object_like()
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let model = ctx.model();
        let mode = ctx.config().polymorphing;
        let keep_object_name = ctx.config().keep_host_object_name;
        let ignore_stored = ctx.config().ignore_stored_attribute;

        // Disabled polymorphism serializes the declared type verbatim and
        // never looks at the dynamic type.
        let (tag, effective) = match mode {
            PolymorphMode::Disabled => (None, ty),
            _ => {
                let dynamic_key = model.dynamic_type(value);
                let dynamic = if dynamic_key == ty.key() {
                    ty
                } else {
                    ctx.types()
                        .get(dynamic_key)
                        .ok_or(Error::unsupported_type(dynamic_key))?
                };
                let tag = PolymorphResolver::new(ctx.types()).encode_tag(ty, dynamic, mode)?;
                (tag, dynamic)
            }
        };
        let props = model.properties(effective.key()).ok_or_else(|| {
            Error::conversion_failed(format!(
                "type `{}` exposes no property information",
                effective.name()
            ))
        })?;

        let mut entries = Vec::with_capacity(props.len());
        for prop in &props {
            if prop.object_name && !keep_object_name {
                continue;
            }
            if !prop.stored && !ignore_stored {
                continue;
            }
            let field = model.read_property(value, &prop.name).ok_or_else(|| {
                Error::conversion_failed(format!(
                    "property `{}` of `{}` is not readable",
                    prop.name,
                    effective.name()
                ))
            })?;
            let encoded = ctx.encode_field(&prop.name, &field, prop.declared)?;
            entries.push((prop.name.clone(), encoded));
        }

        let body = Value::Map(entries);
        Ok(match tag {
            Some(tag) => body.tagged(tag),
            None => body,
        })
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let model = ctx.model();
        let mode = ctx.config().polymorphing;
        let flags = ctx.config().validation;
        let keep_object_name = ctx.config().keep_host_object_name;
        let ignore_stored = ctx.config().ignore_stored_attribute;

        let (target_key, body) = match input {
            Value::Tagged(tag, payload) => match mode {
                // Subtype information in the input is ignored outright.
                PolymorphMode::Disabled => (ty.key(), payload.as_ref()),
                _ => {
                    let candidates = model.types_for_tag(*tag);
                    let target =
                        PolymorphResolver::new(ctx.types()).decode_type(*tag, ty, &candidates)?;
                    (target, payload.as_ref())
                }
            },
            _ if mode == PolymorphMode::Forced => {
                return Err(Error::type_mismatch(
                    "tagged value carrying a subtype marker",
                    input.kind(),
                ));
            }
            _ => (ty.key(), input),
        };

        let Some(entries) = body.as_map() else {
            return Err(Error::kind_mismatch(ValueKind::Map, body.kind()));
        };

        let target = if target_key == ty.key() {
            ty
        } else {
            ctx.types()
                .get(target_key)
                .ok_or(Error::unsupported_type(target_key))?
        };
        let props = model.properties(target_key).ok_or_else(|| {
            Error::conversion_failed(format!(
                "type `{}` exposes no property information",
                target.name()
            ))
        })?;

        if flags.contains(ValidationFlags::NO_EXTRA_PROPERTIES) {
            for (key, _) in entries {
                if !props.iter().any(|p| p.name == *key) {
                    return Err(Error::unknown_property(key.clone()));
                }
            }
        }

        let mut object = model.instantiate(target_key).ok_or_else(|| {
            Error::conversion_failed(format!("cannot instantiate type `{}`", target.name()))
        })?;

        for prop in &props {
            if prop.object_name && !keep_object_name {
                continue;
            }
            match body.get(&prop.name) {
                Some(field) => {
                    if flags.contains(ValidationFlags::STRICT_BASIC_TYPES)
                        && let Some(kind) = prop.kind
                        && !field.is_null()
                        && field.kind() != kind
                    {
                        return Err(Error::kind_mismatch(kind, field.kind()));
                    }
                    let decoded = ctx.decode_field(&prop.name, field, prop.declared)?;
                    if !model.write_property(&mut object, &prop.name, decoded) {
                        return Err(Error::conversion_failed(format!(
                            "property `{}` of `{}` rejected the decoded value",
                            prop.name,
                            target.name()
                        )));
                    }
                }
                None => {
                    let participates = prop.stored || ignore_stored;
                    if flags.contains(ValidationFlags::ALL_PROPERTIES)
                        && prop.required
                        && participates
                    {
                        return Err(Error::missing_property(prop.name.clone()));
                    }
                }
            }
        }

        Ok(object)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;

    use sv_value::{Value, ValueKind};

    use crate::ErrorKind;
    use crate::model::PropertySpec;
    use crate::poly::PolymorphMode;
    use crate::testing::{FakeModel, Fixture, Host, TY_INT, TY_STR};
    use crate::types::{TypeDescriptor, TypeKey, TypeShape};
    use crate::validate::ValidationFlags;

    const TY_USER: TypeKey = TypeKey::new(40);

    fn user_fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.types.register_object(TY_USER, "User", &[]);
        fixture.model = FakeModel::default().with_object(
            TY_USER,
            vec![
                PropertySpec::new("name", TY_STR).with_kind(ValueKind::String),
                PropertySpec::new("age", TY_INT).with_kind(ValueKind::Int),
            ],
        );
        fixture
    }

    fn user(name: &str, age: i64) -> Host {
        Host::obj(TY_USER, &[("name", Host::str(name)), ("age", Host::Int(age))])
    }

    #[test]
    fn object_round_trip() {
        let fixture = user_fixture();
        let serializer = fixture.serializer();

        let encoded = serializer.encode(&user("bo", 7), TY_USER).unwrap();
        assert_eq!(
            encoded,
            Value::Map(vec![
                ("name".into(), Value::from("bo")),
                ("age".into(), Value::from(7)),
            ])
        );
        assert_eq!(serializer.decode(&encoded, TY_USER).unwrap(), user("bo", 7));
    }

    #[test]
    fn missing_required_property_fails_under_all_properties() {
        let fixture = user_fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().validation = ValidationFlags::ALL_PROPERTIES;

        let input = Value::Map(vec![("name".into(), Value::from("bo"))]);
        let err = serializer.decode(&input, TY_USER).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::MissingProperty { name } if name == "age")
        );

        // Standard validation accepts the partial object.
        serializer.config_mut().validation = ValidationFlags::STANDARD;
        assert!(serializer.decode(&input, TY_USER).is_ok());
    }

    #[test]
    fn extra_input_property_fails_under_no_extra_properties() {
        let fixture = user_fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().validation = ValidationFlags::NO_EXTRA_PROPERTIES;

        let input = Value::Map(vec![
            ("name".into(), Value::from("bo")),
            ("age".into(), Value::from(7)),
            ("shoe_size".into(), Value::from(43)),
        ]);
        let err = serializer.decode(&input, TY_USER).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::UnknownProperty { name } if name == "shoe_size")
        );

        serializer.config_mut().validation = ValidationFlags::STANDARD;
        assert_eq!(serializer.decode(&input, TY_USER).unwrap(), user("bo", 7));
    }

    #[test]
    fn strict_basic_types_rejects_convertible_property_values() {
        let fixture = user_fixture();
        let mut serializer = fixture.serializer();

        let input = Value::Map(vec![
            ("name".into(), Value::from("bo")),
            ("age".into(), Value::from("7")),
        ]);

        // Convertible under standard validation.
        assert_eq!(serializer.decode(&input, TY_USER).unwrap(), user("bo", 7));

        serializer.config_mut().validation = ValidationFlags::STRICT_BASIC_TYPES;
        let err = serializer.decode(&input, TY_USER).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch {
                found: ValueKind::String,
                ..
            }
        ));
    }

    #[test]
    fn non_stored_properties_are_skipped_unless_ignored() {
        let mut fixture = Fixture::new();
        fixture.types.register_object(TY_USER, "User", &[]);
        fixture.model = FakeModel::default().with_object(
            TY_USER,
            vec![
                PropertySpec::new("name", TY_STR),
                PropertySpec::new("cache", TY_INT).not_stored(),
            ],
        );
        let mut serializer = fixture.serializer();

        let value = Host::obj(
            TY_USER,
            &[("name", Host::str("bo")), ("cache", Host::Int(1))],
        );
        let encoded = serializer.encode(&value, TY_USER).unwrap();
        assert_eq!(encoded.get("cache"), None);

        // Not required either while skipped.
        serializer.config_mut().validation = ValidationFlags::ALL_PROPERTIES;
        assert!(serializer.decode(&encoded, TY_USER).is_ok());

        // Ignoring the attribute turns it back into an ordinary property.
        serializer.config_mut().ignore_stored_attribute = true;
        let encoded = serializer.encode(&value, TY_USER).unwrap();
        assert_eq!(encoded.get("cache"), Some(&Value::from(1)));
        let partial = Value::Map(vec![("name".into(), Value::from("bo"))]);
        let err = serializer.decode(&partial, TY_USER).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingProperty { .. }));
    }

    #[test]
    fn host_object_name_is_kept_only_on_request() {
        let mut fixture = Fixture::new();
        fixture.types.register_object(TY_USER, "User", &[]);
        fixture.model = FakeModel::default().with_object(
            TY_USER,
            vec![
                PropertySpec::new("objectName", TY_STR).object_name().optional(),
                PropertySpec::new("name", TY_STR),
            ],
        );
        let mut serializer = fixture.serializer();

        let value = Host::obj(
            TY_USER,
            &[("objectName", Host::str("root")), ("name", Host::str("bo"))],
        );
        let encoded = serializer.encode(&value, TY_USER).unwrap();
        assert_eq!(encoded.get("objectName"), None);

        serializer.config_mut().keep_host_object_name = true;
        let encoded = serializer.encode(&value, TY_USER).unwrap();
        assert_eq!(encoded.get("objectName"), Some(&Value::from("root")));
    }

    // --- polymorphism ---

    const TY_SHAPE: TypeKey = TypeKey::new(50);
    const TY_CIRCLE: TypeKey = TypeKey::new(51);
    const TY_STRAY: TypeKey = TypeKey::new(52);

    const TAG_SHAPE: u64 = 500;
    const TAG_CIRCLE: u64 = 501;
    const TAG_STRAY: u64 = 502;

    fn shape_fixture() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.types.register(
            TypeDescriptor::new(TY_SHAPE, "Shape", TypeShape::Object).with_tag(TAG_SHAPE),
        );
        fixture.types.register(
            TypeDescriptor::new(TY_CIRCLE, "Circle", TypeShape::Object)
                .with_bases(&[TY_SHAPE])
                .with_tag(TAG_CIRCLE),
        );
        fixture.types.register(
            TypeDescriptor::new(TY_STRAY, "Stray", TypeShape::Object).with_tag(TAG_STRAY),
        );
        fixture.model = FakeModel::default()
            .with_object(TY_SHAPE, vec![PropertySpec::new("kind", TY_STR)])
            .with_object(
                TY_CIRCLE,
                vec![
                    PropertySpec::new("kind", TY_STR),
                    PropertySpec::new("radius", TY_INT),
                ],
            )
            .with_object(TY_STRAY, vec![])
            .with_tag(TAG_SHAPE, &[TY_SHAPE])
            .with_tag(TAG_CIRCLE, &[TY_CIRCLE])
            .with_tag(TAG_STRAY, &[TY_STRAY]);
        fixture
    }

    fn circle() -> Host {
        Host::obj(
            TY_CIRCLE,
            &[("kind", Host::str("circle")), ("radius", Host::Int(3))],
        )
    }

    #[test]
    fn subtype_through_base_declaration_round_trips() {
        let fixture = shape_fixture();
        let serializer = fixture.serializer();

        // Opportunistic mode tags because the dynamic type differs.
        let encoded = serializer.encode(&circle(), TY_SHAPE).unwrap();
        let (tag, payload) = encoded.as_tagged().unwrap();
        assert_eq!(tag, TAG_CIRCLE);
        assert_eq!(payload.get("radius"), Some(&Value::from(3)));

        assert_eq!(serializer.decode(&encoded, TY_SHAPE).unwrap(), circle());
    }

    #[test]
    fn forced_mode_always_tags() {
        let fixture = shape_fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().polymorphing = PolymorphMode::Forced;

        let base = Host::obj(TY_SHAPE, &[("kind", Host::str("shape"))]);
        let encoded = serializer.encode(&base, TY_SHAPE).unwrap();
        assert_eq!(encoded.as_tagged().map(|(tag, _)| tag), Some(TAG_SHAPE));
    }

    #[test]
    fn forced_mode_requires_a_tag_on_decode() {
        let fixture = shape_fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().polymorphing = PolymorphMode::Forced;

        let input = Value::Map(vec![("kind".into(), Value::from("shape"))]);
        let err = serializer.decode(&input, TY_SHAPE).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn disabled_mode_never_tags_and_ignores_input_tags() {
        let fixture = shape_fixture();
        let mut serializer = fixture.serializer();
        serializer.config_mut().polymorphing = PolymorphMode::Disabled;

        let encoded = serializer.encode(&circle(), TY_SHAPE).unwrap();
        assert!(encoded.as_tagged().is_none());
        // The declared type's property set is used verbatim.
        assert_eq!(encoded.get("radius"), None);

        // A hand-crafted subtype marker is stripped and ignored.
        let tagged = Value::Map(vec![("kind".into(), Value::from("x"))]).tagged(TAG_CIRCLE);
        let decoded = serializer.decode(&tagged, TY_SHAPE).unwrap();
        assert_eq!(decoded, Host::obj(TY_SHAPE, &[("kind", Host::str("x"))]));
    }

    #[test]
    fn unknown_tag_fails_with_invalid_polymorphic_tag() {
        let fixture = shape_fixture();
        let serializer = fixture.serializer();

        let input = Value::Map(vec![]).tagged(999);
        let err = serializer.decode(&input, TY_SHAPE).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidPolymorphicTag { tag: 999 }
        ));
    }

    #[test]
    fn unassignable_candidate_fails_with_incompatible_type() {
        let fixture = shape_fixture();
        let serializer = fixture.serializer();

        let input = Value::Map(vec![]).tagged(TAG_STRAY);
        let err = serializer.decode(&input, TY_SHAPE).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::IncompatiblePolymorphicType { tag: TAG_STRAY, .. }
        ));
    }
}
