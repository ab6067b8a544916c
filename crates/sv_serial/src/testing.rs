//! Shared test fixtures: a small fake host object model.
//!
//! The fake keeps every host value in one enum and answers the model queries
//! from plain lookup tables, which is all the engine ever needs — the core is
//! generic over anything implementing [`ObjectModel`].

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use sv_value::{Number, Value, ValueKind};

use crate::convert::{Converter, ConverterRegistry, Direction, FnFactory};
use crate::engine::{DecodeContext, EncodeContext, Serializer};
use crate::error::Error;
use crate::model::{ObjectModel, PropertySpec};
use crate::shapes;
use crate::types::{TypeDescriptor, TypeKey, TypeRegistry};

// -----------------------------------------------------------------------------
// Well-known type keys

pub const TY_INT: TypeKey = TypeKey::new(1);
pub const TY_STR: TypeKey = TypeKey::new(2);
pub const TY_BOOL: TypeKey = TypeKey::new(3);
pub const TY_FLOAT: TypeKey = TypeKey::new(4);

pub fn is_primitive(key: TypeKey) -> bool {
    key == TY_INT || key == TY_STR || key == TY_BOOL || key == TY_FLOAT
}

// -----------------------------------------------------------------------------
// Host

/// A fake host runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Host {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Object { ty: TypeKey, props: Vec<(String, Host)> },
    Seq { ty: TypeKey, items: Vec<Host> },
    MapV { ty: TypeKey, entries: Vec<(String, Host)> },
    Opt { ty: TypeKey, payload: Option<Box<Host>> },
    Var { ty: TypeKey, arm: usize, payload: Box<Host> },
    Tup { ty: TypeKey, fields: Vec<Host> },
    Ptr { ty: TypeKey, target: Option<Box<Host>> },
}

impl Host {
    pub fn obj(ty: TypeKey, props: &[(&str, Host)]) -> Self {
        Self::Object {
            ty,
            props: props
                .iter()
                .map(|(name, value)| (String::from(*name), value.clone()))
                .collect(),
        }
    }

    pub fn str(s: &str) -> Self {
        Self::Str(String::from(s))
    }

    pub fn prop(&self, name: &str) -> Option<&Host> {
        match self {
            Self::Object { props, .. } => {
                props.iter().find(|(n, _)| n == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// FakeModel

/// A fake reflective object model answering from lookup tables.
#[derive(Default)]
pub struct FakeModel {
    properties: Vec<(TypeKey, Vec<PropertySpec>)>,
    defaults: Vec<(TypeKey, Host)>,
    tags: Vec<(u64, Vec<TypeKey>)>,
    set_types: Vec<TypeKey>,
}

impl FakeModel {
    pub fn with_object(mut self, ty: TypeKey, props: Vec<PropertySpec>) -> Self {
        self.properties.push((ty, props));
        self
    }

    pub fn with_default(mut self, ty: TypeKey, value: Host) -> Self {
        self.defaults.push((ty, value));
        self
    }

    pub fn with_tag(mut self, tag: u64, types: &[TypeKey]) -> Self {
        self.tags.push((tag, types.to_vec()));
        self
    }

    /// Marks a type key as set-like, so built sequences deduplicate.
    pub fn with_set(mut self, ty: TypeKey) -> Self {
        self.set_types.push(ty);
        self
    }
}

impl ObjectModel for FakeModel {
    type Value = Host;

    fn dynamic_type(&self, value: &Host) -> TypeKey {
        match value {
            Host::Int(_) => TY_INT,
            Host::Float(_) => TY_FLOAT,
            Host::Bool(_) => TY_BOOL,
            Host::Str(_) => TY_STR,
            Host::Object { ty, .. }
            | Host::Seq { ty, .. }
            | Host::MapV { ty, .. }
            | Host::Opt { ty, .. }
            | Host::Var { ty, .. }
            | Host::Tup { ty, .. }
            | Host::Ptr { ty, .. } => *ty,
        }
    }

    fn properties(&self, ty: TypeKey) -> Option<Vec<PropertySpec>> {
        self.properties
            .iter()
            .find(|(k, _)| *k == ty)
            .map(|(_, p)| p.clone())
    }

    fn read_property(&self, object: &Host, name: &str) -> Option<Host> {
        object.prop(name).cloned()
    }

    fn write_property(&self, object: &mut Host, name: &str, value: Host) -> bool {
        let Host::Object { props, .. } = object else {
            return false;
        };
        match props.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => props.push((String::from(name), value)),
        }
        true
    }

    fn instantiate(&self, ty: TypeKey) -> Option<Host> {
        if let Some((_, value)) = self.defaults.iter().find(|(k, _)| *k == ty) {
            return Some(value.clone());
        }
        match ty {
            _ if ty == TY_INT => Some(Host::Int(0)),
            _ if ty == TY_FLOAT => Some(Host::Float(0.0)),
            _ if ty == TY_BOOL => Some(Host::Bool(false)),
            _ if ty == TY_STR => Some(Host::Str(String::new())),
            _ => self
                .properties
                .iter()
                .any(|(k, _)| *k == ty)
                .then(|| Host::Object {
                    ty,
                    props: Vec::new(),
                }),
        }
    }

    fn types_for_tag(&self, tag: u64) -> Vec<TypeKey> {
        self.tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, types)| types.clone())
            .unwrap_or_default()
    }

    fn sequence_elements(&self, value: &Host) -> Option<Vec<Host>> {
        match value {
            Host::Seq { items, .. } => Some(items.clone()),
            _ => None,
        }
    }

    fn build_sequence(&self, ty: TypeKey, items: Vec<Host>) -> Option<Host> {
        let items = if self.set_types.contains(&ty) {
            // First occurrence wins, mirroring set insertion.
            let mut unique: Vec<Host> = Vec::new();
            for item in items {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            unique
        } else {
            items
        };
        Some(Host::Seq { ty, items })
    }

    fn map_entries(&self, value: &Host) -> Option<Vec<(String, Host)>> {
        match value {
            Host::MapV { entries, .. } => Some(entries.clone()),
            _ => None,
        }
    }

    fn build_map(&self, ty: TypeKey, entries: Vec<(String, Host)>) -> Option<Host> {
        Some(Host::MapV { ty, entries })
    }

    fn optional_payload(&self, value: &Host) -> Option<Option<Host>> {
        match value {
            Host::Opt { payload, .. } => Some(payload.clone().map(|b| *b)),
            _ => None,
        }
    }

    fn build_optional(&self, ty: TypeKey, payload: Option<Host>) -> Option<Host> {
        Some(Host::Opt {
            ty,
            payload: payload.map(Box::new),
        })
    }

    fn variant_arm(&self, value: &Host) -> Option<(usize, Host)> {
        match value {
            Host::Var { arm, payload, .. } => Some((*arm, (**payload).clone())),
            _ => None,
        }
    }

    fn build_variant(&self, ty: TypeKey, arm: usize, payload: Host) -> Option<Host> {
        Some(Host::Var {
            ty,
            arm,
            payload: Box::new(payload),
        })
    }

    fn tuple_fields(&self, value: &Host) -> Option<Vec<Host>> {
        match value {
            Host::Tup { fields, .. } => Some(fields.clone()),
            _ => None,
        }
    }

    fn build_tuple(&self, ty: TypeKey, fields: Vec<Host>) -> Option<Host> {
        Some(Host::Tup { ty, fields })
    }

    fn pointer_target(&self, value: &Host) -> Option<Option<Host>> {
        match value {
            Host::Ptr { target, .. } => Some(target.clone().map(|b| *b)),
            _ => None,
        }
    }

    fn build_pointer(&self, ty: TypeKey, target: Option<Host>) -> Option<Host> {
        Some(Host::Ptr {
            ty,
            target: target.map(Box::new),
        })
    }
}

// -----------------------------------------------------------------------------
// PrimitiveConverter

/// Converts the fake primitives, honoring the strictness configuration the
/// way a host's builtin converters would.
pub struct PrimitiveConverter;

impl Converter<FakeModel> for PrimitiveConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        is_primitive(ty.key())
    }

    fn encode(
        &self,
        value: &Host,
        ty: &TypeDescriptor,
        _ctx: &mut EncodeContext<'_, '_, FakeModel>,
    ) -> Result<Value, Error> {
        match value {
            Host::Int(i) => Ok(Value::from(*i)),
            Host::Float(f) => Ok(Value::from(*f)),
            Host::Bool(b) => Ok(Value::from(*b)),
            Host::Str(s) => Ok(Value::from(s.clone())),
            _ => Err(Error::conversion_failed(alloc::format!(
                "non-primitive value for `{}`",
                ty.name()
            ))),
        }
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, FakeModel>,
    ) -> Result<Host, Error> {
        let expected = if ty.key() == TY_INT {
            ValueKind::Int
        } else if ty.key() == TY_FLOAT {
            ValueKind::Float
        } else if ty.key() == TY_BOOL {
            ValueKind::Bool
        } else {
            ValueKind::String
        };

        match ctx.expect_basic(input, expected)? {
            Value::Number(Number::Int(i)) => Ok(Host::Int(i)),
            Value::Number(Number::Float(f)) => Ok(Host::Float(f)),
            Value::Bool(b) => Ok(Host::Bool(b)),
            Value::String(s) => Ok(Host::Str(s)),
            other => Err(Error::kind_mismatch(expected, other.kind())),
        }
    }
}

// -----------------------------------------------------------------------------
// Fixture

/// A ready-made pipeline: primitive types registered, shape converters and
/// the primitive converter installed.
pub struct Fixture {
    pub types: TypeRegistry,
    pub converters: ConverterRegistry<FakeModel>,
    pub model: FakeModel,
}

impl Fixture {
    pub fn new() -> Self {
        let mut types = TypeRegistry::new();
        types.register_opaque(TY_INT, "i64");
        types.register_opaque(TY_STR, "String");
        types.register_opaque(TY_BOOL, "bool");
        types.register_opaque(TY_FLOAT, "f64");

        let mut converters = ConverterRegistry::new();
        shapes::register_shape_converters(&mut converters);
        converters.register_factory(
            FnFactory::new(
                |ty, _, _| is_primitive(ty.key()),
                || Arc::new(PrimitiveConverter),
            )
            .with_name("test-primitives"),
        );

        Self {
            types,
            converters,
            model: FakeModel::default(),
        }
    }

    pub fn serializer(&self) -> Serializer<'_, FakeModel> {
        Serializer::new(&self.types, &self.converters, &self.model)
    }
}
