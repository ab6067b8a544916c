//! The host object model, an injected capability.
//!
//! The conversion core never owns application values and never inspects them
//! directly: everything it knows about the host side flows through
//! [`ObjectModel`]. Production hosts implement it over their reflection
//! layer; tests implement it over a small fake.

use alloc::string::String;
use alloc::vec::Vec;

use sv_value::ValueKind;

use crate::types::TypeKey;

// -----------------------------------------------------------------------------
// PropertySpec

/// One declared property of an object-like type.
#[derive(Clone, Debug)]
pub struct PropertySpec {
    /// The property name, as it appears in encoded maps.
    pub name: String,
    /// The declared type sub-values of this property are converted at.
    pub declared: TypeKey,
    /// The expected basic value kind, when the declared type is primitive.
    ///
    /// Consulted by the strict basic-type validation rule; `None` skips the
    /// core-side kind check and leaves strictness to the property's converter.
    pub kind: Option<ValueKind>,
    /// Whether the property must be present under full-property validation.
    pub required: bool,
    /// Whether the property is persistable. Non-persistable properties are
    /// skipped on encode and never required on decode, unless the serializer
    /// is configured to ignore the attribute.
    pub stored: bool,
    /// Whether this is the host's object-identity property, which is only
    /// serialized when the serializer keeps host object names.
    pub object_name: bool,
}

impl PropertySpec {
    /// Creates a required, persistable property.
    pub fn new(name: impl Into<String>, declared: TypeKey) -> Self {
        Self {
            name: name.into(),
            declared,
            kind: None,
            required: true,
            stored: true,
            object_name: false,
        }
    }

    /// Sets the expected basic value kind.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Marks the property as not required.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the property as non-persistable.
    pub fn not_stored(mut self) -> Self {
        self.stored = false;
        self
    }

    /// Marks the property as the host's object-identity property.
    pub fn object_name(mut self) -> Self {
        self.object_name = true;
        self
    }
}

// -----------------------------------------------------------------------------
// ObjectModel

/// Access to the host's reflective data model.
///
/// The object portion (type identity, property enumeration and access,
/// instantiation, tag candidates) is mandatory. The container and wrapper
/// accessors are only consulted by the corresponding shape converters; hosts
/// that register none of those shapes can keep the defaults, which report
/// "not supported" by returning `None`.
///
/// Reading a property, instantiating a type or building a container returns
/// `Option` rather than an error: `None` means the host cannot perform the
/// operation for that value, which the converters surface as a conversion
/// failure with context.
pub trait ObjectModel: 'static {
    /// The host's runtime value representation.
    type Value: Clone;

    /// The dynamic (concrete) type of a runtime value.
    fn dynamic_type(&self, value: &Self::Value) -> TypeKey;

    /// The canonical name of a type the registry does not know.
    ///
    /// The engine consults the type registry first; this is the fallback for
    /// host builtins that were never registered.
    fn canonical_name(&self, ty: TypeKey) -> Option<String> {
        let _ = ty;
        None
    }

    /// The declared properties of an object-like type, or `None` if the type
    /// is not object-like or unknown to the host.
    fn properties(&self, ty: TypeKey) -> Option<Vec<PropertySpec>>;

    /// Reads a named property from a live object.
    fn read_property(&self, object: &Self::Value, name: &str) -> Option<Self::Value>;

    /// Writes a named property on a live object. Returns `false` when the
    /// property does not exist or rejects the value.
    fn write_property(&self, object: &mut Self::Value, name: &str, value: Self::Value) -> bool;

    /// Creates a default instance of a type.
    fn instantiate(&self, ty: TypeKey) -> Option<Self::Value>;

    /// The concrete types registered as polymorphic subtypes for a tag.
    fn types_for_tag(&self, tag: u64) -> Vec<TypeKey>;

    // --- container access, consulted by the shape converter family ---

    /// The elements of a sequence- or set-like value, in iteration order.
    fn sequence_elements(&self, value: &Self::Value) -> Option<Vec<Self::Value>> {
        let _ = value;
        None
    }

    /// Builds a sequence- or set-like value of type `ty` from elements.
    ///
    /// For set types the host's insertion semantics apply; duplicates
    /// collapse per the set's equality.
    fn build_sequence(&self, ty: TypeKey, items: Vec<Self::Value>) -> Option<Self::Value> {
        let _ = (ty, items);
        None
    }

    /// The entries of a map- or multi-map-like value, in encounter order.
    /// A multi-map yields one entry per (key, value) occurrence.
    fn map_entries(&self, value: &Self::Value) -> Option<Vec<(String, Self::Value)>> {
        let _ = value;
        None
    }

    /// Builds a map- or multi-map-like value of type `ty` from entries.
    fn build_map(&self, ty: TypeKey, entries: Vec<(String, Self::Value)>) -> Option<Self::Value> {
        let _ = (ty, entries);
        None
    }

    // --- wrapper access ---

    /// The state of an optional-like value: `Some(None)` when empty,
    /// `Some(Some(payload))` when present, `None` when not optional-like.
    fn optional_payload(&self, value: &Self::Value) -> Option<Option<Self::Value>> {
        let _ = value;
        None
    }

    /// Builds an optional-like value of type `ty`.
    fn build_optional(&self, ty: TypeKey, payload: Option<Self::Value>) -> Option<Self::Value> {
        let _ = (ty, payload);
        None
    }

    /// The currently held alternative of a variant-like value, as the
    /// zero-based declaration index and the payload.
    fn variant_arm(&self, value: &Self::Value) -> Option<(usize, Self::Value)> {
        let _ = value;
        None
    }

    /// Builds a variant-like value of type `ty` holding the given alternative.
    fn build_variant(&self, ty: TypeKey, arm: usize, payload: Self::Value) -> Option<Self::Value> {
        let _ = (ty, arm, payload);
        None
    }

    /// The fields of a pair- or tuple-like value, in declaration order.
    fn tuple_fields(&self, value: &Self::Value) -> Option<Vec<Self::Value>> {
        let _ = value;
        None
    }

    /// Builds a pair- or tuple-like value of type `ty` from fields.
    fn build_tuple(&self, ty: TypeKey, fields: Vec<Self::Value>) -> Option<Self::Value> {
        let _ = (ty, fields);
        None
    }

    /// The referent of a pointer-like value: `Some(None)` for a null pointer
    /// or a weak reference whose target is gone, `Some(Some(target))`
    /// otherwise, `None` when not pointer-like.
    fn pointer_target(&self, value: &Self::Value) -> Option<Option<Self::Value>> {
        let _ = value;
        None
    }

    /// Builds a pointer-like value of type `ty` around a decoded target.
    fn build_pointer(&self, ty: TypeKey, target: Option<Self::Value>) -> Option<Self::Value> {
        let _ = (ty, target);
        None
    }
}
