use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// TypeKey

/// A stable identifier for a host runtime type.
///
/// Keys are assigned by the host object model, not by this crate; the core
/// only requires them to be stable for the process lifetime and unique per
/// runtime type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeKey(u32);

impl TypeKey {
    /// Creates a key from its raw host-assigned value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw host-assigned value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// The structural shape of a registered type.
///
/// Shapes drive the generic converter family: one converter handles *all*
/// sequence-like types, another all maps, and so on. A type whose structure
/// the core should not interpret registers as [`Opaque`](TypeShape::Opaque)
/// and is only reachable through a dedicated converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeShape {
    /// A type handled entirely by a dedicated converter (host primitives,
    /// dates, locales, …).
    Opaque,
    /// A property-bag type whose property set the host model enumerates.
    Object,
    /// An ordered container that may contain duplicates.
    Sequence { element: TypeKey },
    /// An unordered container with the set's own equality semantics.
    ///
    /// Encoded exactly like a sequence; decoding deduplicates through the
    /// host's insertion semantics, which is accepted information loss.
    Set { element: TypeKey },
    /// A string-keyed container with one value per key.
    Map { value: TypeKey },
    /// A string-keyed container where a key may carry several values.
    MultiMap { value: TypeKey },
    /// A wrapper with an empty state and a present state.
    Optional { payload: TypeKey },
    /// A discriminated union over a fixed list of alternatives.
    Variant { alternatives: Vec<TypeKey> },
    /// A two-element heterogeneous product.
    Pair { first: TypeKey, second: TypeKey },
    /// A fixed-arity heterogeneous product.
    Tuple { fields: Vec<TypeKey> },
    /// A shared or weak reference to an object-like value.
    Pointer { target: TypeKey, weak: bool },
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Metadata for one registered runtime type.
///
/// Descriptors are created when a type is registered and are immutable for
/// the rest of the process lifetime (the registry fills in the original
/// typedef name during the initialization phase, see
/// [`TypeRegistry::register_alias`](crate::types::TypeRegistry::register_alias)).
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    key: TypeKey,
    name: String,
    shape: TypeShape,
    original_name: Option<String>,
    bases: Vec<TypeKey>,
    tag: Option<u64>,
    polymorphic: bool,
}

impl TypeDescriptor {
    /// Creates a descriptor with no bases, no tag and no alias information.
    pub fn new(key: TypeKey, name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            key,
            name: name.into(),
            shape,
            original_name: None,
            bases: Vec::new(),
            tag: None,
            polymorphic: false,
        }
    }

    /// Declares the direct bases this type is assignable to.
    pub fn with_bases(mut self, bases: &[TypeKey]) -> Self {
        self.bases = bases.to_vec();
        self
    }

    /// Attaches the subtype tag used when this type is encoded polymorphically.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Marks the type as polymorphic at registration time.
    ///
    /// Under opportunistic polymorphism a subtype tag is emitted for marked
    /// types even when the dynamic type equals the declared one.
    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    pub(crate) fn set_original_name(&mut self, name: &str) {
        if self.original_name.is_none() {
            self.original_name = Some(String::from(name));
        }
    }

    /// The type key.
    #[inline]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// The registered type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original name this type was declared under, if it was registered
    /// as a typedef alias.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// The structural shape.
    #[inline]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// The direct bases of this type.
    pub fn bases(&self) -> &[TypeKey] {
        &self.bases
    }

    /// The subtype tag, if one was registered.
    #[inline]
    pub const fn tag(&self) -> Option<u64> {
        self.tag
    }

    /// Whether the type was marked polymorphic at registration time.
    #[inline]
    pub const fn is_polymorphic(&self) -> bool {
        self.polymorphic
    }

    /// Whether the shape is one of the container shapes.
    pub const fn is_container_like(&self) -> bool {
        matches!(
            self.shape,
            TypeShape::Sequence { .. }
                | TypeShape::Set { .. }
                | TypeShape::Map { .. }
                | TypeShape::MultiMap { .. }
        )
    }

    /// Whether the shape is a property-bag object.
    #[inline]
    pub const fn is_object_like(&self) -> bool {
        matches!(self.shape, TypeShape::Object)
    }

    /// Whether the shape is an optional wrapper.
    #[inline]
    pub const fn is_optional_like(&self) -> bool {
        matches!(self.shape, TypeShape::Optional { .. })
    }

    /// Whether the shape is a pointer wrapper.
    #[inline]
    pub const fn is_pointer_like(&self) -> bool {
        matches!(self.shape, TypeShape::Pointer { .. })
    }
}
