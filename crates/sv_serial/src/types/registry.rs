use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use sv_utils::hash::{HashMap, PassHashMap};

use crate::types::{TypeDescriptor, TypeKey, TypeShape};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The catalogue of registered runtime types.
///
/// # Lifecycle
///
/// The registry follows an init-then-freeze lifecycle: all registration runs
/// during process or library initialization, before concurrent encode/decode
/// traffic begins. After that the table is read-only and safe to share across
/// threads (`&TypeRegistry` is `Send + Sync`). No ordering guarantee is made
/// for a registration that races an in-flight resolution; callers must not
/// mix steady-state traffic with late registration.
///
/// Registration is idempotent per key: re-registering an existing key is a
/// no-op that leaves the first descriptor in place.
///
/// # Example
///
/// ```
/// use sv_serial::types::{TypeKey, TypeRegistry};
///
/// const TY_INT: TypeKey = TypeKey::new(1);
/// const TY_INTS: TypeKey = TypeKey::new(2);
///
/// let mut types = TypeRegistry::new();
/// types.register_opaque(TY_INT, "i64");
/// types.register_sequence(TY_INTS, "Vec<i64>", TY_INT);
///
/// assert!(types.get(TY_INTS).unwrap().is_container_like());
/// assert_eq!(types.get_by_name("i64").map(|d| d.key()), Some(TY_INT));
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    table: PassHashMap<TypeKey, TypeDescriptor>,
    name_to_key: HashMap<String, TypeKey>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, if its key is not taken yet.
    ///
    /// Returns `true` if the descriptor was inserted, `false` if the key was
    /// already registered (the existing descriptor wins).
    pub fn register(&mut self, descriptor: TypeDescriptor) -> bool {
        if self.table.contains_key(&descriptor.key()) {
            return false;
        }
        self.name_to_key
            .entry(String::from(descriptor.name()))
            .or_insert(descriptor.key());
        self.table.insert(descriptor.key(), descriptor);
        true
    }

    /// Registers an opaque type, handled only by dedicated converters.
    pub fn register_opaque(&mut self, key: TypeKey, name: impl Into<String>) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Opaque))
    }

    /// Registers an object type with its direct bases.
    pub fn register_object(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        bases: &[TypeKey],
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Object).with_bases(bases))
    }

    /// Registers a sequence-like container type.
    pub fn register_sequence(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        element: TypeKey,
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Sequence { element }))
    }

    /// Registers a set-like container type.
    pub fn register_set(&mut self, key: TypeKey, name: impl Into<String>, element: TypeKey) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Set { element }))
    }

    /// Registers a string-keyed map type.
    pub fn register_map(&mut self, key: TypeKey, name: impl Into<String>, value: TypeKey) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Map { value }))
    }

    /// Registers a string-keyed multi-map type.
    pub fn register_multi_map(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        value: TypeKey,
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::MultiMap { value }))
    }

    /// Registers an optional wrapper type.
    pub fn register_optional(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        payload: TypeKey,
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Optional { payload }))
    }

    /// Registers a discriminated-union type with its alternatives in
    /// declaration order.
    pub fn register_variant(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        alternatives: &[TypeKey],
    ) -> bool {
        self.register(TypeDescriptor::new(
            key,
            name,
            TypeShape::Variant {
                alternatives: alternatives.to_vec(),
            },
        ))
    }

    /// Registers a pair type.
    pub fn register_pair(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        first: TypeKey,
        second: TypeKey,
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Pair { first, second }))
    }

    /// Registers a fixed-arity tuple type.
    pub fn register_tuple(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        fields: &[TypeKey],
    ) -> bool {
        self.register(TypeDescriptor::new(
            key,
            name,
            TypeShape::Tuple {
                fields: fields.to_vec(),
            },
        ))
    }

    /// Registers a pointer wrapper type.
    ///
    /// Weak pointers whose target is gone encode as null; that is documented
    /// information loss, not an error.
    pub fn register_pointer(
        &mut self,
        key: TypeKey,
        name: impl Into<String>,
        target: TypeKey,
        weak: bool,
    ) -> bool {
        self.register(TypeDescriptor::new(key, name, TypeShape::Pointer { target, weak }))
    }

    /// Records the original name a registered type was declared under.
    ///
    /// Used for typedef aliases: the canonical name of the type becomes the
    /// original name. Idempotent; the first recorded name wins.
    pub fn register_alias(&mut self, key: TypeKey, original_name: &str) {
        if let Some(descriptor) = self.table.get_mut(&key) {
            descriptor.set_original_name(original_name);
            self.name_to_key
                .entry(String::from(original_name))
                .or_insert(key);
        }
    }

    /// Whether the key is registered.
    #[inline]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.table.contains_key(&key)
    }

    /// Returns the descriptor for a key.
    #[inline]
    pub fn get(&self, key: TypeKey) -> Option<&TypeDescriptor> {
        self.table.get(&key)
    }

    /// Returns the descriptor registered (or aliased) under a name.
    pub fn get_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        match self.name_to_key.get(name) {
            Some(key) => self.get(*key),
            None => None,
        }
    }

    /// The canonical (de-aliased) name of a type.
    ///
    /// The original typedef name when one was recorded, the registered name
    /// otherwise.
    pub fn canonical_name(&self, key: TypeKey) -> Option<&str> {
        self.get(key)
            .map(|d| d.original_name().unwrap_or_else(|| d.name()))
    }

    /// Whether `from` is assignable to `to`.
    ///
    /// The relation is the reflexive-transitive closure of the explicit base
    /// declarations; no language-level inheritance is consulted.
    pub fn is_assignable(&self, from: TypeKey, to: TypeKey) -> bool {
        self.derivation_depth(from, to).is_some()
    }

    /// The number of base steps from `from` up to `to`.
    ///
    /// `Some(0)` when the keys are equal, `None` when `from` is not
    /// assignable to `to`. Used to pick the most derived candidate during
    /// polymorphic resolution.
    pub fn derivation_depth(&self, from: TypeKey, to: TypeKey) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        // Breadth-first walk over the base relation; the tables are small.
        let mut queue = VecDeque::new();
        let mut seen = Vec::new();
        queue.push_back((from, 0_usize));
        seen.push(from);

        while let Some((current, depth)) = queue.pop_front() {
            let Some(descriptor) = self.get(current) else {
                continue;
            };
            for &base in descriptor.bases() {
                if base == to {
                    return Some(depth + 1);
                }
                if !seen.contains(&base) {
                    seen.push(base);
                    queue.push_back((base, depth + 1));
                }
            }
        }
        None
    }

    /// Returns an iterator over the registered descriptors.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeDescriptor> {
        self.table.values()
    }
}

// -----------------------------------------------------------------------------
// SharedTypeRegistry

#[cfg(feature = "std")]
mod shared {
    use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use super::TypeRegistry;

    /// A process-wide, lock-protected handle to a [`TypeRegistry`].
    ///
    /// The intended use is write access during initialization and shared read
    /// access afterwards; readers hold the lock for the duration of one
    /// encode/decode call.
    #[derive(Clone, Default)]
    pub struct SharedTypeRegistry {
        internal: Arc<RwLock<TypeRegistry>>,
    }

    impl SharedTypeRegistry {
        /// Takes a read lock on the underlying [`TypeRegistry`].
        pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
            self.internal.read().unwrap_or_else(PoisonError::into_inner)
        }

        /// Takes a write lock on the underlying [`TypeRegistry`].
        pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
            self.internal
                .write()
                .unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl core::fmt::Debug for SharedTypeRegistry {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_list()
                .entries(self.read().iter().map(|d| d.key()))
                .finish()
        }
    }
}

#[cfg(feature = "std")]
pub use shared::SharedTypeRegistry;

// -----------------------------------------------------------------------------
// Tests
