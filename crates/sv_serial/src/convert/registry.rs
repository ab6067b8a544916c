use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::convert::{Converter, ConverterFactory, Direction, priority};
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry};

// -----------------------------------------------------------------------------
// FactoryEntry

struct FactoryEntry<M: ObjectModel> {
    seq: u64,
    factory: Box<dyn ConverterFactory<M>>,
    // Instantiation caching is an optimization, not a contract; without std
    // a fresh converter is produced per resolution.
    #[cfg(feature = "std")]
    cached: std::sync::OnceLock<Arc<dyn Converter<M>>>,
}

impl<M: ObjectModel> FactoryEntry<M> {
    fn new(seq: u64, factory: Box<dyn ConverterFactory<M>>) -> Self {
        Self {
            seq,
            factory,
            #[cfg(feature = "std")]
            cached: std::sync::OnceLock::new(),
        }
    }

    fn converter(&self) -> Arc<dyn Converter<M>> {
        #[cfg(feature = "std")]
        {
            self.cached.get_or_init(|| self.factory.create()).clone()
        }
        #[cfg(not(feature = "std"))]
        {
            self.factory.create()
        }
    }
}

// -----------------------------------------------------------------------------
// ConverterRegistry

/// The ordered collection of process-wide converter providers.
///
/// Like the [`TypeRegistry`](crate::types::TypeRegistry), this follows an
/// init-then-freeze lifecycle: factories are registered during
/// initialization, then the table is read concurrently by any number of
/// serializers. Per-serializer converter *instances* live on the
/// [`Serializer`](crate::Serializer) itself, not here, and are consulted
/// before any factory in this registry.
pub struct ConverterRegistry<M: ObjectModel> {
    entries: Vec<FactoryEntry<M>>,
    next_seq: u64,
}

impl<M: ObjectModel> Default for ConverterRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ObjectModel> ConverterRegistry<M> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Registers a process-wide converter factory.
    ///
    /// Returns `false` (and drops the factory) when a factory with the same
    /// [`name`](ConverterFactory::name) is already registered.
    pub fn register_factory(&mut self, factory: impl ConverterFactory<M> + 'static) -> bool {
        if let Some(name) = factory.name() {
            let taken = self
                .entries
                .iter()
                .any(|e| e.factory.name() == Some(name));
            if taken {
                return false;
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(FactoryEntry::new(seq, Box::new(factory)));
        true
    }

    /// The number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolves the best-matching converter for a type, or `None`.
    ///
    /// Highest priority wins; ties go to the most recently registered entry.
    /// The engine consults its local converter instances before calling this.
    pub fn resolve(
        &self,
        ty: &TypeDescriptor,
        direction: Direction,
        types: &TypeRegistry,
    ) -> Option<Arc<dyn Converter<M>>> {
        let mut best: Option<(i32, u64, &FactoryEntry<M>)> = None;
        for entry in &self.entries {
            if !entry.factory.matches(ty, direction, types) {
                continue;
            }
            let rank = (entry.factory.priority(), entry.seq);
            if best.is_none_or(|(p, s, _)| rank > (p, s)) {
                best = Some((rank.0, rank.1, entry));
            }
        }
        best.map(|(_, _, entry)| entry.converter())
    }
}

// -----------------------------------------------------------------------------
// FnFactory

type Predicate = dyn Fn(&TypeDescriptor, Direction, &TypeRegistry) -> bool + Send + Sync;

/// A [`ConverterFactory`] assembled from closures.
///
/// The common way to register a converter without a dedicated factory type:
///
/// ```text
/// registry.register_factory(
///     FnFactory::new(
///         |ty, _, _| matches!(ty.shape(), TypeShape::Opaque),
///         || Arc::new(FallbackConverter),
///     )
///     .with_priority(priority::LOW)
///     .with_name("fallback-opaque"),
/// );
/// ```
pub struct FnFactory<M: ObjectModel> {
    name: Option<&'static str>,
    priority: i32,
    predicate: Box<Predicate>,
    create: Box<dyn Fn() -> Arc<dyn Converter<M>> + Send + Sync>,
}

impl<M: ObjectModel> FnFactory<M> {
    /// Creates a factory with [`priority::STANDARD`] and no name.
    pub fn new(
        predicate: impl Fn(&TypeDescriptor, Direction, &TypeRegistry) -> bool + Send + Sync + 'static,
        create: impl Fn() -> Arc<dyn Converter<M>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: None,
            priority: priority::STANDARD,
            predicate: Box::new(predicate),
            create: Box::new(create),
        }
    }

    /// Sets the selection priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the stable name used for idempotent registration.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }
}

impl<M: ObjectModel> ConverterFactory<M> for FnFactory<M> {
    fn name(&self) -> Option<&'static str> {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn matches(&self, ty: &TypeDescriptor, direction: Direction, types: &TypeRegistry) -> bool {
        (self.predicate)(ty, direction, types)
    }

    fn create(&self) -> Arc<dyn Converter<M>> {
        (self.create)()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;
    use crate::testing::{FakeModel, PrimitiveConverter};

    #[test]
    fn named_factories_register_idempotently() {
        let mut registry: ConverterRegistry<FakeModel> = ConverterRegistry::new();

        shapes::register_shape_converters(&mut registry);
        let count = registry.len();

        // A second pass adds no duplicate entries.
        shapes::register_shape_converters(&mut registry);
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn unnamed_factories_always_register() {
        let mut registry: ConverterRegistry<FakeModel> = ConverterRegistry::new();
        for _ in 0..2 {
            registry.register_factory(FnFactory::new(
                |_, _, _| false,
                || Arc::new(PrimitiveConverter),
            ));
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registries_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConverterRegistry<FakeModel>>();
        assert_send_sync::<crate::types::TypeRegistry>();
    }
}
