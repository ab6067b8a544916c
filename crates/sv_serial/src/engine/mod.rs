//! The serializer engine: the recursive encode/decode dispatch loop.
//!
//! The engine owns nothing global. It borrows the two process-wide registries
//! and the host model, carries its own configuration and local converter
//! instances, and creates a fresh stack-scoped context per call — so multiple
//! encode/decode calls may run concurrently against the same engine as long
//! as the configuration is not mutated concurrently.

use alloc::sync::Arc;
use alloc::vec::Vec;

use sv_value::Value;

use crate::config::SerializerConfig;
use crate::convert::{Converter, ConverterRegistry, Direction};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeKey, TypeRegistry};

// -----------------------------------------------------------------------------
// Modules

mod context;
mod trace;

pub use context::{DecodeContext, EncodeContext};
pub use trace::{TracePath, TraceSegment};

// -----------------------------------------------------------------------------
// Serializer

struct LocalEntry<M: ObjectModel> {
    seq: u64,
    converter: Arc<dyn Converter<M>>,
}

/// The conversion engine.
///
/// `encode` walks a host value tree and produces a [`Value`]; `decode` is the
/// mirror traversal. Both resolve a converter per node: converter instances
/// added to this engine with [`add_converter`](Serializer::add_converter) are
/// consulted first (highest priority, then most recently added), then the
/// process-wide factories of the [`ConverterRegistry`]. No silent fallback
/// exists — an unmatched declared type fails with
/// [`UnsupportedType`](crate::ErrorKind::UnsupportedType).
///
/// The traversal is a synchronous, non-yielding recursive descent. Cyclic
/// object graphs are a caller responsibility: the engine performs no cycle
/// detection and will exhaust the call stack on one.
pub struct Serializer<'r, M: ObjectModel> {
    types: &'r TypeRegistry,
    converters: &'r ConverterRegistry<M>,
    model: &'r M,
    config: SerializerConfig,
    local: Vec<LocalEntry<M>>,
    next_seq: u64,
}

impl<'r, M: ObjectModel> Serializer<'r, M> {
    /// Creates an engine with the default configuration.
    pub fn new(
        types: &'r TypeRegistry,
        converters: &'r ConverterRegistry<M>,
        model: &'r M,
    ) -> Self {
        Self {
            types,
            converters,
            model,
            config: SerializerConfig::default(),
            local: Vec::new(),
            next_seq: 0,
        }
    }

    /// Replaces the configuration, builder style.
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Must not race in-flight encode/decode calls on this engine.
    #[inline]
    pub fn config_mut(&mut self) -> &mut SerializerConfig {
        &mut self.config
    }

    /// The type registry this engine reads.
    #[inline]
    pub fn types(&self) -> &'r TypeRegistry {
        self.types
    }

    /// The host object model.
    #[inline]
    pub fn model(&self) -> &'r M {
        self.model
    }

    /// Adds a converter instance local to this engine.
    ///
    /// Local instances always win over process-wide factories, regardless of
    /// numeric priority, so callers can override default behavior per engine.
    pub fn add_converter(&mut self, converter: Arc<dyn Converter<M>>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.local.push(LocalEntry { seq, converter });
    }

    /// Encodes a host value at a declared type.
    pub fn encode(&self, value: &M::Value, declared: TypeKey) -> Result<Value, Error> {
        EncodeContext::new(self).encode(value, declared)
    }

    /// Decodes an interchange value into a host value of a declared type.
    pub fn decode(&self, input: &Value, declared: TypeKey) -> Result<M::Value, Error> {
        DecodeContext::new(self).decode(input, declared)
    }

    pub(crate) fn resolve(
        &self,
        ty: &TypeDescriptor,
        direction: Direction,
    ) -> Option<Arc<dyn Converter<M>>> {
        let mut best: Option<(i32, u64, &LocalEntry<M>)> = None;
        for entry in &self.local {
            if !entry.converter.matches(ty, direction, self.types) {
                continue;
            }
            let rank = (entry.converter.priority(), entry.seq);
            if best.is_none_or(|(p, s, _)| rank > (p, s)) {
                best = Some((rank.0, rank.1, entry));
            }
        }
        match best {
            Some((_, _, entry)) => Some(entry.converter.clone()),
            None => self.converters.resolve(ty, direction, self.types),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
