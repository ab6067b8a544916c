//! The open converter abstraction.
//!
//! A [`Converter`] is a unit of logic mapping between one or more runtime
//! type shapes and the interchange [`Value`](sv_value::Value). Converters are
//! selected by capability, not by a closed enum: each carries a predicate
//! over [`TypeDescriptor`] and a priority, and the registry picks the best
//! match per resolution. Third parties add support for new runtime types by
//! registering converters, never by modifying the engine.

use alloc::sync::Arc;

use sv_value::Value;

use crate::Error;
use crate::engine::{DecodeContext, EncodeContext};
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry};

// -----------------------------------------------------------------------------
// Modules

mod registry;

pub use registry::{ConverterRegistry, FnFactory};

// -----------------------------------------------------------------------------
// Direction

/// The direction a converter is resolved for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Host value to interchange tree.
    Encode,
    /// Interchange tree to host value.
    Decode,
}

// -----------------------------------------------------------------------------
// priority

/// Well-known converter priorities.
///
/// Higher wins; equal priorities are broken by registration order with the
/// most recently added entry first. Converter instances added to a serializer
/// always win over process-wide factories, regardless of these numbers.
pub mod priority {
    pub const EXTREMELY_LOW: i32 = -0x300;
    pub const VERY_LOW: i32 = -0x200;
    pub const LOW: i32 = -0x100;
    pub const STANDARD: i32 = 0;
    pub const HIGH: i32 = 0x100;
    pub const VERY_HIGH: i32 = 0x200;
    pub const EXTREMELY_HIGH: i32 = 0x300;
}

// -----------------------------------------------------------------------------
// Converter

/// A bidirectional conversion between runtime values of matching types and
/// the interchange tree.
///
/// Converters recurse into sub-values (container elements, object
/// properties) through the [`EncodeContext`]/[`DecodeContext`] they are
/// handed, never by calling each other directly.
pub trait Converter<M: ObjectModel>: Send + Sync {
    /// The selection priority, see [`priority`].
    fn priority(&self) -> i32 {
        priority::STANDARD
    }

    /// Whether this converter can handle the given type in the given
    /// direction.
    fn matches(&self, ty: &TypeDescriptor, direction: Direction, types: &TypeRegistry) -> bool;

    /// Converts a host value declared as `ty` into an interchange value.
    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error>;

    /// Converts an interchange value into a host value of declared type `ty`.
    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error>;
}

// -----------------------------------------------------------------------------
// ConverterFactory

/// A process-wide provider of converters.
///
/// Factories are registered once at initialization and asked for a converter
/// lazily, per capability match. Whether the produced instance is cached is
/// an optimization, not an observable contract; factories must therefore be
/// stateless with respect to conversion outcomes.
pub trait ConverterFactory<M: ObjectModel>: Send + Sync {
    /// A stable identity for idempotent registration.
    ///
    /// Registering a second factory under an already-registered name is a
    /// no-op. `None` opts out of deduplication.
    fn name(&self) -> Option<&'static str> {
        None
    }

    /// The selection priority of the produced converter.
    fn priority(&self) -> i32 {
        priority::STANDARD
    }

    /// Whether the produced converter can handle the given type.
    fn matches(&self, ty: &TypeDescriptor, direction: Direction, types: &TypeRegistry) -> bool;

    /// Produces the converter.
    fn create(&self) -> Arc<dyn Converter<M>>;
}
