//! Type metadata: keys, shapes, descriptors and the type registry.
//!
//! The registry is the process-wide catalogue of everything the conversion
//! core knows about runtime types: their [shape](TypeShape), typedef aliases
//! and the explicit is-assignable-to relation used by the polymorphism
//! resolver. It is populated during initialization and read concurrently
//! afterwards; see [`TypeRegistry`] for the lifecycle contract.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{TypeDescriptor, TypeKey, TypeShape};
pub use registry::TypeRegistry;

#[cfg(feature = "std")]
pub use registry::SharedTypeRegistry;
