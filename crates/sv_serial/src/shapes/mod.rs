//! The generic container and wrapper converter family.
//!
//! These converters are registered over type *shape*, not one concrete type
//! each: a single [`SequenceConverter`] serves every sequence- and set-like
//! type the registry knows, and so on. Element access and construction go
//! through the host model's container accessors; the element/payload declared
//! types come from the registered [`TypeShape`](crate::types::TypeShape).

use alloc::sync::Arc;

use crate::convert::{ConverterRegistry, FnFactory};
use crate::model::ObjectModel;
use crate::types::TypeShape;

// -----------------------------------------------------------------------------
// Modules

mod map;
mod object;
mod optional;
mod pointer;
mod sequence;
mod tuple;
mod variant;

pub use map::{MapConverter, MultiMapConverter};
pub use object::ObjectConverter;
pub use optional::OptionalConverter;
pub use pointer::PointerConverter;
pub use sequence::SequenceConverter;
pub use tuple::TupleConverter;
pub use variant::VariantConverter;

// -----------------------------------------------------------------------------
// Registration

/// Registers the whole shape converter family as process-wide factories.
///
/// Idempotent: every factory carries a stable name, so calling this twice
/// (or racing another library's registration of the same family) adds no
/// duplicate entries and changes no resolution outcome.
pub fn register_shape_converters<M: ObjectModel>(registry: &mut ConverterRegistry<M>) {
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Sequence { .. } | TypeShape::Set { .. }),
            || Arc::new(SequenceConverter),
        )
        .with_name("shape-sequence"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Map { .. }),
            || Arc::new(MapConverter),
        )
        .with_name("shape-map"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::MultiMap { .. }),
            || Arc::new(MultiMapConverter),
        )
        .with_name("shape-multi-map"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Optional { .. }),
            || Arc::new(OptionalConverter),
        )
        .with_name("shape-optional"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Variant { .. }),
            || Arc::new(VariantConverter),
        )
        .with_name("shape-variant"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Pair { .. } | TypeShape::Tuple { .. }),
            || Arc::new(TupleConverter),
        )
        .with_name("shape-tuple"),
    );
    registry.register_factory(
        FnFactory::new(
            |ty, _, _| matches!(ty.shape(), TypeShape::Pointer { .. }),
            || Arc::new(PointerConverter),
        )
        .with_name("shape-pointer"),
    );
    registry.register_factory(
        FnFactory::new(|ty, _, _| ty.is_object_like(), || Arc::new(ObjectConverter))
            .with_name("shape-object"),
    );
}
