use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use sv_value::{Value, ValueKind};

use crate::config::MultiMapEncoding;
use crate::convert::{Converter, Direction};
use crate::engine::{DecodeContext, EncodeContext};
use crate::error::Error;
use crate::model::ObjectModel;
use crate::types::{TypeDescriptor, TypeRegistry, TypeShape};

// -----------------------------------------------------------------------------
// MapConverter

/// Converts string-keyed maps (one value per key) to and from maps.
pub struct MapConverter;

impl<M: ObjectModel> Converter<M> for MapConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        matches!(ty.shape(), TypeShape::Map { .. })
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let &TypeShape::Map { value: value_ty } = ty.shape() else {
            return Err(wrong_shape(ty, "map"));
        };
        let entries = entries_of(ctx.model(), value, ty)?;

        let mut out = Vec::with_capacity(entries.len());
        for (key, entry) in &entries {
            out.push((key.clone(), ctx.encode_key(key, entry, value_ty)?));
        }
        Ok(Value::Map(out))
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let &TypeShape::Map { value: value_ty } = ty.shape() else {
            return Err(wrong_shape(ty, "map"));
        };
        let Some(entries) = input.as_map() else {
            return Err(Error::kind_mismatch(ValueKind::Map, input.kind()));
        };

        let mut decoded = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            decoded.push((key.clone(), ctx.decode_key(key, entry, value_ty)?));
        }
        build_map(ctx.model(), ty, decoded)
    }
}

// -----------------------------------------------------------------------------
// MultiMapConverter

/// Converts string-keyed multi-maps, where a key may carry several values.
///
/// The encoded representation follows the configured
/// [`MultiMapEncoding`](crate::config::MultiMapEncoding); decoding accepts
/// either representation regardless of the setting, mirroring the lenient
/// reader of the original pipeline.
pub struct MultiMapConverter;

impl<M: ObjectModel> Converter<M> for MultiMapConverter {
    fn matches(&self, ty: &TypeDescriptor, _direction: Direction, _types: &TypeRegistry) -> bool {
        matches!(ty.shape(), TypeShape::MultiMap { .. })
    }

    fn encode(
        &self,
        value: &M::Value,
        ty: &TypeDescriptor,
        ctx: &mut EncodeContext<'_, '_, M>,
    ) -> Result<Value, Error> {
        let &TypeShape::MultiMap { value: value_ty } = ty.shape() else {
            return Err(wrong_shape(ty, "multi-map"));
        };
        let entries = entries_of(ctx.model(), value, ty)?;

        match ctx.config().multi_map_encoding {
            MultiMapEncoding::NestedArrayPerKey => {
                // One map entry per key, in first-encounter order; the values
                // under one key keep their relative order.
                let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();
                for (key, entry) in &entries {
                    let encoded = ctx.encode_key(key, entry, value_ty)?;
                    match grouped.iter_mut().find(|(k, _)| k == key) {
                        Some((_, bucket)) => bucket.push(encoded),
                        None => grouped.push((key.clone(), alloc::vec![encoded])),
                    }
                }
                Ok(Value::Map(
                    grouped
                        .into_iter()
                        .map(|(k, bucket)| (k, Value::Array(bucket)))
                        .collect(),
                ))
            }
            MultiMapEncoding::ListOfPairs => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, entry) in &entries {
                    let encoded = ctx.encode_key(key, entry, value_ty)?;
                    out.push(Value::Array(alloc::vec![
                        Value::String(key.clone()),
                        encoded,
                    ]));
                }
                Ok(Value::Array(out))
            }
        }
    }

    fn decode(
        &self,
        input: &Value,
        ty: &TypeDescriptor,
        ctx: &mut DecodeContext<'_, '_, M>,
    ) -> Result<M::Value, Error> {
        let &TypeShape::MultiMap { value: value_ty } = ty.shape() else {
            return Err(wrong_shape(ty, "multi-map"));
        };

        let mut decoded: Vec<(String, M::Value)> = Vec::new();
        match input {
            Value::Map(entries) => {
                for (key, entry) in entries {
                    // A nested array is one bucket of values; anything else
                    // is treated as a single value for the key.
                    match entry.as_array() {
                        Some(bucket) => {
                            for item in bucket {
                                decoded.push((key.clone(), ctx.decode_key(key, item, value_ty)?));
                            }
                        }
                        None => {
                            decoded.push((key.clone(), ctx.decode_key(key, entry, value_ty)?));
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    let Some(pair) = item.as_array() else {
                        return Err(Error::kind_mismatch(ValueKind::Array, item.kind()));
                    };
                    let [key, entry] = pair else {
                        return Err(Error::type_mismatch(
                            "two-element [key, value] array",
                            item.kind(),
                        ));
                    };
                    let Some(key) = key.as_str() else {
                        return Err(Error::kind_mismatch(ValueKind::String, key.kind()));
                    };
                    decoded.push((String::from(key), ctx.decode_key(key, entry, value_ty)?));
                }
            }
            _ => return Err(Error::kind_mismatch(ValueKind::Map, input.kind())),
        }

        build_map(ctx.model(), ty, decoded)
    }
}

// -----------------------------------------------------------------------------

fn entries_of<M: ObjectModel>(
    model: &M,
    value: &M::Value,
    ty: &TypeDescriptor,
) -> Result<Vec<(String, M::Value)>, Error> {
    model.map_entries(value).ok_or_else(|| {
        Error::conversion_failed(format!(
            "value of type `{}` is not iterable as a map",
            ty.name()
        ))
    })
}

fn build_map<M: ObjectModel>(
    model: &M,
    ty: &TypeDescriptor,
    entries: Vec<(String, M::Value)>,
) -> Result<M::Value, Error> {
    model.build_map(ty.key(), entries).ok_or_else(|| {
        Error::conversion_failed(format!("cannot build a `{}` from entries", ty.name()))
    })
}

fn wrong_shape(ty: &TypeDescriptor, shape: &str) -> Error {
    Error::conversion_failed(format!(
        "{shape} converter resolved for mismatched type `{}`",
        ty.name()
    ))
}

// -----------------------------------------------------------------------------
// Tests
