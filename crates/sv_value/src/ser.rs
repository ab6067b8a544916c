//! `serde_core` bridge for [`Value`].
//!
//! The conversion core never touches raw bytes; implementing [`Serialize`]
//! here lets any serde format crate act as the byte encoder for a finished
//! tree. Self-describing text formats have no native tag notion, so a
//! [`Tagged`](Value::Tagged) value renders as a two-entry map with the keys
//! `"@tag"` and `"@data"`. Binary formats with first-class tags should walk
//! the tree directly instead of going through serde.

use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{Number, Value};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.serialize_bytes(b),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Tagged(tag, payload) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("@tag", tag)?;
                map.serialize_entry("@data", &**payload)?;
                map.end()
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            // Arbitrary precision does not fit serde's numeric model.
            Self::Big(b) => serializer.collect_str(b),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
