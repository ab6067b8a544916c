//! Per-serializer configuration.

use crate::poly::PolymorphMode;
use crate::validate::ValidationFlags;

// -----------------------------------------------------------------------------
// MultiMapEncoding

/// How multi-valued maps are written.
///
/// Decoding accepts either representation regardless of this setting; the
/// encoding only governs what is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MultiMapEncoding {
    /// A map with one entry per key, each value being an array of all values
    /// for that key. Key order is the first-encounter order; the relative
    /// order of values under one key is preserved.
    #[default]
    NestedArrayPerKey,
    /// An array of two-element `[key, value]` arrays, one per (key, value)
    /// occurrence. Chosen when key order across duplicate keys must be
    /// reproduced exactly.
    ListOfPairs,
}

// -----------------------------------------------------------------------------
// LocaleFormat

/// How locale identifiers are written by locale-aware converters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LocaleFormat {
    /// BCP 47 language tags (`de-DE`).
    #[default]
    Bcp47,
    /// Full underscore-separated names (`de_DE`).
    Full,
}

// -----------------------------------------------------------------------------
// SerializerConfig

/// The per-serializer-instance settings.
///
/// A configuration is immutable during a single encode or decode call;
/// mutating it between calls never affects in-flight operations, as every
/// call snapshots nothing but reads the serializer it was started on.
#[derive(Clone, Debug, PartialEq)]
pub struct SerializerConfig {
    /// Whether decoding `Null` into a non-optional declared type yields the
    /// type's default instance instead of a type mismatch.
    pub allow_null_for_value_types: bool,
    /// Whether the host's object-identity property is serialized.
    pub keep_host_object_name: bool,
    /// Whether enumeration values are written as strings instead of integers.
    ///
    /// Honored by enum converters through the serialization context; the
    /// engine itself does not interpret enum values.
    pub enum_as_string: bool,
    /// The format locale-aware converters use, see [`LocaleFormat`].
    pub locale_format: LocaleFormat,
    /// Decode-time strictness rules, see [`ValidationFlags`].
    pub validation: ValidationFlags,
    /// When subtype discriminator tags are emitted and required, see
    /// [`PolymorphMode`].
    pub polymorphing: PolymorphMode,
    /// The representation of multi-valued maps, see [`MultiMapEncoding`].
    pub multi_map_encoding: MultiMapEncoding,
    /// Whether properties marked non-persistable are treated like ordinary
    /// ones (serialized, and counted as required by the validation engine).
    pub ignore_stored_attribute: bool,
    /// Opt-in explicit discriminator for variant types.
    ///
    /// Off by default: variants encode as their current alternative with no
    /// marker, and decode by trying alternatives in declaration order. When
    /// set, the alternative index is carried as a tag, removing the ambiguity
    /// of structurally identical alternatives.
    pub variant_discriminator: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            allow_null_for_value_types: true,
            keep_host_object_name: false,
            enum_as_string: false,
            locale_format: LocaleFormat::default(),
            validation: ValidationFlags::STANDARD,
            polymorphing: PolymorphMode::default(),
            multi_map_encoding: MultiMapEncoding::default(),
            ignore_stored_attribute: false,
            variant_discriminator: false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
