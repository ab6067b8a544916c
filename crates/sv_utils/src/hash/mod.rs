//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{PassHashState, PassHasher};

/// A [`hashbrown::HashMap`] with a stable, fixed-seed hasher.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] with a stable, fixed-seed hasher.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A map keyed by values that already are well-distributed small integers.
///
/// The key is passed through [`PassHasher`] without mixing.
pub type PassHashMap<K, V> = hashbrown::HashMap<K, V, PassHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
