//! Provide `FixedHasher` and `PassHasher`.
//!
//! `FixedHasher` is based on the `foldhash` crate and produces stable hash
//! results through a fixed hash seed.
//!
//! `PassHasher` passes small integer keys through without mixing.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A0F_33D1_84C2_97EB);

/// A fixed hasher whose results depend only on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`], created through
/// [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use sv_utils::hash::FixedHashState;
///
/// let mut hasher = FixedHashState.build_hasher();
/// 3.hash(&mut hasher);
/// let result = hasher.finish();
///
/// println!("Hash Result {result}"); // Fixed Result
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// PassHasher

/// A pass-through hash that directly stores the written value as a `u64`.
///
/// Which can be created through [`PassHashState::build_hasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct PassHasher {
    hash: u64,
}

impl Hasher for PassHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // Usually `write_u64`/`write_u32` are hit instead; this path keeps
        // `write_u32(10)` equal to `write_u64(10)`.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.hash = i as u64;
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// A fixed hasher without any additional mixing.
///
/// Only stores one `u64`, assigned directly by `write_u64`/`write_u32`.
/// Other methods fall back to `write`, which adds the input bytes in reverse
/// order while rotating left.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use sv_utils::hash::PassHashState;
///
/// let mut hasher = PassHashState.build_hasher();
/// 3.hash(&mut hasher);
/// let result = hasher.finish();
///
/// assert_eq!(result, 3_u64);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct PassHashState;

impl BuildHasher for PassHashState {
    type Hasher = PassHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        PassHasher { hash: 0 }
    }
}
