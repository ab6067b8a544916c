#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod number;
mod ser;
mod value;

// -----------------------------------------------------------------------------
// Top-level exports

pub use number::Number;
pub use value::{Value, ValueKind};

// -----------------------------------------------------------------------------
// Re-export crates

pub use num_bigint;
