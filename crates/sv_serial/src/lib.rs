#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod config;
pub mod convert;
pub mod engine;
pub mod model;
pub mod poly;
pub mod shapes;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::SerializerConfig;
pub use engine::Serializer;
pub use error::{Error, ErrorKind};
