#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sv_serial as serial;
pub use sv_utils as utils;
pub use sv_value as value;
