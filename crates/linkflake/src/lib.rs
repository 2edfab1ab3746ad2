#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg_attr(docsrs, doc(cfg(feature = "base62")))]
#[cfg(feature = "base62")]
pub mod base62;
pub mod generator;
pub mod id;
pub mod time;

#[cfg(feature = "base62")]
pub use crate::base62::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
