#![doc = include_str!("../README.md")]

mod error;
pub mod service;
pub mod store;
mod types;

pub use error::*;
pub use service::{Shortener, ShortenerConfig, validate_url};
pub use store::{MappingStore, MemoryStore, SqliteStore};
pub use types::*;
// Public re-export so downstream crates can reach the generator types via
// `linkflake_core::linkflake`
pub use linkflake;
