//! Durable lookup, existence and save operations for [`Mapping`]s.
//!
//! Two backends ship with the crate:
//! - [`MemoryStore`]: process-local, for tests and throwaway deployments
//! - [`SqliteStore`]: a SQLite database through `sqlx`

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Mapping, NewMapping, StoreError};

/// Storage contract used by the [`Shortener`](crate::Shortener).
///
/// Implementations enforce uniqueness of both the short code and the original
/// URL: [`save`](MappingStore::save) fails with [`StoreError::DuplicateCode`]
/// or [`StoreError::DuplicateUrl`] instead of overwriting.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Looks up the mapping for an exact original URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<Mapping>, StoreError>;

    /// Looks up the mapping for a short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Returns `true` if a mapping with this short code exists.
    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Persists a new mapping and returns it with its assigned id.
    async fn save(&self, mapping: NewMapping) -> Result<Mapping, StoreError>;
}

macro_rules! forward_mapping_store {
    ($($ptr:ty),*) => {
        $(
            #[async_trait]
            impl<S> MappingStore for $ptr
            where
                S: MappingStore + ?Sized,
            {
                async fn find_by_url(&self, url: &str) -> Result<Option<Mapping>, StoreError> {
                    (**self).find_by_url(url).await
                }

                async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
                    (**self).find_by_code(code).await
                }

                async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
                    (**self).exists_by_code(code).await
                }

                async fn save(&self, mapping: NewMapping) -> Result<Mapping, StoreError> {
                    (**self).save(mapping).await
                }
            }
        )*
    };
}

forward_mapping_store!(Box<S>, Arc<S>);
