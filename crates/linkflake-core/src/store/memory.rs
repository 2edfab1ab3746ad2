use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{Mapping, NewMapping, StoreError, store::MappingStore};

/// An in-process [`MappingStore`] backed by two hash indexes.
///
/// Ids are assigned from 1 upwards in insertion order. Contents are lost when
/// the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Indexes>,
}

#[derive(Debug, Default)]
struct Indexes {
    last_id: i64,
    by_code: HashMap<String, Mapping>,
    // original URL -> short code
    by_url: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.inner.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Mapping>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .by_url
            .get(url)
            .and_then(|code| inner.by_code.get(code))
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.inner.read().by_code.get(code).cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().by_code.contains_key(code))
    }

    async fn save(&self, mapping: NewMapping) -> Result<Mapping, StoreError> {
        let mut inner = self.inner.write();

        if inner.by_code.contains_key(mapping.short_code.as_str()) {
            return Err(StoreError::DuplicateCode(mapping.short_code.into_string()));
        }
        if inner.by_url.contains_key(&mapping.original_url) {
            return Err(StoreError::DuplicateUrl(mapping.original_url));
        }

        inner.last_id += 1;
        let mapping = mapping.into_mapping(inner.last_id);
        inner
            .by_url
            .insert(mapping.original_url.clone(), mapping.short_code.clone());
        inner
            .by_code
            .insert(mapping.short_code.clone(), mapping.clone());
        Ok(mapping)
    }
}
