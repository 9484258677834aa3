//! Storage contract for cached image bytes.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::Error;

/// A cached blob and the instant it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub data: Bytes,
    pub saved_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, data: Bytes, saved_at: DateTime<Utc>) -> Self {
        Self { key: key.into(), data, saved_at }
    }
}

/// Key/value byte store with timestamped entries.
///
/// Holds at most one entry per key. A `put` or `delete` for a key must be
/// either fully visible or not visible at all to a later `get` of that key.
/// Writers are expected to be serialized by the implementation.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the entry for `key`, if any.
    ///
    /// Implementations may report absence either as `Ok(None)` or as
    /// [`Error::NotFound`].
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error>;

    /// Insert an entry, replacing any existing entry for the same key.
    async fn put(&self, entry: CacheEntry) -> Result<(), Error>;

    /// Remove the entry for `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Remove every entry with `saved_at <= boundary`, returning how many were removed.
    async fn delete_saved_at_or_before(&self, boundary: DateTime<Utc>) -> Result<u64, Error>;
}

#[async_trait]
impl<T: ContentStore + ?Sized> ContentStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        (**self).get(key).await
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), Error> {
        (**self).put(entry).await
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        (**self).delete(key).await
    }

    async fn delete_saved_at_or_before(&self, boundary: DateTime<Utc>) -> Result<u64, Error> {
        (**self).delete_saved_at_or_before(boundary).await
    }
}
