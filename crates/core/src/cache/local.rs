//! Local image cache on top of a [`ContentStore`].
//!
//! Reads reject entries older than the retention window, writes replace any
//! previous entry by deleting it before inserting, and [`LocalImageCache::invalidate`]
//! sweeps expired rows. None of the operations retry.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::task::JoinHandle;

use super::policy::CachePolicy;
use super::store::{CacheEntry, ContentStore};
use crate::Error;
use crate::clock::{Clock, SystemClock};
use crate::loader::{ImageCache, ImageLoader};

/// Read-through, write-replace image cache.
#[derive(Debug, Clone)]
pub struct LocalImageCache<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: ContentStore> LocalImageCache<S> {
    /// Create a cache that reads the wall clock.
    pub fn new(store: S) -> Self {
        Self { store, clock: SystemClock }
    }
}

impl<S: ContentStore, C: Clock> LocalImageCache<S, C> {
    /// Create a cache with an explicit clock.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the cached bytes for `key` if they are still fresh.
    pub async fn load(&self, key: &str) -> Result<Bytes, Error> {
        let entry = match self.store.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return Err(Error::NotFound(key.to_string())),
            Err(Error::NotFound(msg)) => return Err(Error::NotFound(msg)),
            Err(e) => return Err(Error::ReadFailed(e.to_string())),
        };

        if !CachePolicy::is_valid(entry.saved_at, self.clock.now()) {
            tracing::debug!(key, saved_at = %entry.saved_at, "cached image expired");
            return Err(Error::NotFound(key.to_string()));
        }

        tracing::debug!(key, bytes = entry.data.len(), "image cache hit");
        Ok(entry.data)
    }

    /// Replace whatever is cached for `key` with `data`, stamped with the current time.
    ///
    /// The old entry is deleted first; if that fails the insert is not attempted.
    pub async fn save(&self, key: &str, data: Bytes) -> Result<(), Error> {
        self.store
            .delete(key)
            .await
            .map_err(|e| Error::OldDataRemovalFailed(e.to_string()))?;

        let entry = CacheEntry::new(key, data, self.clock.now());
        self.store.put(entry).await.map_err(|e| Error::SaveFailed(e.to_string()))
    }

    /// Delete every entry saved at or before the expiration boundary.
    ///
    /// Returns the number of deleted entries.
    pub async fn invalidate(&self) -> Result<u64, Error> {
        let boundary = CachePolicy::expiration_boundary(self.clock.now());
        let deleted = self
            .store
            .delete_saved_at_or_before(boundary)
            .await
            .map_err(|e| Error::InvalidateFailed(e.to_string()))?;

        tracing::debug!(deleted, boundary = %boundary, "invalidated expired images");
        Ok(deleted)
    }
}

impl<S, C> LocalImageCache<S, C>
where
    S: ContentStore + 'static,
    C: Clock + 'static,
{
    /// Run [`invalidate`](Self::invalidate) on a detached task, logging the outcome.
    pub fn spawn_invalidate(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.invalidate().await {
                tracing::warn!(error = %e, "cache invalidation failed");
            }
        })
    }
}

#[async_trait]
impl<S: ContentStore, C: Clock> ImageLoader for LocalImageCache<S, C> {
    async fn load(&self, key: &str) -> Result<Bytes, Error> {
        LocalImageCache::load(self, key).await
    }
}

#[async_trait]
impl<S: ContentStore, C: Clock> ImageCache for LocalImageCache<S, C> {
    async fn save(&self, key: &str, data: Bytes) -> Result<(), Error> {
        LocalImageCache::save(self, key, data).await
    }
}
