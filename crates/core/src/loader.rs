//! Image loader contracts and their composition.
//!
//! [`FallbackLoader`] tries a primary loader and falls back to a secondary one
//! on any failure. [`CachingLoader`] writes successful results into an
//! [`ImageCache`] without letting a failed write reach the caller. Together
//! they give "cache first, then network, then repopulate the cache":
//!
//! ```text
//! FallbackLoader(primary: local cache, fallback: CachingLoader(remote, cache: local cache))
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::Error;
use crate::cache::{ContentStore, LocalImageCache};
use crate::clock::Clock;

/// Loads image bytes for a key (usually the image URL).
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, key: &str) -> Result<Bytes, Error>;
}

/// Destination for images worth keeping locally.
#[async_trait]
pub trait ImageCache: Send + Sync {
    async fn save(&self, key: &str, data: Bytes) -> Result<(), Error>;
}

#[async_trait]
impl<T: ImageLoader + ?Sized> ImageLoader for Arc<T> {
    async fn load(&self, key: &str) -> Result<Bytes, Error> {
        (**self).load(key).await
    }
}

#[async_trait]
impl<T: ImageCache + ?Sized> ImageCache for Arc<T> {
    async fn save(&self, key: &str, data: Bytes) -> Result<(), Error> {
        (**self).save(key, data).await
    }
}

/// Loader that falls back to a second loader when the first one fails.
#[derive(Debug, Clone)]
pub struct FallbackLoader<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ImageLoader, F: ImageLoader> FallbackLoader<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: ImageLoader, F: ImageLoader> ImageLoader for FallbackLoader<P, F> {
    async fn load(&self, key: &str) -> Result<Bytes, Error> {
        match self.primary.load(key).await {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::debug!(key, error = %e, "primary loader failed, using fallback");
                self.fallback.load(key).await
            }
        }
    }
}

/// Loader that stores every successful result in a cache.
///
/// Cache write failures are logged and dropped; they never change the result
/// returned to the caller.
#[derive(Debug, Clone)]
pub struct CachingLoader<L, C> {
    loader: L,
    cache: C,
}

impl<L: ImageLoader, C: ImageCache> CachingLoader<L, C> {
    pub fn new(loader: L, cache: C) -> Self {
        Self { loader, cache }
    }
}

#[async_trait]
impl<L: ImageLoader, C: ImageCache> ImageLoader for CachingLoader<L, C> {
    async fn load(&self, key: &str) -> Result<Bytes, Error> {
        let data = self.loader.load(key).await?;
        if let Err(e) = self.cache.save(key, data.clone()).await {
            tracing::warn!(key, error = %e, "failed to cache image");
        }
        Ok(data)
    }
}

/// The composed loader returned by [`cache_then_remote`].
pub type CacheThenRemote<S, C, R> =
    FallbackLoader<Arc<LocalImageCache<S, C>>, CachingLoader<R, Arc<LocalImageCache<S, C>>>>;

/// Compose a local cache and a remote loader.
///
/// Reads hit `cache` first. On a miss, an expired entry or a read error the
/// image comes from `remote` and is written back into `cache`.
pub fn cache_then_remote<S, C, R>(cache: Arc<LocalImageCache<S, C>>, remote: R) -> CacheThenRemote<S, C, R>
where
    S: ContentStore,
    C: Clock,
    R: ImageLoader,
{
    FallbackLoader::new(Arc::clone(&cache), CachingLoader::new(remote, cache))
}
