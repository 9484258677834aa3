//! Core types and shared functionality for photofeed.
//!
//! This crate provides:
//! - Local image cache with a fixed expiration policy, backed by SQLite or memory
//! - Cache-then-remote loader composition with write-through caching
//! - Forward-only pagination with continuations
//! - Per-slot cancellable image loading
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod loader;
pub mod paging;
pub mod slot;

pub use cache::{CacheDb, LocalImageCache, MemoryStore};
pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use loader::{CachingLoader, FallbackLoader, ImageCache, ImageLoader, cache_then_remote};
pub use paging::{LoadMore, PageLoader, PageRequest, Paginated, PaginatedFetcher};
pub use slot::{Delivery, ImageSlot, LoadedImage, SlotId, SlotState};
