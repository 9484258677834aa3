//! Local image cache.
//!
//! - [`policy`]: the fixed seven day expiration rule
//! - [`store`]: the [`ContentStore`] contract the cache is written against
//! - [`CacheDb`]: SQLite-backed store with async access via tokio-rusqlite,
//!   automatic migrations and WAL mode
//! - [`MemoryStore`]: in-process store
//! - [`LocalImageCache`]: freshness-checked reads, delete-then-insert writes,
//!   and the expiration sweep

pub mod connection;
pub mod hash;
pub mod images;
pub mod local;
pub mod memory;
pub mod migrations;
pub mod policy;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use local::LocalImageCache;
pub use memory::MemoryStore;
pub use policy::{CachePolicy, MAX_CACHE_AGE_DAYS};
pub use store::{CacheEntry, ContentStore};
