//! Image row operations on the SQLite cache.
//!
//! Rows are keyed by the SHA-256 of the image key and carry the save time as
//! microseconds since the Unix epoch, so boundary comparisons stay exact.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::compute_cache_key;
use super::store::{CacheEntry, ContentStore};
use crate::Error;

fn from_micros(micros: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::ReadFailed(format!("saved_at out of range: {micros}")))
}

impl CacheDb {
    /// Number of cached images, expired ones included.
    pub async fn image_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl ContentStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        let key_hash = compute_cache_key(key);
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt = conn.prepare("SELECT key, data, saved_at_us FROM images WHERE key_hash = ?1")?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?, row.get::<_, i64>(2)?))
                });

                match result {
                    Ok((key, data, saved_at_us)) => {
                        Ok(Some(CacheEntry { key, data: Bytes::from(data), saved_at: from_micros(saved_at_us)? }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), Error> {
        let key_hash = compute_cache_key(&entry.key);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO images (key_hash, key, data, saved_at_us) VALUES (?1, ?2, ?3, ?4)",
                    params![key_hash, entry.key, entry.data.to_vec(), entry.saved_at.timestamp_micros()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let key_hash = compute_cache_key(key);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute("DELETE FROM images WHERE key_hash = ?1", params![key_hash])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_saved_at_or_before(&self, boundary: DateTime<Utc>) -> Result<u64, Error> {
        let boundary_us = boundary.timestamp_micros();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM images WHERE saved_at_us <= ?1", params![boundary_us])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn entry(key: &str, data: &'static [u8], saved_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(key, Bytes::from_static(data), saved_at)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let stored = entry("https://example.com/1.jpg", b"jpeg", t0());

        db.put(stored.clone()).await.unwrap();

        let retrieved = db.get("https://example.com/1.jpg").await.unwrap().unwrap();
        assert_eq!(retrieved, stored);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get("https://example.com/missing.jpg").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_existing_key_replaces() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(entry("k", b"one", t0())).await.unwrap();
        db.put(entry("k", b"two", t0() + Duration::seconds(1))).await.unwrap();

        let retrieved = db.get("k").await.unwrap().unwrap();
        assert_eq!(retrieved.data, Bytes::from_static(b"two"));
        assert_eq!(retrieved.saved_at, t0() + Duration::seconds(1));
        assert_eq!(db.image_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_put_replaces() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put(entry("k", b"one", t0())).await.unwrap();
        db.delete("k").await.unwrap();
        db.put(entry("k", b"two", t0() + Duration::hours(1))).await.unwrap();

        let retrieved = db.get("k").await.unwrap().unwrap();
        assert_eq!(retrieved.data, Bytes::from_static(b"two"));
        assert_eq!(retrieved.saved_at, t0() + Duration::hours(1));
        assert_eq!(db.image_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_key() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_saved_at_or_before_is_inclusive() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let boundary = t0();
        db.put(entry("older", b"a", boundary - Duration::seconds(1))).await.unwrap();
        db.put(entry("exact", b"b", boundary)).await.unwrap();
        db.put(entry("newer", b"c", boundary + Duration::seconds(1))).await.unwrap();

        let deleted = db.delete_saved_at_or_before(boundary).await.unwrap();
        assert_eq!(deleted, 2);

        assert!(db.get("older").await.unwrap().is_none());
        assert!(db.get("exact").await.unwrap().is_none());
        assert!(db.get("newer").await.unwrap().is_some());
    }
}
