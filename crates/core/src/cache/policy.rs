//! Cache expiration policy.
//!
//! Entries are valid for a fixed seven days after they were saved. The read
//! path and the invalidation sweep both derive their cut-off from
//! [`CachePolicy::expiration_boundary`], and both treat an entry saved exactly
//! on the boundary as expired.

use chrono::{DateTime, Duration, Utc};

/// Maximum age of a cached entry, in days.
pub const MAX_CACHE_AGE_DAYS: i64 = 7;

/// Fixed-TTL expiration rules for cached images.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachePolicy;

impl CachePolicy {
    /// Retention window as a duration.
    pub fn max_age() -> Duration {
        Duration::days(MAX_CACHE_AGE_DAYS)
    }

    /// Latest save time that already counts as expired at `now`.
    pub fn expiration_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
        now - Self::max_age()
    }

    /// Whether an entry saved at `saved_at` is still fresh at `now`.
    pub fn is_valid(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        saved_at > Self::expiration_boundary(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_valid_just_before_expiry() {
        let saved = t0();
        let now = saved + Duration::days(7) - Duration::seconds(1);
        assert!(CachePolicy::is_valid(saved, now));
    }

    #[test]
    fn test_invalid_exactly_at_expiry() {
        let saved = t0();
        let now = saved + Duration::days(7);
        assert!(!CachePolicy::is_valid(saved, now));
    }

    #[test]
    fn test_invalid_after_expiry() {
        let saved = t0();
        let now = saved + Duration::days(7) + Duration::seconds(1);
        assert!(!CachePolicy::is_valid(saved, now));
    }

    #[test]
    fn test_valid_when_saved_now() {
        assert!(CachePolicy::is_valid(t0(), t0()));
    }

    #[test]
    fn test_boundary() {
        let now = t0();
        assert_eq!(CachePolicy::expiration_boundary(now), now - Duration::days(7));
    }
}
