//! Injectable source of "now".

use chrono::{DateTime, Utc};

/// Provides the current time to cache operations.
///
/// Implemented for [`SystemClock`] and for any `Fn() -> DateTime<Utc>`, so tests
/// can pin time with a closure.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
