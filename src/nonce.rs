//! Timestamp-derived request identifiers.
//!
//! Nonces are not collision-checked, uniqueness relies on the wall clock.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default order lifetime.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

fn since_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Current unix time in milliseconds.
pub fn now_ms() -> u64 {
    since_epoch().as_millis() as u64
}

/// Current unix time in units of 100 nanoseconds, i.e. milliseconds scaled
/// by 10 000 with the sub-millisecond part preserved.
pub fn precise() -> u64 {
    (since_epoch().as_nanos() / 100) as u64
}

/// Expiration timestamp (unix ms) of an order placed now with the default lifetime.
pub fn default_expiration() -> u64 {
    now_ms() + DEFAULT_EXPIRATION.as_millis() as u64
}
