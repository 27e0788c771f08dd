//! Staleness policies deciding whether a cached entry may be reused
//!
//! A policy stamps every stored entry with a marker and later compares that
//! marker against a freshly computed one. The memoizer never looks inside a
//! marker, so policies are free to choose what "fresh" means.

use super::fingerprint::fingerprint_file;
use super::key::CacheKey;
use crate::error::{MemoirError, MemoirResult};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// Default time-to-live for the time-based policy, in days
pub const DEFAULT_TTL_DAYS: u32 = 7;

/// Freshness contract injected into a [`Memoizer`](super::Memoizer)
pub trait StalenessPolicy {
    /// Opaque freshness stamp, persisted next to each value
    type Marker: Clone + Debug + Serialize + DeserializeOwned;

    /// Marker describing the world right now, for these arguments
    fn mark_now(&self, key: &CacheKey) -> MemoirResult<Self::Marker>;

    /// Marker stored alongside a freshly computed value
    ///
    /// `current` is the marker taken before the computation ran; by default
    /// it is stored unchanged, so the value stays tied to the inputs it was
    /// computed from even if they change mid-computation.
    fn mark_on_write(
        &self,
        _key: &CacheKey,
        current: &Self::Marker,
    ) -> MemoirResult<Self::Marker> {
        Ok(current.clone())
    }

    /// Whether an entry stamped with `stored` is outdated given `current`
    fn is_stale(&self, stored: &Self::Marker, current: &Self::Marker) -> bool;
}

/// Wall-clock expiry
///
/// The stored marker is the expiry instant (write time plus TTL), not the
/// time the value was computed. An entry is stale once `now` passes it.
#[derive(Debug, Clone, Copy)]
pub struct TimePolicy {
    ttl: Duration,
}

impl TimePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn from_days(days: u32) -> Self {
        Self::from_secs(u64::from(days) * 60 * 60 * 24)
    }

    pub fn from_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self::from_days(DEFAULT_TTL_DAYS)
    }
}

impl StalenessPolicy for TimePolicy {
    type Marker = DateTime<Utc>;

    fn mark_now(&self, _key: &CacheKey) -> MemoirResult<Self::Marker> {
        Ok(Utc::now())
    }

    fn mark_on_write(
        &self,
        _key: &CacheKey,
        _current: &Self::Marker,
    ) -> MemoirResult<Self::Marker> {
        Ok(Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    fn is_stale(&self, stored: &Self::Marker, current: &Self::Marker) -> bool {
        current > stored
    }
}

/// Content fingerprint of a file named by one of the call arguments
///
/// Elapsed time is irrelevant: an entry stays fresh until the file's bytes
/// change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPolicy {
    arg_index: usize,
}

impl ContentPolicy {
    /// Fingerprint the file named by the first argument
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint the file named by the argument at `arg_index`
    pub fn at(arg_index: usize) -> Self {
        Self { arg_index }
    }
}

impl StalenessPolicy for ContentPolicy {
    type Marker = String;

    fn mark_now(&self, key: &CacheKey) -> MemoirResult<Self::Marker> {
        let path = key
            .args()
            .get(self.arg_index)
            .and_then(|a| a.as_path())
            .ok_or(MemoirError::NoFingerprintArg {
                index: self.arg_index,
            })?;
        fingerprint_file(path)
    }

    fn is_stale(&self, stored: &Self::Marker, current: &Self::Marker) -> bool {
        stored != current
    }
}
