//! Memoizer orchestrating lookup, freshness checks and recomputation

use super::key::{Arg, CacheKey};
use super::policy::{StalenessPolicy, TimePolicy};
use super::store::{CacheEntry, CacheStore};
use crate::error::MemoirResult;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// The expensive computation whose results get cached
pub trait Compute {
    /// Result type; cloned on every cache hit so callers own their copy
    type Value: Clone + Serialize + DeserializeOwned;

    fn execute(&mut self, args: &[Arg]) -> MemoirResult<Self::Value>;
}

/// Persistent call-result cache around a [`Compute`]
pub struct Memoizer<C: Compute, P: StalenessPolicy = TimePolicy> {
    compute: C,
    policy: P,
    store: CacheStore<C::Value, P::Marker>,
}

impl<C: Compute> Memoizer<C, TimePolicy> {
    /// Memoize with the default seven day expiry
    pub fn new(compute: C, cache_file: impl Into<PathBuf>) -> Self {
        Self::with_policy(compute, TimePolicy::default(), cache_file)
    }

    /// Memoize with wall-clock expiry after `days`
    pub fn with_ttl_days(compute: C, days: u32, cache_file: impl Into<PathBuf>) -> Self {
        Self::with_policy(compute, TimePolicy::from_days(days), cache_file)
    }
}

impl<C: Compute, P: StalenessPolicy> Memoizer<C, P> {
    /// Memoize with an explicit staleness policy
    ///
    /// The cache file is read here; a missing or corrupt file starts empty.
    pub fn with_policy(compute: C, policy: P, cache_file: impl Into<PathBuf>) -> Self {
        Self {
            compute,
            policy,
            store: CacheStore::load(cache_file),
        }
    }

    /// Return the result for `args`, computing it only when needed
    ///
    /// Unhashable arguments bypass the cache entirely. A failed computation
    /// leaves the cache untouched; a failed save is returned as an error.
    pub fn call(&mut self, args: &[Arg]) -> MemoirResult<C::Value> {
        let Some(key) = CacheKey::new(args) else {
            let shown: Vec<String> = args.iter().map(ToString::to_string).collect();
            warn!("Uncacheable args: ({})", shown.join(", "));
            return self.compute.execute(args);
        };

        let current = self.policy.mark_now(&key)?;

        match self.store.get(&key) {
            Some(entry) if !self.policy.is_stale(&entry.marker, &current) => {
                debug!("Cache hit for {}", key);
                return Ok(entry.value.clone());
            }
            Some(entry) => debug!("Cache entry for {} is stale ({:?})", key, entry.marker),
            None => debug!("Cache miss for {}", key),
        }

        let value = self.compute.execute(key.args())?;
        let marker = self.policy.mark_on_write(&key, &current)?;
        self.store.put(
            key,
            CacheEntry {
                value: value.clone(),
                marker,
            },
        )?;

        Ok(value)
    }

    pub fn compute(&self) -> &C {
        &self.compute
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn store(&self) -> &CacheStore<C::Value, P::Marker> {
        &self.store
    }
}
