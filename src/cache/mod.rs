//! Persistent call-result cache with pluggable staleness
//!
//! A [`Memoizer`] wraps a [`Compute`] and remembers its results on disk,
//! keyed by the call arguments. Whether a remembered result may be reused is
//! decided by a [`StalenessPolicy`]:
//!
//! | Policy | Stored marker | Stale when |
//! |--------|---------------|------------|
//! | [`TimePolicy`] (default) | write time + TTL | now is past the marker |
//! | [`ContentPolicy`] | SHA256 of the input file | the digest changed |
//!
//! Calls whose arguments contain mutable containers are never cached.

pub mod fingerprint;
pub mod key;
pub mod memoizer;
pub mod policy;
pub mod store;

pub use fingerprint::fingerprint_file;
pub use key::{hashable, Arg, CacheKey};
pub use memoizer::{Compute, Memoizer};
pub use policy::{ContentPolicy, StalenessPolicy, TimePolicy, DEFAULT_TTL_DAYS};
pub use store::{CacheEntry, CacheStore};
