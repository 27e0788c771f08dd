//! Call arguments and the cache keys derived from them
//!
//! Arguments are dynamic values so one memoizer can serve calls of any shape.
//! Only immutable-in-effect variants may become part of a key; `List` and
//! `Map` model mutable containers and make a call uncacheable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single positional argument of a memoized call
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Path(PathBuf),
    /// Fixed sequence; hashable when every element is
    Tuple(Vec<Arg>),
    /// Mutable sequence, never hashable
    List(Vec<Arg>),
    /// Mutable mapping, never hashable
    Map(BTreeMap<String, Arg>),
}

impl Arg {
    /// Build a tuple argument from anything convertible into args
    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Arg>,
    {
        Self::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Whether this value supports a stable equality/hash contract
    pub fn is_hashable(&self) -> bool {
        match self {
            Self::List(_) | Self::Map(_) => false,
            Self::Tuple(items) => items.iter().all(Arg::is_hashable),
            _ => true,
        }
    }

    /// Interpret the argument as a filesystem path, if it names one
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Str(s) => Some(Path::new(s)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// String elements of a tuple or list argument; `Null` is empty
    pub fn as_strings(&self) -> Option<Vec<String>> {
        match self {
            Self::Null => Some(Vec::new()),
            Self::Tuple(items) | Self::List(items) => items
                .iter()
                .map(|a| a.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Tuple(items) => write!(f, "({})", join(items)),
            Self::List(items) => write!(f, "[{}]", join(items)),
            Self::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

fn join(items: &[Arg]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<PathBuf> for Arg {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&Path> for Arg {
    fn from(p: &Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

/// Report whether an argument tuple can serve as a cache key
pub fn hashable(args: &[Arg]) -> bool {
    args.iter().all(Arg::is_hashable)
}

/// Argument tuple that passed the hashability check
///
/// Ordered so the persisted store is written deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Arg>", into = "Vec<Arg>")]
pub struct CacheKey(Vec<Arg>);

impl CacheKey {
    /// Derive a key from call arguments, or `None` if any is unhashable
    pub fn new(args: &[Arg]) -> Option<Self> {
        hashable(args).then(|| Self(args.to_vec()))
    }

    pub fn args(&self) -> &[Arg] {
        &self.0
    }
}

impl TryFrom<Vec<Arg>> for CacheKey {
    type Error = String;

    fn try_from(args: Vec<Arg>) -> Result<Self, Self::Error> {
        if hashable(&args) {
            Ok(Self(args))
        } else {
            Err(format!("unhashable cache key ({})", join(&args)))
        }
    }
}

impl From<CacheKey> for Vec<Arg> {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join(&self.0))
    }
}
