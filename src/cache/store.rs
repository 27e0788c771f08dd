//! Durable key → (value, marker) mapping
//!
//! The whole mapping lives in one JSON file that is read once when the store
//! is opened and rewritten in full on every update. There is no locking: two
//! processes sharing a cache file race, and whichever saves last wins,
//! discarding the other's entries.

use super::key::CacheKey;
use crate::error::{MemoirError, MemoirResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk format version; files with another version load as empty
const FORMAT_VERSION: u32 = 1;

/// A cached value and the marker its policy stamped it with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V, M> {
    pub value: V,
    pub marker: M,
}

#[derive(Serialize)]
struct FileRef<'a, V, M> {
    version: u32,
    entries: Vec<RecordRef<'a, V, M>>,
}

#[derive(Serialize)]
struct RecordRef<'a, V, M> {
    key: &'a CacheKey,
    value: &'a V,
    marker: &'a M,
}

#[derive(Deserialize)]
struct FileOwned<V, M> {
    version: u32,
    entries: Vec<Record<V, M>>,
}

#[derive(Deserialize)]
struct Record<V, M> {
    key: CacheKey,
    value: V,
    marker: M,
}

/// Write-through cache backed by a single file
#[derive(Debug)]
pub struct CacheStore<V, M> {
    path: PathBuf,
    entries: BTreeMap<CacheKey, CacheEntry<V, M>>,
}

impl<V, M> CacheStore<V, M>
where
    V: Serialize + DeserializeOwned,
    M: Serialize + DeserializeOwned,
{
    /// Open the store at `path`
    ///
    /// A missing, unreadable or unparseable file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(reason) => {
                warn!("Ignoring cache {}: {}", path.display(), reason);
                BTreeMap::new()
            }
        };
        debug!("Loaded {} cache entries from {}", entries.len(), path.display());
        Self { path, entries }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<CacheKey, CacheEntry<V, M>>, String> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let file: FileOwned<V, M> = serde_json::from_str(&content).map_err(|e| e.to_string())?;

        if file.version != FORMAT_VERSION {
            return Err(format!(
                "format version {} (expected {})",
                file.version, FORMAT_VERSION
            ));
        }

        Ok(file
            .entries
            .into_iter()
            .map(|r| {
                (
                    r.key,
                    CacheEntry {
                        value: r.value,
                        marker: r.marker,
                    },
                )
            })
            .collect())
    }

    /// Overwrite the backing file with the full mapping
    pub fn save(&self) -> MemoirResult<()> {
        let file = FileRef {
            version: FORMAT_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| RecordRef {
                    key,
                    value: &entry.value,
                    marker: &entry.marker,
                })
                .collect(),
        };

        let content =
            serde_json::to_string_pretty(&file).map_err(|e| MemoirError::CacheSerialize {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                MemoirError::io(format!("creating cache directory {}", parent.display()), e)
            })?;
        }

        fs::write(&self.path, content).map_err(|e| {
            MemoirError::io(format!("writing cache file {}", self.path.display()), e)
        })?;

        debug!("Saved {} cache entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    /// Store an entry and persist the whole mapping
    ///
    /// If persisting fails the previous entry for `key` is restored, so the
    /// in-memory mapping never holds something the file does not.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry<V, M>) -> MemoirResult<()> {
        let previous = self.entries.insert(key.clone(), entry);

        if let Err(e) = self.save() {
            match previous {
                Some(prev) => {
                    self.entries.insert(key, prev);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}

impl<V, M> CacheStore<V, M> {
    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry<V, M>> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &CacheEntry<V, M>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
