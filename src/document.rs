//! Parsed configuration/definition documents, re-parsed only on change

use crate::cache::{Arg, Compute, ContentPolicy, Memoizer};
use crate::error::{MemoirError, MemoirResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parses the `.json` or `.toml` file named by the first argument
#[derive(Debug, Default)]
pub struct DocumentLoader {
    parsed: usize,
}

impl DocumentLoader {
    /// Number of documents actually read from disk
    pub fn parsed(&self) -> usize {
        self.parsed
    }
}

impl Compute for DocumentLoader {
    type Value = Value;

    fn execute(&mut self, args: &[Arg]) -> MemoirResult<Value> {
        let path = args
            .first()
            .and_then(Arg::as_path)
            .ok_or_else(|| MemoirError::InvalidArgs("expected a document path".to_string()))?;
        self.parsed += 1;
        parse_document(path)
    }
}

/// Parse a document into a JSON value
pub fn parse_document(path: &Path) -> MemoirResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| MemoirError::io(format!("reading {}", path.display()), e))?;

    debug!("Parsing {}", path.display());
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("toml") => {
            let table: toml::Table = content.parse()?;
            Ok(serde_json::to_value(table)?)
        }
        _ => Err(MemoirError::UnsupportedDocument(path.to_path_buf())),
    }
}

/// Document cache keyed by path, invalidated by content digest
pub struct Documents {
    memo: Memoizer<DocumentLoader, ContentPolicy>,
}

impl Documents {
    pub fn new(cache_file: impl Into<PathBuf>) -> Self {
        Self {
            memo: Memoizer::with_policy(
                DocumentLoader::default(),
                ContentPolicy::new(),
                cache_file,
            ),
        }
    }

    pub fn load(&mut self, path: &Path) -> MemoirResult<Value> {
        self.memo.call(&[Arg::from(path)])
    }

    /// Documents parsed by this instance, cache hits excluded
    pub fn parsed(&self) -> usize {
        self.memo.compute().parsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn parses_toml_and_json() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("a.toml");
        let json_path = dir.path().join("a.json");
        fs::write(&toml_path, "name = \"hcpa\"\n[fields]\ndob = \"birth\"").unwrap();
        fs::write(&json_path, r#"{"name": "hcpa", "n": [1, 2]}"#).unwrap();

        assert_eq!(
            parse_document(&toml_path).unwrap(),
            json!({"name": "hcpa", "fields": {"dob": "birth"}})
        );
        assert_eq!(
            parse_document(&json_path).unwrap(),
            json!({"name": "hcpa", "n": [1, 2]})
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.yaml");
        fs::write(&path, "a: 1").unwrap();

        assert!(matches!(
            parse_document(&path),
            Err(MemoirError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn reload_follows_file_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("defs.json");
        let cache = dir.path().join(".document_cache");
        fs::write(&path, r#"{"v": 1}"#).unwrap();

        let mut docs = Documents::new(&cache);
        assert_eq!(docs.load(&path).unwrap(), json!({"v": 1}));
        assert_eq!(docs.load(&path).unwrap(), json!({"v": 1}));
        assert_eq!(docs.parsed(), 1);

        fs::write(&path, r#"{"v": 2}"#).unwrap();
        assert_eq!(docs.load(&path).unwrap(), json!({"v": 2}));
        assert_eq!(docs.parsed(), 2);

        // A fresh process is served the cached parse of the current bytes
        let mut docs = Documents::new(&cache);
        assert_eq!(docs.load(&path).unwrap(), json!({"v": 2}));
        assert_eq!(docs.parsed(), 0);
    }

    #[test]
    fn parse_errors_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        let cache = dir.path().join(".document_cache");
        fs::write(&path, "{ nope").unwrap();

        let mut docs = Documents::new(&cache);
        assert!(matches!(docs.load(&path), Err(MemoirError::Json(_))));
        assert!(!cache.exists());
    }
}
