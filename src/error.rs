//! Error types for memoir
//!
//! All modules use `MemoirResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for memoir operations
pub type MemoirResult<T> = Result<T, MemoirError>;

/// All errors that can occur in memoir
#[derive(Error, Debug)]
pub enum MemoirError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache errors
    #[error("Failed to serialize cache {path}: {reason}")]
    CacheSerialize { path: PathBuf, reason: String },

    #[error("Failed to fingerprint {path}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Argument {index} does not reference a file to fingerprint")]
    NoFingerprintArg { index: usize },

    // Computation errors
    #[error("Computation failed: {0}")]
    Compute(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("Unsupported document format: {0}")]
    UnsupportedDocument(PathBuf),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // REDCap errors
    #[error("Datasource '{name}' is not configured. Available: {available}")]
    UnknownDatasource { name: String, available: String },

    #[error("Study '{name}' is not configured. Available: {available}")]
    UnknownStudy { name: String, available: String },

    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{table}: REDCap returned status {status}: {body}")]
    RedcapStatus {
        table: String,
        status: u16,
        body: String,
    },

    #[error("{table}: unexpected REDCap response: {reason}")]
    RedcapResponse { table: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MemoirError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a failure raised by an underlying computation
    pub fn compute<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Compute(Box::new(source))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownDatasource { .. } => {
                Some("Add it under [redcap.datasources.<name>] in config.toml")
            }
            Self::UnknownStudy { .. } => Some("Add it under [redcap.studies.<name>] in config.toml"),
            Self::RedcapStatus { status: 403, .. } => {
                Some("Check the API token in your secrets file")
            }
            Self::ConfigInvalid { .. } => Some("Run: memoir config show"),
            _ => None,
        }
    }
}
