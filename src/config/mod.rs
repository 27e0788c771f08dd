//! Configuration management for memoir

pub mod schema;

pub use schema::{CacheConfig, Config, DatasourceConfig, RedcapConfig, StudyConfig};

use crate::error::{MemoirError, MemoirResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("memoir")
            .join("config.toml")
    }

    /// Directory for cache files, honoring `[cache] dir`
    pub fn cache_dir(config: &Config) -> PathBuf {
        match &config.cache.dir {
            Some(dir) => expand_home(dir),
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("memoir"),
        }
    }

    /// Load configuration, falling back to defaults if not exists
    pub fn load(&self) -> MemoirResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file, merging its secrets file
    pub fn load_from_file(&self, path: &Path) -> MemoirResult<Config> {
        let invalid = |reason: String| MemoirError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let mut table = read_table(path)?.unwrap_or_default();

        if let Some(secrets) = table.get("secrets") {
            let secrets = secrets
                .as_str()
                .ok_or_else(|| invalid("`secrets` must be a path".to_string()))?;
            let secrets_path = resolve_relative(path, &expand_home(Path::new(secrets)));

            match read_table(&secrets_path)? {
                Some(overlay) => {
                    debug!("Merging secrets from {}", secrets_path.display());
                    merge_tables(&mut table, overlay);
                }
                None => debug!("Secrets file {} not found", secrets_path.display()),
            }
        }

        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| invalid(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> MemoirResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            MemoirError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> MemoirResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| MemoirError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a TOML file as a table; `None` if it does not exist
fn read_table(path: &Path) -> MemoirResult<Option<toml::Table>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| MemoirError::io(format!("reading config from {}", path.display()), e))?;

    content
        .parse::<toml::Table>()
        .map(Some)
        .map_err(|e| MemoirError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Deep-merge `overlay` into `base`
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Resolve `target` against the directory containing `origin`
fn resolve_relative(origin: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    origin
        .parent()
        .map(|dir| dir.join(target))
        .unwrap_or_else(|| target.to_path_buf())
}
