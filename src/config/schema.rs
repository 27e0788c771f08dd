//! Configuration schema for memoir
//!
//! Configuration is stored at `~/.config/memoir/config.toml`

use crate::cache::DEFAULT_TTL_DAYS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Secondary file merged over this one (API tokens live there)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<PathBuf>,

    /// Cache settings
    pub cache: CacheConfig,

    /// REDCap settings
    pub redcap: RedcapConfig,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cache files (default: platform cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Days before a fetched result expires
    pub ttl_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

/// REDCap API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedcapConfig {
    /// API endpoint used by datasources without their own url
    pub api_url: String,

    /// Named REDCap projects
    pub datasources: BTreeMap<String, DatasourceConfig>,

    /// Named studies built on top of datasources
    pub studies: BTreeMap<String, StudyConfig>,
}

impl Default for RedcapConfig {
    fn default() -> Self {
        Self {
            api_url: "https://redcap.example.org/api/".to_string(),
            datasources: BTreeMap::new(),
            studies: BTreeMap::new(),
        }
    }
}

/// A single REDCap project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceConfig {
    /// API token for the project
    pub token: String,

    /// Endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Field mapping for a study
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Datasource the study's records come from
    pub datasource: String,

    /// Events to export (empty = all)
    pub events: Vec<String>,

    /// Field holding `<subject>_<flag>` identifiers
    pub subject_field: String,

    /// Field holding the interview date
    pub interview_date_field: String,

    /// Field holding the date of birth
    pub dob_field: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            datasource: String::new(),
            events: vec![],
            subject_field: "subject_id".to_string(),
            interview_date_field: "interview_date".to_string(),
            dob_field: "dob".to_string(),
        }
    }
}

impl RedcapConfig {
    /// API endpoint of a named datasource, if it is configured
    pub fn endpoint(&self, datasource: &str) -> Option<&str> {
        self.datasources
            .get(datasource)
            .map(|ds| ds.url.as_deref().unwrap_or(&self.api_url))
    }
}

impl StudyConfig {
    /// Fields every study export needs
    pub fn required_fields(&self) -> Vec<String> {
        vec![
            self.subject_field.clone(),
            self.interview_date_field.clone(),
            self.dob_field.clone(),
        ]
    }
}

impl Config {
    /// Copy with API tokens masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for ds in config.redcap.datasources.values_mut() {
            if !ds.token.is_empty() {
                ds.token = "********".to_string();
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[redcap]"));
        assert!(toml.contains("ttl_days = 7"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.cache.ttl_days, 7);
        assert!(config.redcap.datasources.is_empty());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [redcap.datasources.hcpa]
            token = "abc"

            [redcap.studies.aging]
            datasource = "hcpa"
            events = ["v1_arm_1"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.redcap.datasources["hcpa"].token, "abc");
        assert_eq!(config.redcap.datasources["hcpa"].url, None);
        let study = &config.redcap.studies["aging"];
        assert_eq!(study.events, vec!["v1_arm_1"]);
        assert_eq!(study.dob_field, "dob"); // default preserved
    }

    #[test]
    fn endpoint_prefers_datasource_url() {
        let mut config = RedcapConfig::default();
        config.datasources.insert("hcpa".to_string(), DatasourceConfig::default());
        config.datasources.insert(
            "ksads".to_string(),
            DatasourceConfig {
                token: String::new(),
                url: Some("https://other.example/api/".to_string()),
            },
        );

        assert_eq!(config.endpoint("hcpa"), Some("https://redcap.example.org/api/"));
        assert_eq!(config.endpoint("ksads"), Some("https://other.example/api/"));
        assert_eq!(config.endpoint("nope"), None);
    }

    #[test]
    fn redacted_masks_tokens() {
        let mut config = Config::default();
        config.redcap.datasources.insert(
            "hcpa".to_string(),
            DatasourceConfig {
                token: "secret".to_string(),
                url: None,
            },
        );

        let shown = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(!shown.contains("secret"));
        assert_eq!(config.redcap.datasources["hcpa"].token, "secret");
    }
}
