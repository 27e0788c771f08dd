//! Memoized REDCap record exports

use super::client::{available, RedcapTable};
use super::study::shape_records;
use super::Records;
use crate::cache::{Arg, Compute, Memoizer, TimePolicy};
use crate::config::RedcapConfig;
use crate::error::{MemoirError, MemoirResult};
use std::path::PathBuf;
use tracing::info;

/// Record export as a cacheable computation
///
/// Arguments: `(datasource, endpoint, fields, events, forms)` where the last
/// three are tuples of strings (or null for "all"). The endpoint is part of
/// the key so that pointing a datasource at another server misses the cache;
/// the request itself always goes to the currently configured endpoint.
pub struct RecordExport {
    config: RedcapConfig,
}

impl RecordExport {
    pub fn new(config: RedcapConfig) -> Self {
        Self { config }
    }

    /// Build the argument tuple for an export
    pub fn args(
        &self,
        datasource: &str,
        fields: &[String],
        events: &[String],
        forms: &[String],
    ) -> Vec<Arg> {
        let endpoint = self
            .config
            .endpoint(datasource)
            .map_or(Arg::Null, Arg::from);
        vec![
            Arg::from(datasource),
            endpoint,
            Arg::tuple(fields.iter().cloned()),
            Arg::tuple(events.iter().cloned()),
            Arg::tuple(forms.iter().cloned()),
        ]
    }
}

impl Compute for RecordExport {
    type Value = Records;

    fn execute(&mut self, args: &[Arg]) -> MemoirResult<Records> {
        let invalid = || {
            let shown: Vec<String> = args.iter().map(ToString::to_string).collect();
            MemoirError::InvalidArgs(format!(
                "expected (datasource, endpoint, fields, events, forms), got ({})",
                shown.join(", ")
            ))
        };

        let [datasource, _endpoint, fields, events, forms] = args else {
            return Err(invalid());
        };
        let datasource = datasource.as_str().ok_or_else(invalid)?;
        let fields = fields.as_strings().ok_or_else(invalid)?;
        let events = events.as_strings().ok_or_else(invalid)?;
        let forms = forms.as_strings().ok_or_else(invalid)?;

        info!("Fetching {} from REDCap", datasource);
        RedcapTable::from_config(datasource, &self.config)?
            .export_records(&fields, &events, &forms)
    }
}

/// REDCap exports cached on disk with wall-clock expiry
pub struct CachedRedcap {
    memo: Memoizer<RecordExport, TimePolicy>,
}

impl CachedRedcap {
    pub fn new(config: RedcapConfig, ttl_days: u32, cache_file: impl Into<PathBuf>) -> Self {
        Self {
            memo: Memoizer::with_ttl_days(RecordExport::new(config), ttl_days, cache_file),
        }
    }

    fn config(&self) -> &RedcapConfig {
        &self.memo.compute().config
    }

    /// Records of a datasource, fetched at most once per TTL
    pub fn records(
        &mut self,
        datasource: &str,
        fields: &[String],
        events: &[String],
        forms: &[String],
    ) -> MemoirResult<Records> {
        let args = self.memo.compute().args(datasource, fields, events, forms);
        self.memo.call(&args)
    }

    /// Records of a configured study, reshaped
    ///
    /// `extra_fields = None` exports every field; otherwise the study's
    /// required fields plus the extras are exported.
    pub fn study(
        &mut self,
        name: &str,
        extra_fields: Option<&[String]>,
        keep_withdrawn: bool,
    ) -> MemoirResult<Records> {
        let study = self
            .config()
            .studies
            .get(name)
            .cloned()
            .ok_or_else(|| MemoirError::UnknownStudy {
                name: name.to_string(),
                available: available(self.config().studies.keys()),
            })?;

        let fields = match extra_fields {
            None => Vec::new(),
            Some(extra) => {
                let mut fields = study.required_fields();
                for field in extra {
                    if !fields.contains(field) {
                        fields.push(field.clone());
                    }
                }
                fields
            }
        };

        let records = self.records(&study.datasource, &fields, &study.events, &[])?;
        Ok(shape_records(records, name, &study, keep_withdrawn))
    }
}
