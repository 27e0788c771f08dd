//! REDCap API client

use super::metadata::FieldMetadata;
use super::Records;
use crate::config::RedcapConfig;
use crate::error::{MemoirError, MemoirResult};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// A single REDCap project reachable through the API
pub struct RedcapTable {
    name: String,
    url: String,
    token: String,
    agent: ureq::Agent,
}

impl RedcapTable {
    pub fn new(name: impl Into<String>, url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            name: name.into(),
            url: url.into(),
            token: token.into(),
            agent,
        }
    }

    /// Look up a named datasource in the configuration
    pub fn from_config(name: &str, config: &RedcapConfig) -> MemoirResult<Self> {
        let unknown = || MemoirError::UnknownDatasource {
            name: name.to_string(),
            available: available(config.datasources.keys()),
        };
        let ds = config.datasources.get(name).ok_or_else(unknown)?;
        let url = config.endpoint(name).ok_or_else(unknown)?;
        Ok(Self::new(name, url, ds.token.as_str()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send a form POST, returning the body of a 200 response
    fn post(&self, mut form: Vec<(String, String)>) -> MemoirResult<String> {
        form.push(("token".to_string(), self.token.clone()));
        debug!("POST {} ({})", self.url, self.name);

        let http_err = |e: ureq::Error| MemoirError::Http {
            url: self.url.clone(),
            reason: e.to_string(),
        };

        let mut response = self.agent.post(&self.url).send_form(form).map_err(http_err)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(http_err)?;

        if status != 200 {
            return Err(MemoirError::RedcapStatus {
                table: self.name.clone(),
                status,
                body,
            });
        }
        Ok(body)
    }

    /// Export records as flat rows of raw values
    pub fn export_records(
        &self,
        fields: &[String],
        events: &[String],
        forms: &[String],
    ) -> MemoirResult<Records> {
        let mut form = params(&[
            ("content", "record"),
            ("format", "json"),
            ("type", "flat"),
            ("rawOrLabel", "raw"),
            ("rawOrLabelHeaders", "raw"),
            ("exportCheckboxLabel", "false"),
            ("exportSurveyFields", "false"),
            ("exportDataAccessGroups", "false"),
            ("returnFormat", "json"),
        ]);
        push_array(&mut form, "fields", fields);
        push_array(&mut form, "events", events);
        push_array(&mut form, "forms", forms);

        let body = self.post(form)?;
        let records = parse_records(&body).map_err(|reason| MemoirError::RedcapResponse {
            table: self.name.clone(),
            reason,
        })?;

        debug!("{}: exported {} records", self.name, records.len());
        Ok(records)
    }

    /// Export the data dictionary
    pub fn export_metadata(
        &self,
        fields: &[String],
        forms: &[String],
    ) -> MemoirResult<Vec<FieldMetadata>> {
        let mut form = params(&[
            ("content", "metadata"),
            ("format", "json"),
            ("returnFormat", "json"),
        ]);
        push_array(&mut form, "fields", fields);
        push_array(&mut form, "forms", forms);

        let body = self.post(form)?;
        serde_json::from_str(&body).map_err(|e| MemoirError::RedcapResponse {
            table: self.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Reserve `count` consecutive record ids, starting at the next free one
    ///
    /// Only meaningful for projects with auto-numbering enabled.
    pub fn generate_next_record_ids(&self, count: usize) -> MemoirResult<Vec<i64>> {
        let body = self.post(params(&[("content", "generateNextRecordName")]))?;
        let next: i64 = body
            .trim()
            .parse()
            .map_err(|_| MemoirError::RedcapResponse {
                table: self.name.clone(),
                reason: format!("expected a record id, got {:?}", body.trim()),
            })?;
        next_ids(next, count).ok_or_else(|| MemoirError::RedcapResponse {
            table: self.name.clone(),
            reason: format!("{} ids starting at {} overflow the id range", count, next),
        })
    }
}

pub(crate) fn available<'a>(names: impl Iterator<Item = &'a String>) -> String {
    let names: Vec<&str> = names.map(String::as_str).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Append `name[0]=a&name[1]=b...` pairs
fn push_array(form: &mut Vec<(String, String)>, name: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        form.push((format!("{}[{}]", name, i), value.clone()));
    }
}

/// `count` consecutive ids from `start`; `None` if any would overflow
fn next_ids(start: i64, count: usize) -> Option<Vec<i64>> {
    let Some(span) = count.checked_sub(1) else {
        return Some(Vec::new());
    };
    let end = start.checked_add(i64::try_from(span).ok()?)?;
    Some((start..=end).collect())
}

/// Parse a flat JSON record export; non-string values are stringified
fn parse_records(body: &str) -> Result<Records, String> {
    let rows: Vec<BTreeMap<String, Value>> =
        serde_json::from_str(body).map_err(|e| e.to_string())?;

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect()
        })
        .collect())
}
