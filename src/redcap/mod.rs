//! REDCap datasources
//!
//! Record exports are the expensive, cacheable calls: [`CachedRedcap`]
//! memoizes them with the time policy and reshapes study exports on top.

pub mod cached;
pub mod client;
pub mod metadata;
pub mod study;

use std::collections::BTreeMap;

pub use cached::{CachedRedcap, RecordExport};
pub use client::RedcapTable;
pub use metadata::{dictionary, parse_choices, Choice, FieldDefinition, FieldMetadata};
pub use study::{interview_age, shape_records};

/// Exported rows, column name to raw value
pub type Records = Vec<BTreeMap<String, String>>;
