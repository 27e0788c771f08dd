//! CLI command implementations

pub mod cache;
pub mod config;
pub mod dictionary;
pub mod fetch;
pub mod load;
pub mod next_id;
pub mod study;

pub use cache::execute as cache;
pub use config::execute as config;
pub use dictionary::execute as dictionary;
pub use fetch::execute as fetch;
pub use load::execute as load;
pub use next_id::execute as next_id;
pub use study::execute as study;

use crate::cli::args::OutputFormat;
use crate::config::{Config, ConfigManager};
use crate::error::MemoirResult;
use crate::redcap::Records;
use crate::ui;
use std::path::PathBuf;

/// Cache file for REDCap exports
pub fn redcap_cache_file(config: &Config) -> PathBuf {
    ConfigManager::cache_dir(config).join("redcap.json")
}

/// Cache file for parsed documents
pub fn document_cache_file(config: &Config) -> PathBuf {
    ConfigManager::cache_dir(config).join("documents.json")
}

fn print_records(records: &Records, format: OutputFormat) -> MemoirResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table if records.is_empty() => println!("No records."),
        OutputFormat::Table => {
            print!("{}", ui::records_table(records));
            println!();
            println!("Total: {} record(s)", records.len());
        }
    }
    Ok(())
}
