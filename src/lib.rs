//! Memoir - persistent memoization of expensive computations
//!
//! Results are kept in a JSON file on disk and reused until a staleness
//! policy says otherwise. Ships with cached REDCap exports and a document
//! loader that re-parses files only when their content changes.

pub mod cache;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod redcap;
pub mod ui;

pub use error::{MemoirError, MemoirResult};
