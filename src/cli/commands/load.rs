//! Load command - parse a document, reusing the cached parse if unchanged

use super::document_cache_file;
use crate::cli::args::LoadArgs;
use crate::config::Config;
use crate::document::Documents;
use crate::error::MemoirResult;
use tracing::debug;

/// Execute the load command
pub fn execute(args: LoadArgs, config: &Config) -> MemoirResult<()> {
    let mut documents = Documents::new(document_cache_file(config));
    let value = documents.load(&args.file)?;
    if documents.parsed() == 0 {
        debug!("Served {} from cache", args.file.display());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
