//! Fetch command - export records from a datasource

use super::{print_records, redcap_cache_file};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::MemoirResult;
use crate::redcap::CachedRedcap;

/// Execute the fetch command
pub fn execute(args: FetchArgs, config: &Config) -> MemoirResult<()> {
    let mut redcap = CachedRedcap::new(
        config.redcap.clone(),
        config.cache.ttl_days,
        redcap_cache_file(config),
    );

    let records = redcap.records(&args.datasource, &args.fields, &args.events, &args.forms)?;
    print_records(&records, args.format)
}
