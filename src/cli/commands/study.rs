//! Study command - export a study with subject/age columns derived

use super::{print_records, redcap_cache_file};
use crate::cli::args::StudyArgs;
use crate::config::Config;
use crate::error::MemoirResult;
use crate::redcap::CachedRedcap;

/// Execute the study command
pub fn execute(args: StudyArgs, config: &Config) -> MemoirResult<()> {
    let mut redcap = CachedRedcap::new(
        config.redcap.clone(),
        config.cache.ttl_days,
        redcap_cache_file(config),
    );

    let extra = (!args.all_fields).then_some(args.fields.as_slice());
    let records = redcap.study(&args.name, extra, args.keep_withdrawn)?;
    print_records(&records, args.format)
}
