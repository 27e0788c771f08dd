//! Next-id command - reserve auto-numbered record ids

use crate::cli::args::NextIdArgs;
use crate::config::Config;
use crate::error::MemoirResult;
use crate::redcap::RedcapTable;

/// Execute the next-id command
pub fn execute(args: NextIdArgs, config: &Config) -> MemoirResult<()> {
    let table = RedcapTable::from_config(&args.datasource, &config.redcap)?;
    for id in table.generate_next_record_ids(args.count)? {
        println!("{}", id);
    }
    Ok(())
}
