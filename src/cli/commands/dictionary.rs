//! Dictionary command - export a datasource's data dictionary

use crate::cli::args::DictionaryArgs;
use crate::config::Config;
use crate::error::{MemoirError, MemoirResult};
use crate::redcap::{dictionary, RedcapTable};
use crate::ui::{self, UiContext};
use std::fs;

/// Execute the dictionary command
pub fn execute(args: DictionaryArgs, config: &Config) -> MemoirResult<()> {
    let table = RedcapTable::from_config(&args.datasource, &config.redcap)?;
    let fields = table.export_metadata(&args.fields, &args.forms)?;
    let content = serde_json::to_string_pretty(&dictionary(&fields))?;

    let Some(dir) = args.out else {
        println!("{}", content);
        return Ok(());
    };

    fs::create_dir_all(&dir)
        .map_err(|e| MemoirError::io(format!("creating {}", dir.display()), e))?;
    let path = dir.join(format!("{}.json", table.name()));
    fs::write(&path, content)
        .map_err(|e| MemoirError::io(format!("writing {}", path.display()), e))?;

    ui::step_ok_detail(
        &UiContext::detect(),
        &format!("{} fields written", fields.len()),
        &path.display().to_string(),
    );
    Ok(())
}
