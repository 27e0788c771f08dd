//! Cache command - inspect cache files

use super::{document_cache_file, redcap_cache_file};
use crate::cache::CacheStore;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::{Config, ConfigManager};
use crate::error::MemoirResult;
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};
use console::Style;
use serde_json::Value;

const STATE_WIDTH: usize = 10;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> MemoirResult<()> {
    match args.action {
        CacheAction::Info => show_info(config),
        CacheAction::List => list_redcap(config),
    }
    Ok(())
}

fn show_info(config: &Config) {
    let ctx = UiContext::detect();
    ui::section(&ctx, "Cache");
    ui::key_value(
        &ctx,
        "Directory",
        &ConfigManager::cache_dir(config).display().to_string(),
    );
    ui::key_value(&ctx, "TTL", &format!("{} day(s)", config.cache.ttl_days));

    for (name, path) in [
        ("REDCap exports", redcap_cache_file(config)),
        ("Documents", document_cache_file(config)),
    ] {
        if path.exists() {
            let store = CacheStore::<Value, Value>::load(&path);
            ui::key_value(&ctx, name, &format!("{} entries", store.len()));
        } else {
            ui::key_value(&ctx, name, "empty");
        }
    }
}

fn list_redcap(config: &Config) {
    let store = CacheStore::<Value, DateTime<Utc>>::load(redcap_cache_file(config));

    if store.is_empty() {
        ui::step_info(&UiContext::detect(), "No cached exports");
        return;
    }

    println!(
        "{:<50} {:<8} {:<width$} {:<20}",
        "CALL",
        "ROWS",
        "STATE",
        "EXPIRES",
        width = STATE_WIDTH
    );
    println!("{}", "-".repeat(91));

    let now = Utc::now();
    let colors = console::colors_enabled();
    for (key, entry) in store.iter() {
        let rows = entry.value.as_array().map(Vec::len).unwrap_or(0);
        println!(
            "{:<50} {:<8} {} {:<20}",
            key.to_string(),
            rows,
            state_cell(now > entry.marker, colors),
            entry.marker.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    println!("Total: {} export(s)", store.len());
}

/// Padded before styling so escape codes do not eat into the column width
fn state_cell(expired: bool, colors: bool) -> String {
    let (word, style) = if expired {
        ("expired", Style::new().yellow())
    } else {
        ("fresh", Style::new().green())
    };
    style
        .force_styling(colors)
        .apply_to(format!("{:<width$}", word, width = STATE_WIDTH))
        .to_string()
}
