//! Output functions for consistent CLI formatting

use super::context::UiContext;
use crate::redcap::Records;
use console::style;

/// Widest a table column may grow before values are truncated
const MAX_COLUMN_WIDTH: usize = 32;

/// Display a section header
pub fn section(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        println!("{}", style(title).cyan().bold());
    } else {
        println!("{}", title);
    }
}

/// Display a success step with detail
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {} ({})", style("[OK]").green(), message, style(detail).dim());
    } else {
        println!("  [OK] {} ({})", message, detail);
    }
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {} - {}", style("[WARN]").yellow(), message, style(hint).dim());
    } else {
        println!("  [WARN] {} - {}", message, hint);
    }
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("  {} {}", style("[INFO]").cyan(), message);
    } else {
        println!("  [INFO] {}", message);
    }
}

/// Print styled key-value pair
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Render records as an aligned text table
///
/// Columns are the union of all row keys; missing cells are blank.
pub fn records_table(records: &Records) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in records {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            records
                .iter()
                .filter_map(|r| r.get(*col))
                .map(|v| v.chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| pad(col, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    out.push('\n');

    for row in records {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| pad(row.get(*col).map(String::as_str).unwrap_or(""), *w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len > width {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}~", cut)
    } else {
        format!("{}{}", value, " ".repeat(width - len))
    }
}
