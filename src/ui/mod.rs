//! Console output helpers shared by the CLI commands
//!
//! Decorated output when stdout is a terminal, plain text otherwise so the
//! results can be piped.

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    key_value, records_table, section, step_info, step_ok_detail, step_warn_hint,
};
