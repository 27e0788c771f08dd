//! Memoir - cached REDCap exports and document loads
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use memoir::cli::{commands, Cli, Commands};
use memoir::config::ConfigManager;
use memoir::error::MemoirResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> MemoirResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("memoir=warn"),
        1 => EnvFilter::new("memoir=info"),
        _ => EnvFilter::new("memoir=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    debug!("Using config {}", config_manager.path().display());

    let config = config_manager.load()?;

    match cli.command {
        Commands::Fetch(args) => commands::fetch(args, &config),
        Commands::Study(args) => commands::study(args, &config),
        Commands::Dictionary(args) => commands::dictionary(args, &config),
        Commands::NextId(args) => commands::next_id(args, &config),
        Commands::Load(args) => commands::load(args, &config),
        Commands::Cache(args) => commands::cache(args, &config),
        Commands::Config(args) => commands::config(args, &config, &config_manager),
    }
}
