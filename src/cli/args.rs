//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// memoir - cached REDCap exports and document loads
///
/// Remembers expensive results on disk and reuses them until they expire
/// or their inputs change.
#[derive(Parser, Debug)]
#[command(name = "memoir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEMOIR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export records from a REDCap datasource (cached)
    Fetch(FetchArgs),

    /// Export and reshape a configured study (cached)
    Study(StudyArgs),

    /// Export a datasource's data dictionary
    Dictionary(DictionaryArgs),

    /// Reserve the next auto-numbered record ids
    NextId(NextIdArgs),

    /// Parse a JSON or TOML document (cached by content)
    Load(LoadArgs),

    /// Inspect cache files
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Datasource name from [redcap.datasources]
    pub datasource: String,

    /// Fields to export (comma-separated, default all)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Events to export (comma-separated, default all)
    #[arg(long, value_delimiter = ',')]
    pub events: Vec<String>,

    /// Forms to export (comma-separated, default all)
    #[arg(long, value_delimiter = ',')]
    pub forms: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the study command
#[derive(Parser, Debug)]
pub struct StudyArgs {
    /// Study name from [redcap.studies]
    pub name: String,

    /// Extra fields beyond the study's identifying fields
    #[arg(long, value_delimiter = ',', conflicts_with = "all_fields")]
    pub fields: Vec<String>,

    /// Export every field of the datasource
    #[arg(long)]
    pub all_fields: bool,

    /// Keep subjects whose id carries a withdrawal flag
    #[arg(long)]
    pub keep_withdrawn: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the dictionary command
#[derive(Parser, Debug)]
pub struct DictionaryArgs {
    /// Datasource name from [redcap.datasources]
    pub datasource: String,

    /// Fields to include (comma-separated, default all)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Forms to include (comma-separated, default all)
    #[arg(long, value_delimiter = ',')]
    pub forms: Vec<String>,

    /// Write `<datasource>.json` into this directory instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the next-id command
#[derive(Parser, Debug)]
pub struct NextIdArgs {
    /// Datasource name from [redcap.datasources]
    pub datasource: String,

    /// Number of ids to reserve
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Document to parse (.json or .toml)
    pub file: PathBuf,
}

/// Output format for tabular results
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache location and entry counts
    Info,

    /// List cached REDCap exports and when they expire
    List,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand (defaults to show)
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show merged configuration with tokens redacted
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fetch_lists() {
        let cli = Cli::parse_from([
            "memoir",
            "fetch",
            "hcpa",
            "--fields",
            "dob,sex",
            "--format",
            "json",
        ]);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.datasource, "hcpa");
        assert_eq!(args.fields, vec!["dob", "sex"]);
        assert!(args.events.is_empty());
        assert!(matches!(args.format, OutputFormat::Json));
    }

    #[test]
    fn study_fields_conflict_with_all_fields() {
        let result = Cli::try_parse_from(["memoir", "study", "aging", "--fields", "x", "--all-fields"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["memoir", "-vv", "cache", "info"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn next_id_defaults_to_one() {
        let cli = Cli::parse_from(["memoir", "next-id", "hcpa"]);
        let Commands::NextId(args) = cli.command else {
            panic!("expected next-id");
        };
        assert_eq!(args.count, 1);
    }
}
