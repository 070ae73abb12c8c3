//! Command-line interface module for clean-folder.
//!
//! This module handles argument parsing, configuration loading and the
//! orchestration of one run: sort, prune, then print the summary.

use crate::config::{CleanConfig, ConflictPolicy, Layout};
use crate::output::{OutputFormatter, ReportFormat, Summary};
use crate::walker::clean_directory;
use clap::Parser;
use std::path::PathBuf;

/// Sort a folder into images, video, documents, audio, archives and other.
#[derive(Debug, Clone, Parser)]
#[command(name = "clean-folder", version, about)]
pub struct Cli {
    /// Folder to clean up.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Configuration file (defaults to .cleanfolderrc.toml or ~/.config/clean-folder/config.toml).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where category folders are created.
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// What to do when a normalized name is already taken.
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,

    /// Summary output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter matching the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Runs one clean-up with the given arguments.
///
/// Command-line flags take precedence over the configuration file.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use clean_folder::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["clean-folder", "/path/to/directory", "--layout", "root"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let banner = format!("Starting in {}", cli.path.display());
    match cli.format {
        ReportFormat::Text => OutputFormatter::plain(&banner),
        // stdout carries only the JSON document
        ReportFormat::Json => OutputFormatter::status(&banner),
    }

    let mut config = CleanConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(layout) = cli.layout {
        config.organize.layout = layout;
    }
    if let Some(policy) = cli.on_conflict {
        config.organize.on_conflict = policy;
    }
    let settings = config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let ledger = clean_directory(&cli.path, &settings).map_err(|e| e.to_string())?;

    Summary::collect(&cli.path, ledger).print(cli.format);
    Ok(())
}
