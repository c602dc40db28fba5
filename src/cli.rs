//! Command-line surface: global logging/color switches plus the `scan` and
//! `check-rules` subcommands, declared with the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Report what the rules would delete (dry run, the default)
//! dupesweep scan ~/Pictures --rules ~/rules.toml
//!
//! # Actually delete
//! dupesweep scan ~/Pictures --rules ~/rules.toml --live
//!
//! # JSON report for scripting
//! dupesweep scan ~/Pictures --output json
//!
//! # Validate a rules file without scanning
//! dupesweep check-rules ~/rules.toml
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rule-driven duplicate file remover.
///
/// dupesweep finds files with identical content (BLAKE3 digest, confirmed
/// byte-for-byte) and, where a keep/remove directory rule covers a pair,
/// deletes the copy in the remove directory. Nothing is deleted without
/// --live.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory, resolve duplicates by rule, and report
    Scan(ScanArgs),
    /// Validate a rules file and print the rules in match order
    CheckRules(CheckRulesArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan recursively
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Rules file (TOML). Defaults to <config_dir>/dupesweep/rules.toml
    #[arg(short, long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Delete files instead of only reporting what would be deleted
    ///
    /// Warning: deletion is permanent. There is no trash.
    #[arg(long)]
    pub live: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Also list files that share a base name
    #[arg(long)]
    pub names: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Minimum file size to consider (e.g., 1KB, 1MB, 1GB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the check-rules subcommand.
#[derive(Debug, Args)]
pub struct CheckRulesArgs {
    /// Rules file to validate. Defaults to <config_dir>/dupesweep/rules.toml
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Output format for run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets (collided pairs only)
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupesweep::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
