//! dupesweep - rule-driven duplicate file remover
//!
//! Walks a directory tree, fingerprints every regular file with BLAKE3,
//! confirms digest collisions byte-for-byte, and resolves identical pairs
//! with ordered keep/remove directory rules. Dry run unless `--live`.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod rules;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::Resolver;
use crate::cli::{CheckRulesArgs, Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::path_utils::clean_path;
use crate::scanner::WalkerConfig;

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Configuration problems, inventory and hashing failures, and output
/// errors are returned for `main` to report. Deletion failures are not
/// errors; they show up as [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => run_scan(args, cli.quiet, cli.no_color),
        Commands::CheckRules(args) => run_check_rules(args),
    }
}

fn rules_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(config::default_rules_path)
        .context("no rules file given and no platform config directory available")
}

fn load_rules(path: Option<PathBuf>) -> Result<(PathBuf, Config, rules::RuleSet)> {
    let path = rules_path(path)?;
    let config = Config::load(&path)?;
    let rules = config.rule_set()?;
    Ok((path, config, rules))
}

fn run_scan(args: ScanArgs, quiet: bool, no_color: bool) -> Result<ExitCode> {
    let (rules_file, config, rules) = load_rules(args.rules)?;
    let live = args.live || config.live;
    log::debug!("Using {} rule(s) from {}", rules.len(), rules_file.display());
    if live {
        log::warn!("Live mode: files matched by a rule will be permanently deleted");
    }

    let root = std::path::absolute(&args.dir)
        .map(|p| clean_path(&p))
        .with_context(|| format!("cannot resolve {}", args.dir.display()))?;

    let handler = signal::install_handler()?;
    let show_progress = !quiet && !args.no_progress && io::stderr().is_terminal();
    let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(!show_progress));

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::new(args.skip_hidden, args.min_size))
            .with_shutdown_flag(handler.get_flag())
            .with_progress_callback(progress)
            .with_report_names(args.names),
    );
    let resolver = Resolver::new(rules, live);

    let report = finder.run(&root, &resolver)?;
    let exit_code = ExitCode::from_summary(&report.summary);

    let stdout = io::stdout();
    let color = !no_color && stdout.is_terminal();
    let mut out = stdout.lock();
    match args.output {
        OutputFormat::Text => TextOutput::new(&report)
            .with_color(color)
            .write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(&mut out, true)?,
        OutputFormat::Csv => CsvOutput::new(&report).write_to(&mut out)?,
    }

    Ok(exit_code)
}

fn run_check_rules(args: CheckRulesArgs) -> Result<ExitCode> {
    let (path, config, rules) = load_rules(args.path)?;

    println!(
        "{}: {} rule(s), live = {}",
        path.display(),
        rules.len(),
        config.live
    );
    for (i, rule) in rules.iter().enumerate() {
        println!("  {}. {}", i + 1, rule);
    }
    Ok(ExitCode::Success)
}
