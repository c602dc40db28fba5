//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! The level comes from `RUST_LOG` when set, otherwise from the CLI flags:
//! `-q` shows errors only, no flag shows info (one line per duplicate
//! decision), `-v` adds per-file digests and `-vv` enables trace.
//!
//! Debug builds prefix lines with a timestamp, and with the module path
//! from `-v` up. Release builds print level and message only.
//!
//! ```rust,no_run
//! use dupesweep::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("digests will be logged");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Install the global logger.
///
/// Returns `false` if a logger was already installed, which happens when
/// `run_app` is driven repeatedly from tests; the first logger stays.
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let from_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);

    let installed = builder.try_init().is_ok();
    if installed {
        log::debug!(
            "Logging initialized at {} (from {})",
            log::max_level(),
            if from_env { "RUST_LOG" } else { "flags" }
        );
    }
    installed
}

/// Map CLI flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();
        if verbose >= 1 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
}
