//! Ctrl+C handling for cooperative cancellation.
//!
//! A single `Arc<AtomicBool>` is raised by the `ctrlc` hook. The walker,
//! the hashing loop and the resolution loop check it between files, so a
//! deletion in progress always completes before the run stops.
//!
//! ```rust,no_run
//! use dupesweep::duplicates::FinderConfig;
//! use dupesweep::signal::install_handler;
//!
//! let handler = install_handler().expect("signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (128 + 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`Self::request_shutdown`] called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag manually.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for the finder and walker.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Lower the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C hook, or reuse the one already
/// installed.
///
/// Registration happens inside the one-time initializer, so concurrent
/// callers all receive the handler whose flag the hook raises. Later calls
/// (repeated `run_app` invocations in tests) get that handler back with its
/// flag lowered.
///
/// # Errors
///
/// Returns [`SignalError`] if the first registration fails for a reason
/// other than a hook installed outside this module.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let mut registration = Ok(());
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();
        registration = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\nInterrupted. Finishing current file...");
            let _ = stderr.flush();
        });
        handler
    });

    match registration {
        Ok(()) => {}
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C hook registered elsewhere, shutdown flag is not hooked");
        }
        Err(e) => return Err(SignalError::InstallFailed(e)),
    }

    handler.reset();
    Ok(handler.clone())
}
