//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::ScanSummary;

/// Exit codes for dupesweep.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure, bad configuration)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed, but some deletions failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but at least one deletion failed.
    PartialSuccess = 3,
    /// Interrupted: Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Derive the exit code of a finished run from its summary.
    ///
    /// Interruption wins over deletion failures, which win over the
    /// duplicates/no-duplicates distinction. Hash collisions count as
    /// findings.
    #[must_use]
    pub fn from_summary(summary: &ScanSummary) -> Self {
        if summary.interrupted {
            Self::Interrupted
        } else if summary.delete_failures > 0 {
            Self::PartialSuccess
        } else if summary.duplicate_pairs + summary.hash_collisions + summary.skipped == 0 {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
