//! CSV output formatter for collided pairs.
//!
//! One row per collided pair, for spreadsheets and data analysis. Files
//! without a collision are not listed.
//!
//! # Columns
//!
//! - `original`: First-seen file for the digest
//! - `duplicate`: File that collided with it
//! - `hash`: BLAKE3 content hash (hexadecimal)
//! - `size`: File size in bytes
//! - `outcome`: `hash_collision`, `unresolved`, `would_delete`, `deleted`,
//!   `delete_failed` or `representative_removed`
//! - `target`: File removed or to be removed, empty if none
//! - `rule`: 1-based position of the matching rule, empty if none

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::{PairOutcome, Report};
use crate::scanner::hash_to_hex;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow {
    original: String,
    duplicate: String,
    hash: String,
    size: u64,
    outcome: &'static str,
    target: String,
    rule: Option<usize>,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    report: &'a Report,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for pair in self.report.pairs() {
            let rule = match &pair.outcome {
                PairOutcome::WouldDelete { rule_index, .. }
                | PairOutcome::Deleted { rule_index, .. }
                | PairOutcome::DeleteFailed { rule_index, .. } => Some(rule_index + 1),
                _ => None,
            };

            csv_writer.serialize(CsvRow {
                original: pair.original.to_string_lossy().into_owned(),
                duplicate: pair.duplicate.to_string_lossy().into_owned(),
                hash: hash_to_hex(&pair.digest),
                size: pair.size,
                outcome: pair.outcome.label(),
                target: pair
                    .outcome
                    .target()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                rule,
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
