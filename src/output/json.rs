//! JSON output formatter for run reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "live": false,
//!   "files": [
//!     { "path": "/a/x.png", "size": 4, "hash": "ab12..." }
//!   ],
//!   "pairs": [
//!     {
//!       "original": "/a/x.png",
//!       "duplicate": "/b/y.png",
//!       "hash": "ab12...",
//!       "size": 4,
//!       "outcome": "would_delete",
//!       "keep": "/a/x.png",
//!       "remove": "/b/y.png",
//!       "rule_index": 0
//!     }
//!   ],
//!   "shared_names": [],
//!   "summary": {
//!     "total_files": 2,
//!     "total_size": 8,
//!     "duplicate_pairs": 1,
//!     "hash_collisions": 0,
//!     "would_delete": 1,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   }
//! }
//! ```
//!
//! No timestamp is emitted, so two dry runs over an unchanged tree produce
//! byte-identical documents.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{NameGroup, PairEvent, PairOutcome, Report, ReportEvent, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::hash_to_hex;

/// A processed file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as scanned
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// BLAKE3 hash as hexadecimal string (64 characters)
    pub hash: String,
}

/// A collided pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPair {
    /// First-seen file for the digest
    pub original: String,
    /// File that collided with it
    pub duplicate: String,
    /// Shared BLAKE3 hash
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Outcome label (e.g. "would_delete", "hash_collision")
    pub outcome: &'static str,
    /// File kept by the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep: Option<String>,
    /// File removed (or to be removed) by the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<String>,
    /// Index of the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
    /// Deletion error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonPair {
    fn from_event(pair: &PairEvent) -> Self {
        let mut json = Self {
            original: path_string(&pair.original),
            duplicate: path_string(&pair.duplicate),
            hash: hash_to_hex(&pair.digest),
            size: pair.size,
            outcome: pair.outcome.label(),
            keep: None,
            remove: None,
            rule_index: None,
            error: None,
        };

        match &pair.outcome {
            PairOutcome::WouldDelete {
                keep,
                remove,
                rule_index,
            }
            | PairOutcome::Deleted {
                keep,
                remove,
                rule_index,
                ..
            } => {
                json.keep = Some(path_string(keep));
                json.remove = Some(path_string(remove));
                json.rule_index = Some(*rule_index);
            }
            PairOutcome::DeleteFailed {
                keep,
                remove,
                rule_index,
                error,
            } => {
                json.keep = Some(path_string(keep));
                json.remove = Some(path_string(remove));
                json.rule_index = Some(*rule_index);
                json.error = Some(error.clone());
            }
            PairOutcome::NotIdentical
            | PairOutcome::RepresentativeRemoved
            | PairOutcome::Unresolved => {}
        }
        json
    }
}

/// A shared base name group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonNameGroup {
    /// The shared base name
    pub base_name: String,
    /// Every path carrying it
    pub paths: Vec<String>,
}

impl From<&NameGroup> for JsonNameGroup {
    fn from(group: &NameGroup) -> Self {
        Self {
            base_name: group.base_name.clone(),
            paths: group.paths.iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all processed files in bytes
    pub total_size: u64,
    /// Verified identical pairs
    pub duplicate_pairs: usize,
    /// Digest collisions without identical content
    pub hash_collisions: usize,
    /// Pairs with no matching rule
    pub unresolved: usize,
    /// Planned deletions (dry run)
    pub would_delete: usize,
    /// Performed deletions (live)
    pub deleted: usize,
    /// Failed deletions
    pub delete_failures: usize,
    /// Pairs skipped because the representative was deleted
    pub skipped: usize,
    /// Space freed or freeable by rule matches (bytes)
    pub reclaimable_space: u64,
    /// Whether the run was interrupted
    pub interrupted: bool,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_bytes,
            duplicate_pairs: summary.duplicate_pairs,
            hash_collisions: summary.hash_collisions,
            unresolved: summary.unresolved,
            would_delete: summary.would_delete,
            deleted: summary.deleted,
            delete_failures: summary.delete_failures,
            skipped: summary.skipped,
            reclaimable_space: summary.reclaimable_bytes,
            interrupted: summary.interrupted,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Whether deletions were performed
    pub live: bool,
    /// Every processed file, in processing order
    pub files: Vec<JsonFile>,
    /// Every collided pair, in processing order
    pub pairs: Vec<JsonPair>,
    /// Base names shared by several files
    pub shared_names: Vec<JsonNameGroup>,
    /// Run summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a report.
    #[must_use]
    pub fn new(report: &Report, exit_code: ExitCode) -> Self {
        let mut files = Vec::new();
        let mut pairs = Vec::new();
        for event in &report.events {
            match event {
                ReportEvent::File { path, size, digest } => files.push(JsonFile {
                    path: path_string(path),
                    size: *size,
                    hash: hash_to_hex(digest),
                }),
                ReportEvent::Pair(pair) => pairs.push(JsonPair::from_event(pair)),
            }
        }

        Self {
            live: report.summary.live,
            files,
            pairs,
            shared_names: report.shared_names.iter().map(JsonNameGroup::from).collect(),
            summary: JsonSummary::from_scan_summary(&report.summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
