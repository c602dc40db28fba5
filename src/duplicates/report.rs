//! Report events and run summary produced by the finder.
//!
//! Every processed file yields a [`ReportEvent::File`]; every digest
//! collision yields a [`ReportEvent::Pair`] carrying a [`PairOutcome`]. The
//! output formatters in [`crate::output`] render these events; nothing here
//! does any I/O.

use std::path::PathBuf;

use crate::actions::Resolution;
use crate::scanner::Hash;

use super::names::NameGroup;

/// Terminal state of one collided pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Same digest, different bytes. Never resolved.
    NotIdentical,
    /// The stored representative was deleted earlier in this run, so the
    /// pair was not compared.
    RepresentativeRemoved,
    /// Identical, but no rule covers the two directories.
    Unresolved,
    /// Identical, a rule matched, dry run.
    WouldDelete {
        keep: PathBuf,
        remove: PathBuf,
        rule_index: usize,
    },
    /// Identical, a rule matched, file removed.
    Deleted {
        keep: PathBuf,
        remove: PathBuf,
        rule_index: usize,
        size: u64,
    },
    /// Identical, a rule matched, but removal failed.
    DeleteFailed {
        keep: PathBuf,
        remove: PathBuf,
        rule_index: usize,
        error: String,
    },
}

impl PairOutcome {
    /// Short machine-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotIdentical => "hash_collision",
            Self::RepresentativeRemoved => "representative_removed",
            Self::Unresolved => "unresolved",
            Self::WouldDelete { .. } => "would_delete",
            Self::Deleted { .. } => "deleted",
            Self::DeleteFailed { .. } => "delete_failed",
        }
    }

    /// Path chosen for removal, if a rule matched.
    #[must_use]
    pub fn target(&self) -> Option<&PathBuf> {
        match self {
            Self::WouldDelete { remove, .. }
            | Self::Deleted { remove, .. }
            | Self::DeleteFailed { remove, .. } => Some(remove),
            _ => None,
        }
    }
}

impl From<Resolution> for PairOutcome {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Unresolved => Self::Unresolved,
            Resolution::WouldDelete {
                keep,
                remove,
                rule_index,
            } => Self::WouldDelete {
                keep,
                remove,
                rule_index,
            },
            Resolution::Deleted {
                keep,
                remove,
                rule_index,
                size,
            } => Self::Deleted {
                keep,
                remove,
                rule_index,
                size,
            },
        }
    }
}

/// One digest collision and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEvent {
    /// First-seen record for the digest
    pub original: PathBuf,
    /// Record that collided with it
    pub duplicate: PathBuf,
    /// Shared digest
    pub digest: Hash,
    /// Size of the colliding record
    pub size: u64,
    /// What was decided
    pub outcome: PairOutcome,
}

/// A single report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// A file was hashed and indexed.
    File {
        path: PathBuf,
        size: u64,
        digest: Hash,
    },
    /// A digest collision was processed.
    Pair(PairEvent),
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files processed by the resolution pass
    pub total_files: usize,
    /// Sum of their sizes
    pub total_bytes: u64,
    /// Verified identical pairs
    pub duplicate_pairs: usize,
    /// Digest collisions without identical content
    pub hash_collisions: usize,
    /// Pairs no rule covered
    pub unresolved: usize,
    /// Planned deletions in dry-run mode
    pub would_delete: usize,
    /// Files actually deleted
    pub deleted: usize,
    /// Deletions that failed
    pub delete_failures: usize,
    /// Pairs skipped because the representative was already deleted
    pub skipped: usize,
    /// Bytes freed (live) or freeable (dry run) by rule matches
    pub reclaimable_bytes: u64,
    /// Whether deletions were live
    pub live: bool,
    /// Whether the run stopped early on request
    pub interrupted: bool,
}

/// Everything a run produced, in processing order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Report lines in the order they happened
    pub events: Vec<ReportEvent>,
    /// Aggregate counts
    pub summary: ScanSummary,
    /// Base names shared by several files, when requested
    pub shared_names: Vec<NameGroup>,
}

impl Report {
    /// Create an empty report.
    #[must_use]
    pub fn new(live: bool) -> Self {
        Self {
            summary: ScanSummary {
                live,
                ..ScanSummary::default()
            },
            ..Self::default()
        }
    }

    /// Record a processed file.
    pub fn record_file(&mut self, path: PathBuf, size: u64, digest: Hash) {
        self.summary.total_files += 1;
        self.summary.total_bytes += size;
        self.events.push(ReportEvent::File { path, size, digest });
    }

    /// Record a collided pair and update the counts.
    pub fn record_pair(&mut self, event: PairEvent) {
        let summary = &mut self.summary;
        match &event.outcome {
            PairOutcome::NotIdentical => summary.hash_collisions += 1,
            PairOutcome::RepresentativeRemoved => summary.skipped += 1,
            PairOutcome::Unresolved => {
                summary.duplicate_pairs += 1;
                summary.unresolved += 1;
            }
            PairOutcome::WouldDelete { .. } => {
                summary.duplicate_pairs += 1;
                summary.would_delete += 1;
                summary.reclaimable_bytes += event.size;
            }
            PairOutcome::Deleted { size, .. } => {
                summary.duplicate_pairs += 1;
                summary.deleted += 1;
                summary.reclaimable_bytes += size;
            }
            PairOutcome::DeleteFailed { .. } => {
                summary.duplicate_pairs += 1;
                summary.delete_failures += 1;
            }
        }
        self.events.push(ReportEvent::Pair(event));
    }

    /// Iterate over pair events only.
    pub fn pairs(&self) -> impl Iterator<Item = &PairEvent> {
        self.events.iter().filter_map(|e| match e {
            ReportEvent::Pair(p) => Some(p),
            ReportEvent::File { .. } => None,
        })
    }
}
