//! Duplicate finder: inventory, fingerprint, verify, resolve.
//!
//! # Overview
//!
//! The pipeline runs strictly in order on one thread:
//! 1. **Walk**: build the inventory of regular files (sorted, no symlinks)
//! 2. **Hash**: assign a BLAKE3 digest to every record
//! 3. **Resolve**: index each record by digest; on a collision, verify the
//!    pair byte-for-byte and hand identical pairs to the [`Resolver`]
//!
//! Any error in steps 1 and 2, and any re-read failure in step 3, aborts the
//! run. A failed deletion only affects its pair and is recorded in the
//! report.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::Resolver;
//! use dupesweep::duplicates::{DuplicateFinder, FinderConfig};
//! use dupesweep::rules::{Rule, RuleSet};
//! use std::path::Path;
//!
//! let rules = RuleSet::new(vec![Rule::new("/srv/photos/keep", "/srv/photos/inbox").unwrap()]).unwrap();
//! let resolver = Resolver::new(rules, false);
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let report = finder.run(Path::new("/srv/photos"), &resolver).unwrap();
//! println!("{} duplicate pairs", report.summary.duplicate_pairs);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::actions::Resolver;
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, HashError, Hasher, ScanError, Walker, WalkerConfig};

use super::index::{DuplicateIndex, Lookup};
use super::names::shared_base_names;
use super::report::{PairEvent, PairOutcome, Report};
use super::verify::{verify_identical, VerifyError};

/// Configuration for a finder run.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Collect base names shared by several files.
    pub report_names: bool,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("report_names", &self.report_names)
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Enable the shared base name report.
    #[must_use]
    pub fn with_report_names(mut self, enabled: bool) -> Self {
        self.report_names = enabled;
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that abort a finder run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The run was interrupted before resolution started.
    #[error("Scan interrupted by user")]
    Interrupted,

    /// Building the inventory failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Fingerprinting a file failed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// Re-reading a collided pair failed.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// A record reached resolution without a digest.
    #[error("No digest computed for {0}")]
    MissingDigest(PathBuf),
}

/// Runs the duplicate pipeline over one directory tree.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Walk, hash and resolve everything under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] on any inventory, hashing or verification
    /// failure, or [`FinderError::Interrupted`] if shutdown was requested
    /// before resolution began. An interruption during resolution yields a
    /// partial report with `summary.interrupted` set instead.
    pub fn run(&self, root: &Path, resolver: &Resolver) -> Result<Report, FinderError> {
        let start = Instant::now();
        log::info!(
            "Starting {} scan of {}",
            if resolver.is_live() { "live" } else { "dry-run" },
            root.display()
        );

        let mut entries = self.scan(root)?;
        self.hash_all(&mut entries)?;
        let report = self.resolve_all(&entries, resolver)?;

        log::info!(
            "Scan complete: {} files, {} duplicate pairs, {} hash collisions in {:?}",
            report.summary.total_files,
            report.summary.duplicate_pairs,
            report.summary.hash_collisions,
            start.elapsed()
        );
        Ok(report)
    }

    /// Build the inventory. Records come back in walk order without digests.
    ///
    /// # Errors
    ///
    /// The first walk error aborts the inventory.
    pub fn scan(&self, root: &Path) -> Result<Vec<FileEntry>, FinderError> {
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        walker.validate_root()?;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut entries = Vec::new();
        for result in walker.walk() {
            let entry = result?;
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(entries.len() + 1, &entry.path.to_string_lossy());
            }
            entries.push(entry);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            log::warn!("Shutdown requested during walk");
            return Err(FinderError::Interrupted);
        }

        log::debug!("Inventory: {} files under {}", entries.len(), root.display());
        Ok(entries)
    }

    /// Assign a digest to every record.
    ///
    /// Returns the total number of bytes hashed.
    ///
    /// # Errors
    ///
    /// The first hashing error aborts the pass. Records hashed before the
    /// error keep their digests.
    pub fn hash_all(&self, entries: &mut [FileEntry]) -> Result<u64, FinderError> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", entries.len());
        }

        let mut bytes = 0u64;
        for (i, entry) in entries.iter_mut().enumerate() {
            if self.config.is_shutdown_requested() {
                log::warn!("Shutdown requested during hashing");
                return Err(FinderError::Interrupted);
            }

            let digest = self.hasher.full_hash(&entry.path, entry.size)?;
            entry.digest = Some(digest);
            bytes += entry.size;

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(i + 1, &entry.path.to_string_lossy());
                callback.on_item_completed(entry.size);
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }
        Ok(bytes)
    }

    /// Index hashed records in order and resolve every digest collision.
    ///
    /// The first record seen for a digest stays the representative for the
    /// whole pass. Later records with the same digest are each paired with
    /// it; they are never paired with each other. Once a representative is
    /// deleted, or planned for deletion in a dry run, its later pairs are
    /// skipped as [`PairOutcome::RepresentativeRemoved`].
    ///
    /// # Errors
    ///
    /// - `MissingDigest` if a record was not hashed
    /// - `Verify` if a collided pair cannot be re-read
    pub fn resolve_all(
        &self,
        entries: &[FileEntry],
        resolver: &Resolver,
    ) -> Result<Report, FinderError> {
        let mut report = Report::new(resolver.is_live());
        let mut index = DuplicateIndex::new();
        let mut removed: HashSet<usize> = HashSet::new();
        let mut deleted: HashSet<&Path> = HashSet::new();
        let mut processed = 0;

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("resolving", entries.len());
        }

        for (pos, entry) in entries.iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::warn!("Shutdown requested, stopping after {} files", pos);
                report.summary.interrupted = true;
                break;
            }

            let digest = entry
                .digest
                .ok_or_else(|| FinderError::MissingDigest(entry.path.clone()))?;
            log::debug!("{} {}", entry.digest_hex(), entry.path.display());
            report.record_file(entry.path.clone(), entry.size, digest);
            processed = pos + 1;

            if let Lookup::Found(rep_pos) = index.lookup_or_insert(digest, pos) {
                let original = &entries[rep_pos];

                let outcome = if removed.contains(&rep_pos) {
                    log::warn!(
                        "Skipping {}: matching file {} is already gone",
                        entry.path.display(),
                        original.path.display()
                    );
                    PairOutcome::RepresentativeRemoved
                } else {
                    self.process_pair(original, entry, resolver)?
                };

                match &outcome {
                    PairOutcome::Deleted { remove, .. } => {
                        if *remove == original.path {
                            removed.insert(rep_pos);
                            deleted.insert(original.path.as_path());
                        } else {
                            deleted.insert(entry.path.as_path());
                        }
                    }
                    PairOutcome::WouldDelete { remove, .. } if *remove == original.path => {
                        removed.insert(rep_pos);
                    }
                    _ => {}
                }

                report.record_pair(PairEvent {
                    original: original.path.clone(),
                    duplicate: entry.path.clone(),
                    digest,
                    size: entry.size,
                    outcome,
                });
            }

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(pos + 1, &entry.path.to_string_lossy());
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("resolving");
        }

        if self.config.report_names {
            let survivors: Vec<FileEntry> = entries[..processed]
                .iter()
                .filter(|e| !deleted.contains(e.path.as_path()))
                .cloned()
                .collect();
            report.shared_names = shared_base_names(&survivors);
        }
        Ok(report)
    }

    fn process_pair(
        &self,
        original: &FileEntry,
        duplicate: &FileEntry,
        resolver: &Resolver,
    ) -> Result<PairOutcome, FinderError> {
        if !verify_identical(original, duplicate)? {
            log::warn!(
                "Hash collision but not identical: {} and {}",
                duplicate.path.display(),
                original.path.display()
            );
            return Ok(PairOutcome::NotIdentical);
        }

        log::info!(
            "Duplicate found: {} and {}",
            duplicate.path.display(),
            original.path.display()
        );

        let Some(decision) = resolver.plan(original, duplicate) else {
            log::info!(
                "No rule found for {} and {}",
                original.parent_dir().display(),
                duplicate.parent_dir().display()
            );
            return Ok(PairOutcome::Unresolved);
        };

        match resolver.apply(&decision) {
            Ok(resolution) => Ok(resolution.into()),
            Err(e) => {
                log::error!("{}", e);
                Ok(PairOutcome::DeleteFailed {
                    keep: decision.keep.path.clone(),
                    remove: decision.remove.path.clone(),
                    rule_index: decision.rule_index,
                    error: e.to_string(),
                })
            }
        }
    }
}
