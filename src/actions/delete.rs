//! Permanent file deletion with a pre-deletion size check.
//!
//! # Overview
//!
//! Removal is synchronous and irreversible; there is no trash. Before a file
//! is removed, [`delete_verified`] takes a [`FileSnapshot`] and refuses to
//! proceed if the size no longer matches what the scan recorded, since the
//! content that was verified identical may have changed.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::delete::delete_verified;
//! use std::path::Path;
//!
//! match delete_verified(Path::new("/backup/IMG_0001.jpg"), 48_213) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// File size changed since the scan.
    #[error("file modified since scan: {path} (expected {expected} bytes, found {actual})")]
    Modified {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The remove call itself failed.
    #[error("delete failed for {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error while inspecting the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified { path: p, .. }
            | Self::RemoveFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// File metadata snapshot taken right before deletion.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

impl FileSnapshot {
    /// Capture a file's current state.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or can't be accessed.
    pub fn capture(path: &Path) -> Result<Self, DeleteError> {
        let metadata = fs::metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    /// Check the snapshot against the size recorded at scan time.
    ///
    /// # Errors
    ///
    /// Returns `Modified` if the sizes differ.
    pub fn verify_size(&self, expected: u64) -> Result<(), DeleteError> {
        if self.size != expected {
            log::warn!(
                "File modified since scan: {} (size changed from {} to {})",
                self.path.display(),
                expected,
                self.size
            );
            return Err(DeleteError::Modified {
                path: self.path.clone(),
                expected,
                actual: self.size,
            });
        }
        Ok(())
    }
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `RemoveFailed` if the remove call fails for another reason
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let snapshot = FileSnapshot::capture(path)?;
    remove(snapshot)
}

/// Delete a file after checking it still has the size recorded at scan time.
///
/// # Errors
///
/// - `Modified` if the file size changed since the scan
/// - Any error from [`permanent_delete`]
pub fn delete_verified(path: &Path, expected_size: u64) -> Result<DeleteResult, DeleteError> {
    let snapshot = FileSnapshot::capture(path)?;
    snapshot.verify_size(expected_size)?;
    remove(snapshot)
}

fn remove(snapshot: FileSnapshot) -> Result<DeleteResult, DeleteError> {
    let FileSnapshot { path, size } = snapshot;

    if let Err(e) = fs::remove_file(&path) {
        log::error!("Delete failed for {}: {}", path.display(), e);
        return Err(match e.kind() {
            io::ErrorKind::NotFound => DeleteError::NotFound(path),
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path),
            _ => DeleteError::RemoveFailed { path, source: e },
        });
    }

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult { path, size })
}
