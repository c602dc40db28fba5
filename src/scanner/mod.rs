//! Scanner module for inventory building and content fingerprinting.
//!
//! This module provides functionality for:
//! - Sequential, sorted directory walking using walkdir
//! - Full-content hashing with BLAKE3
//! - Unicode and separator normalization for directory comparison
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file record creation
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//! - [`path_utils`]: Path normalization used by rule matching
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/srv/photos"), WalkerConfig::default());
//! let hasher = Hasher::new();
//! for entry in walker.walk() {
//!     let mut file = entry.unwrap();
//!     let digest = hasher.full_hash(&file.path, file.size).unwrap();
//!     file.digest = Some(digest);
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::Walker;

/// One regular file discovered during the scan.
///
/// Records are created by the [`Walker`] with `digest` unset. The digest is
/// assigned exactly once by the hashing phase and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, absolute or relative to the scan root
    pub path: PathBuf,
    /// Final path component, used for informational name reporting
    pub base_name: String,
    /// File size in bytes at scan time
    pub size: u64,
    /// BLAKE3 content digest, `None` until computed
    pub digest: Option<Hash>,
}

impl FileEntry {
    /// Create a new record without a digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            base_name,
            size,
            digest: None,
        }
    }

    /// Attach a digest to this record.
    #[must_use]
    pub fn with_digest(mut self, digest: Hash) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Normalized parent directory, as used for rule matching.
    #[must_use]
    pub fn parent_dir(&self) -> PathBuf {
        path_utils::parent_dir(&self.path)
    }

    /// Digest as lowercase hex, or an empty string if not yet computed.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        self.digest.as_ref().map(hash_to_hex).unwrap_or_default()
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: Option<u64>,
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(skip_hidden: bool, min_size: Option<u64>) -> Self {
        Self {
            skip_hidden,
            min_size,
        }
    }
}

/// Errors that can occur while building the inventory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
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

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file was truncated or extended between scan and hash.
    #[error("Short read for {path}: expected {expected} bytes, read {actual}")]
    ShortRead {
        /// Path of the file
        path: PathBuf,
        /// Size recorded at scan time
        expected: u64,
        /// Bytes actually read
        actual: u64,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
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
