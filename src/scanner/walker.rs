//! Directory walker producing the scan inventory.
//!
//! # Overview
//!
//! [`Walker`] lists every regular file below a root using [`walkdir`],
//! single-threaded and sorted by file name so two walks over an unchanged
//! tree yield records in the same order. Symbolic links are never followed
//! and never reported; only regular files become [`FileEntry`] records.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/images"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Sequential directory walker.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag. Iteration stops before the next entry once
    /// the flag is raised.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// `NotFound`, `NotADirectory`, or an I/O error from `stat`.
    pub fn validate_root(&self) -> Result<(), ScanError> {
        let metadata =
            std::fs::metadata(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
    }

    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.min_size.is_none_or(|min| size >= min)
    }

    /// Walk the directory tree, yielding file records in sorted order.
    ///
    /// Errors are yielded as [`ScanError`] values; the caller decides
    /// whether to stop. Directories, symlinks and special files are skipped.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !(skip_hidden && Self::is_hidden(e)))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    Some(Err(ScanError::from_io(&path, e.into())))
                }
            })
    }

    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
            }
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(ScanError::from_io(entry.path(), e.into()))),
        };

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileEntry::new(entry.path().to_path_buf(), size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_walker_finds_files_recursively() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", b"a");
        write(dir.path(), "sub/b.txt", b"bb");
        write(dir.path(), "sub/deeper/c.txt", b"ccc");

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<FileEntry> = walker.walk().collect::<Result<_, _>>().unwrap();

        assert_eq!(files.len(), 3);
        let c = files.iter().find(|f| f.base_name == "c.txt").unwrap();
        assert_eq!(c.size, 3);
        assert!(c.digest.is_none());
    }

    #[test]
    fn test_walker_order_is_sorted_and_stable() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "z.txt", b"z");
        write(dir.path(), "a.txt", b"a");
        write(dir.path(), "m/x.txt", b"x");

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let first: Vec<PathBuf> = walker.walk().map(|r| r.unwrap().path).collect();
        let second: Vec<PathBuf> = walker.walk().map(|r| r.unwrap().path).collect();

        assert_eq!(first, second);
        let names: Vec<String> = first
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names[0], "a.txt");
        assert_eq!(names[2], "z.txt");
    }

    #[test]
    fn test_walker_keeps_empty_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty", b"");

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 0);
    }

    #[test]
    fn test_walker_min_size_filter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "small", b"12");
        write(dir.path(), "large", b"1234567890");

        let walker = Walker::new(dir.path(), WalkerConfig::new(false, Some(5)));
        let files: Vec<_> = walker.walk().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].base_name, "large");
    }

    #[test]
    fn test_walker_skip_hidden() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "visible.txt", b"v");
        write(dir.path(), ".hidden.txt", b"h");
        write(dir.path(), ".git/config", b"c");

        let walker = Walker::new(dir.path(), WalkerConfig::new(true, None));
        let files: Vec<_> = walker.walk().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].base_name, "visible.txt");

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        assert_eq!(walker.walk().count(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        let target = write(dir.path(), "real.txt", b"data");
        std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].base_name, "real.txt");
    }

    #[test]
    fn test_walker_shutdown_flag() {
        let dir = TempDir::new().unwrap();
        for i in 0..10 {
            write(dir.path(), &format!("f{i}"), b"x");
        }

        let flag = Arc::new(AtomicBool::new(true));
        let walker = Walker::new(dir.path(), WalkerConfig::default()).with_shutdown_flag(flag);
        assert_eq!(walker.walk().count(), 0);
    }

    #[test]
    fn test_validate_root() {
        let dir = TempDir::new().unwrap();
        let file = write(dir.path(), "file.txt", b"x");

        assert!(Walker::new(dir.path(), WalkerConfig::default())
            .validate_root()
            .is_ok());
        assert!(matches!(
            Walker::new(&file, WalkerConfig::default()).validate_root(),
            Err(ScanError::NotADirectory(_))
        ));
        assert!(matches!(
            Walker::new(&dir.path().join("missing"), WalkerConfig::default()).validate_root(),
            Err(ScanError::NotFound(_))
        ));
    }
}
