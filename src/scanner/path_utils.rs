//! Directory path normalization for rule matching.
//!
//! Rules compare a file's immediate parent directory against configured
//! directories by exact equality, so both sides go through [`normalize_dir`]
//! first:
//!
//! - `.` components are dropped
//! - `..` removes the preceding component (`/x/a/../b` becomes `/x/b`)
//! - repeated and trailing separators disappear (`/a//b/` becomes `/a/b`)
//! - the text is converted to Unicode NFC
//!
//! Resolution is lexical: symlinks are not followed. The scan root goes
//! through [`clean_path`] so walked paths carry no `..` either.
//!
//! # Background
//!
//! macOS hands out NFD (decomposed) file names while Linux and Windows
//! usually carry NFC, so the same visible directory name can have two byte
//! representations:
//!
//! - NFC: `café` with 'é' as U+00E9
//! - NFD: `café` with 'e' U+0065 followed by U+0301
//!
//! # Example
//!
//! ```
//! use dupesweep::scanner::path_utils::{dirs_equal, normalize_dir};
//! use std::path::{Path, PathBuf};
//!
//! assert_eq!(normalize_dir(Path::new("/photos/2016/")), PathBuf::from("/photos/2016"));
//! assert!(dirs_equal(Path::new("/photos/./cafe\u{0301}"), Path::new("/photos/café/")));
//! ```

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a string to NFC (Composed) form.
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Resolve `.` and `..` components lexically and drop redundant
/// separators. The text itself is left untouched.
///
/// `..` at the root stays at the root. A relative path keeps leading `..`
/// components it cannot pop.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.into_iter().collect()
}

/// Normalize a directory path for comparison.
///
/// Paths that are not valid UTF-8 skip the NFC step but are still
/// component-normalized.
#[must_use]
pub fn normalize_dir(path: &Path) -> PathBuf {
    let cleaned = clean_path(path);

    match cleaned.to_str() {
        Some(s) => PathBuf::from(normalize_path_str(s)),
        None => cleaned,
    }
}

/// Normalized immediate parent directory of a file path.
///
/// A bare file name has an empty parent.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(normalize_dir).unwrap_or_default()
}

/// Check whether two directory paths are equal after normalization.
#[must_use]
pub fn dirs_equal(a: &Path, b: &Path) -> bool {
    normalize_dir(a) == normalize_dir(b)
}
