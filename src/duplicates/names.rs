//! Informational report of base names shared by several files.
//!
//! Files with the same name but different content are common in photo
//! collections (`IMG_0001.JPG` from two cameras), so this never feeds the
//! resolution path; it only lists the groups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scanner::FileEntry;

/// A base name and every path carrying it, in inventory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGroup {
    pub base_name: String,
    pub paths: Vec<PathBuf>,
}

/// Group records by base name, keeping only names seen more than once.
///
/// Groups come back sorted by name.
#[must_use]
pub fn shared_base_names(entries: &[FileEntry]) -> Vec<NameGroup> {
    let mut by_name: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();
    for entry in entries {
        by_name
            .entry(entry.base_name.as_str())
            .or_default()
            .push(entry.path.clone());
    }

    by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, paths)| NameGroup {
            base_name: name.to_string(),
            paths,
        })
        .collect()
}
