//! Directory-pair rules for resolving duplicates.
//!
//! A [`Rule`] says that when two identical files sit directly in `keep_dir`
//! and `remove_dir`, the one in `remove_dir` goes. Matching looks at the
//! immediate parent directory only; a file in a subdirectory of `keep_dir`
//! does not match. Rules are tried in order and the first match wins.
//!
//! # Example
//!
//! ```
//! use dupesweep::rules::{RemoveSide, Rule, RuleSet};
//! use std::path::Path;
//!
//! let rules = RuleSet::new(vec![Rule::new("/a", "/b").unwrap()]).unwrap();
//! let hit = rules.find_match(Path::new("/b"), Path::new("/a")).unwrap();
//! assert_eq!(hit.index, 0);
//! assert_eq!(hit.remove, RemoveSide::First);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::scanner::path_utils::normalize_dir;

/// Reasons a single rule is invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A directory string was empty.
    #[error("'{field}' directory is empty")]
    EmptyPath {
        /// Which field (`keep` or `remove`)
        field: &'static str,
    },

    /// A directory was not an absolute path.
    #[error("'{field}' directory must be absolute: {path}")]
    NotAbsolute {
        /// Which field (`keep` or `remove`)
        field: &'static str,
        /// The offending path
        path: PathBuf,
    },

    /// `keep` and `remove` name the same directory.
    #[error("'keep' and 'remove' are the same directory: {0}")]
    SameDirectory(PathBuf),
}

/// Errors for a rule set as a whole.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    /// No rules were supplied.
    #[error("rule set is empty")]
    Empty,
}

/// A validated keep/remove directory pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    keep_dir: PathBuf,
    remove_dir: PathBuf,
}

impl Rule {
    /// Build a rule, normalizing both directories.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if either path is empty or relative, or if both
    /// normalize to the same directory.
    pub fn new(keep: impl AsRef<Path>, remove: impl AsRef<Path>) -> Result<Self, RuleError> {
        let keep_dir = validate_dir("keep", keep.as_ref())?;
        let remove_dir = validate_dir("remove", remove.as_ref())?;

        if keep_dir == remove_dir {
            return Err(RuleError::SameDirectory(keep_dir));
        }

        Ok(Self {
            keep_dir,
            remove_dir,
        })
    }

    /// Directory whose files survive.
    #[must_use]
    pub fn keep_dir(&self) -> &Path {
        &self.keep_dir
    }

    /// Directory whose files are deleted.
    #[must_use]
    pub fn remove_dir(&self) -> &Path {
        &self.remove_dir
    }

    /// Which side of the pair to remove, if this rule applies.
    ///
    /// Both arguments must already be normalized.
    #[must_use]
    pub fn applies(&self, first_dir: &Path, second_dir: &Path) -> Option<RemoveSide> {
        if first_dir == self.keep_dir && second_dir == self.remove_dir {
            Some(RemoveSide::Second)
        } else if first_dir == self.remove_dir && second_dir == self.keep_dir {
            Some(RemoveSide::First)
        } else {
            None
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "keep {} / remove {}",
            self.keep_dir.display(),
            self.remove_dir.display()
        )
    }
}

fn validate_dir(field: &'static str, path: &Path) -> Result<PathBuf, RuleError> {
    if path.as_os_str().is_empty() {
        return Err(RuleError::EmptyPath { field });
    }
    if !path.is_absolute() {
        return Err(RuleError::NotAbsolute {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(normalize_dir(path))
}

/// Which record of a pair a rule selects for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveSide {
    /// The first record passed to the matcher.
    First,
    /// The second record passed to the matcher.
    Second,
}

/// The first rule that applied to a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// Position of the rule in the set (0-based)
    pub index: usize,
    /// Record to remove
    pub remove: RemoveSide,
}

/// An ordered, non-empty, immutable list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`RuleSetError::Empty`] if `rules` is empty.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleSetError> {
        if rules.is_empty() {
            return Err(RuleSetError::Empty);
        }
        Ok(Self { rules })
    }

    /// Find the first rule matching the pair of parent directories.
    ///
    /// Directories are normalized before comparison.
    #[must_use]
    pub fn find_match(&self, first_dir: &Path, second_dir: &Path) -> Option<RuleMatch> {
        let first_dir = normalize_dir(first_dir);
        let second_dir = normalize_dir(second_dir);

        self.rules.iter().enumerate().find_map(|(index, rule)| {
            rule.applies(&first_dir, &second_dir)
                .map(|remove| RuleMatch { index, remove })
        })
    }

    /// Rule at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Iterate over the rules in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules. Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
