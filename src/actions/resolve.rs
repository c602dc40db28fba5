//! Rule-based resolution of verified duplicate pairs.
//!
//! [`Resolver`] owns the rule set and the live/dry-run switch. For a pair of
//! identical records it looks up the first rule matching their parent
//! directories ([`Resolver::plan`]) and then either deletes the record in the
//! rule's remove directory or only reports that it would ([`Resolver::apply`]).
//!
//! Dry-run is the default: [`Resolver::new`] never deletes anything unless
//! `live` is explicitly `true`.

use std::path::PathBuf;

use crate::rules::{RemoveSide, RuleSet};
use crate::scanner::FileEntry;

use super::delete::{delete_verified, DeleteError};

/// A rule's verdict on a pair: which record stays and which goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Record in the rule's keep directory
    pub keep: &'a FileEntry,
    /// Record in the rule's remove directory
    pub remove: &'a FileEntry,
    /// Position of the matching rule (0-based)
    pub rule_index: usize,
}

/// Outcome of resolving one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No rule matched; nothing was touched.
    Unresolved,
    /// A rule matched but the run is a dry run.
    WouldDelete {
        keep: PathBuf,
        remove: PathBuf,
        rule_index: usize,
    },
    /// The target was removed from disk.
    Deleted {
        keep: PathBuf,
        remove: PathBuf,
        rule_index: usize,
        size: u64,
    },
}

/// Applies directory rules to duplicate pairs.
#[derive(Debug, Clone)]
pub struct Resolver {
    rules: RuleSet,
    live: bool,
}

impl Resolver {
    /// Create a resolver. Files are only deleted when `live` is true.
    #[must_use]
    pub fn new(rules: RuleSet, live: bool) -> Self {
        Self { rules, live }
    }

    /// Whether deletions are actually performed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// The rules this resolver applies.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decide which of two identical records to remove, without side effects.
    #[must_use]
    pub fn plan<'a>(&self, first: &'a FileEntry, second: &'a FileEntry) -> Option<Decision<'a>> {
        let hit = self
            .rules
            .find_match(&first.parent_dir(), &second.parent_dir())?;

        let (keep, remove) = match hit.remove {
            RemoveSide::First => (second, first),
            RemoveSide::Second => (first, second),
        };

        Some(Decision {
            keep,
            remove,
            rule_index: hit.index,
        })
    }

    /// Carry out a decision: delete in live mode, report only otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] if the live deletion fails. Nothing is
    /// touched in dry-run mode.
    pub fn apply(&self, decision: &Decision<'_>) -> Result<Resolution, DeleteError> {
        let keep = decision.keep.path.clone();
        let remove = decision.remove.path.clone();
        let rule_index = decision.rule_index;

        if !self.live {
            log::info!("Would delete {} (keeping {})", remove.display(), keep.display());
            return Ok(Resolution::WouldDelete {
                keep,
                remove,
                rule_index,
            });
        }

        log::info!("Deleting {} (keeping {})", remove.display(), keep.display());
        let result = delete_verified(&remove, decision.remove.size)?;
        Ok(Resolution::Deleted {
            keep,
            remove,
            rule_index,
            size: result.size,
        })
    }

    /// Plan and apply in one step.
    ///
    /// # Errors
    ///
    /// Returns [`DeleteError`] if a live deletion fails.
    pub fn resolve(&self, first: &FileEntry, second: &FileEntry) -> Result<Resolution, DeleteError> {
        match self.plan(first, second) {
            Some(decision) => self.apply(&decision),
            None => {
                log::debug!(
                    "No rule for {} and {}",
                    first.path.display(),
                    second.path.display()
                );
                Ok(Resolution::Unresolved)
            }
        }
    }
}
