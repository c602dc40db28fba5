//! Single-representative duplicate index.
//!
//! Maps each digest to the first record ever inserted with it. Later records
//! sharing the digest are compared against that representative only; the
//! representative is never replaced, even if it is deleted later in the run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::scanner::Hash;

/// Result of [`DuplicateIndex::lookup_or_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// No representative existed; the record is now stored.
    Inserted,
    /// A representative already exists at this inventory position.
    Found(usize),
}

/// Digest → first-seen record position in the scan inventory.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    by_digest: HashMap<Hash, usize>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under `digest` unless a representative already exists.
    ///
    /// When one exists it is returned and the index is left unchanged.
    pub fn lookup_or_insert(&mut self, digest: Hash, record: usize) -> Lookup {
        match self.by_digest.entry(digest) {
            Entry::Occupied(existing) => Lookup::Found(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Lookup::Inserted
            }
        }
    }

    /// Representative stored for a digest, if any.
    #[must_use]
    pub fn get(&self, digest: &Hash) -> Option<usize> {
        self.by_digest.get(digest).copied()
    }

    /// Number of distinct digests seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    /// Whether nothing has been inserted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}
