//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Digest indexing with a single first-seen representative ([`index`])
//! - Byte-for-byte verification of digest collisions ([`verify`])
//! - The end-to-end pipeline and its report ([`finder`], [`report`])
//! - Shared base name reporting ([`names`])

pub mod finder;
pub mod index;
pub mod names;
pub mod report;
pub mod verify;

pub use finder::{DuplicateFinder, FinderConfig, FinderError};
pub use index::{DuplicateIndex, Lookup};
pub use names::{shared_base_names, NameGroup};
pub use report::{PairEvent, PairOutcome, Report, ReportEvent, ScanSummary};
pub use verify::{verify_identical, VerifyError};
