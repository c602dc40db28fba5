//! File actions module.
//!
//! This module provides functionality for:
//! - Rule-based resolution of duplicate pairs ([`resolve`])
//! - Permanent deletion with a pre-deletion size check ([`delete`])
//!
//! ```no_run
//! use dupesweep::actions::Resolver;
//! use dupesweep::rules::{Rule, RuleSet};
//! use dupesweep::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let rules = RuleSet::new(vec![Rule::new("/a", "/b").unwrap()]).unwrap();
//! let resolver = Resolver::new(rules, false);
//! let x = FileEntry::new(PathBuf::from("/a/x.png"), 10);
//! let y = FileEntry::new(PathBuf::from("/b/y.png"), 10);
//! println!("{:?}", resolver.resolve(&x, &y));
//! ```

pub mod delete;
pub mod resolve;

pub use delete::{delete_verified, permanent_delete, DeleteError, DeleteResult, FileSnapshot};
pub use resolve::{Decision, Resolution, Resolver};
