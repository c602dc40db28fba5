//! Output formatters for run reports.
//!
//! This module provides different renderings of the same [`Report`]:
//! - Plain text lines for humans (default)
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::Report;
//! use dupesweep::error::ExitCode;
//! use dupesweep::output::{JsonOutput, TextOutput};
//!
//! let report = Report::new(false);
//! print!("{}", TextOutput::new(&report).render().unwrap());
//! println!("{}", JsonOutput::new(&report, ExitCode::NoDuplicates).to_json_pretty().unwrap());
//! ```
//!
//! [`Report`]: crate::duplicates::Report

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
