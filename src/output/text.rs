//! Human-readable report lines.
//!
//! One line per processed file, one per collided pair, then the shared name
//! groups (if collected) and a summary block. Colors come from `yansi` and
//! are off unless explicitly enabled.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Color, Paint, Style};

use crate::duplicates::{NameGroup, PairEvent, PairOutcome, Report, ReportEvent, ScanSummary};
use crate::scanner::hash_to_hex;

const WARN: Style = Style::new().fg(Color::Yellow).bold();
const DELETE: Style = Style::new().fg(Color::Red);
const PLAN: Style = Style::new().fg(Color::Cyan);
const MUTED: Style = Style::new().dim();

/// Plain text formatter.
pub struct TextOutput<'a> {
    report: &'a Report,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter without colors.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            color: false,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: String, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text
        }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for event in &self.report.events {
            match event {
                ReportEvent::File { path, digest, .. } => {
                    let hex = self.paint(hash_to_hex(digest), MUTED);
                    writeln!(writer, "{}  {}", hex, path.display())?;
                }
                ReportEvent::Pair(pair) => writeln!(writer, "{}", self.pair_line(pair))?,
            }
        }

        if !self.report.shared_names.is_empty() {
            writeln!(writer)?;
            self.write_names(writer, &self.report.shared_names)?;
        }

        writeln!(writer)?;
        self.write_summary(writer, &self.report.summary)
    }

    /// Render the full report into a string.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`Self::write_to`].
    pub fn render(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn pair_line(&self, pair: &PairEvent) -> String {
        let dup = pair.duplicate.display();
        let orig = pair.original.display();

        match &pair.outcome {
            PairOutcome::NotIdentical => self.paint(
                format!("Hash collision but not identical: {} and {}", dup, orig),
                WARN,
            ),
            PairOutcome::RepresentativeRemoved => self.paint(
                format!(
                    "Skipped {}: matching file {} was already {}",
                    dup,
                    orig,
                    if self.report.summary.live {
                        "deleted"
                    } else {
                        "marked for deletion"
                    }
                ),
                MUTED,
            ),
            PairOutcome::Unresolved => {
                format!("Duplicate found: {} and {} (no rule found)", dup, orig)
            }
            PairOutcome::WouldDelete { remove, .. } => format!(
                "Duplicate found: {} and {}; {}",
                dup,
                orig,
                self.paint(format!("would delete {}", remove.display()), PLAN)
            ),
            PairOutcome::Deleted { remove, .. } => format!(
                "Duplicate found: {} and {}; {}",
                dup,
                orig,
                self.paint(format!("deleted {}", remove.display()), DELETE)
            ),
            PairOutcome::DeleteFailed { remove, error, .. } => format!(
                "Duplicate found: {} and {}; {}",
                dup,
                orig,
                self.paint(
                    format!("failed to delete {}: {}", remove.display(), error),
                    WARN
                )
            ),
        }
    }

    fn write_names<W: Write>(&self, writer: &mut W, groups: &[NameGroup]) -> io::Result<()> {
        writeln!(writer, "Files sharing a base name:")?;
        for group in groups {
            writeln!(writer, "  {} ({} files)", group.base_name, group.paths.len())?;
            for path in &group.paths {
                writeln!(writer, "    {}", path.display())?;
            }
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, writer: &mut W, summary: &ScanSummary) -> io::Result<()> {
        let mode = if summary.live { "live" } else { "dry run" };
        writeln!(writer, "Summary ({}):", mode)?;
        writeln!(
            writer,
            "  Files scanned:     {} ({})",
            summary.total_files,
            ByteSize::b(summary.total_bytes)
        )?;
        writeln!(writer, "  Duplicate pairs:   {}", summary.duplicate_pairs)?;
        writeln!(writer, "  Hash collisions:   {}", summary.hash_collisions)?;
        writeln!(writer, "  Unresolved:        {}", summary.unresolved)?;
        if summary.live {
            writeln!(writer, "  Deleted:           {}", summary.deleted)?;
            writeln!(writer, "  Delete failures:   {}", summary.delete_failures)?;
            writeln!(writer, "  Skipped:           {}", summary.skipped)?;
            writeln!(
                writer,
                "  Space reclaimed:   {}",
                ByteSize::b(summary.reclaimable_bytes)
            )?;
        } else {
            writeln!(writer, "  Would delete:      {}", summary.would_delete)?;
            writeln!(
                writer,
                "  Reclaimable:       {}",
                ByteSize::b(summary.reclaimable_bytes)
            )?;
        }
        if summary.interrupted {
            writeln!(
                writer,
                "{}",
                self.paint("  Interrupted: report is partial".to_string(), WARN)
            )?;
        }
        Ok(())
    }
}
