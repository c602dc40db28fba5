//! Progress reporting for the walk and hash phases, using indicatif.
//!
//! The finder reports through the [`ProgressCallback`] trait; [`Progress`]
//! renders a spinner while walking and a bar while hashing and resolving.
//! Phases run one after another, so only one bar is ever active.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the finder phases.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - `"walking"`, `"hashing"` or `"resolving"`
    /// * `total` - Number of items to process, 0 if unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter.
pub struct Progress {
    active: Mutex<Option<ProgressBar>>,
    bytes: AtomicU64,
    hidden: bool,
}

impl Progress {
    /// Create a reporter. With `hidden`, nothing is drawn.
    ///
    /// ```
    /// use dupesweep::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        Self {
            active: Mutex::new(None),
            bytes: AtomicU64::new(0),
            hidden,
        }
    }

    fn bar(&self, pb: ProgressBar) -> ProgressBar {
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_active(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.active.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        let pb = match phase {
            "walking" => {
                let pb = self.bar(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            "resolving" => {
                let pb = self.bar(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style());
                pb.set_message("Resolving");
                pb
            }
            _ => {
                self.bytes.store(0, Ordering::Relaxed);
                let pb = self.bar(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style());
                pb.set_message("Hashing");
                pb
            }
        };

        if let Ok(mut guard) = self.active.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        let message = truncate_path(path, 40);
        self.with_active(|pb| {
            pb.set_position(current as u64);
            pb.set_message(message);
        });
    }

    fn on_item_completed(&self, bytes: u64) {
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    fn on_phase_end(&self, phase: &str) {
        let Ok(mut guard) = self.active.lock() else {
            return;
        };
        if let Some(pb) = guard.take() {
            let message = match phase {
                "walking" => "Walk complete".to_string(),
                "resolving" => "Resolution complete".to_string(),
                _ => format!(
                    "Hashed {}",
                    ByteSize::b(self.bytes.load(Ordering::Relaxed))
                ),
            };
            pb.finish_with_message(message);
        }
    }

    fn on_message(&self, message: &str) {
        let message = message.to_string();
        self.with_active(|pb| pb.set_message(message));
    }
}

/// Shorten a path to at most `max_len` characters, keeping the file name.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }
    format!(".../{file_name}")
}
