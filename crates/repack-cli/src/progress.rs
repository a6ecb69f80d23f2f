//! Progress bar implementation for repack runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressDrawTarget;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use repack_core::RunProgress;
use repack_core::Stage;
use repack_core::WorkItem;
use std::fmt::Write;

/// CLI progress bar over archives, implementing `RunProgress`.
///
/// Shows the archive count, the current archive's name and stage, and an
/// ETA. The bar is sized once discovery reports the total. Cleans up on
/// drop.
pub struct CliProgress {
    bar: ProgressBar,
    completed: usize,
}

impl CliProgress {
    /// Creates a hidden progress bar drawing to `target` once started.
    #[must_use]
    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);

        // Template: "[████████░░░░] 3/10 archives (12s) book4: extracted"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} archives ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        Self { bar, completed: 0 }
    }

    /// Creates a progress bar drawing to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Checks if we should show progress.
    ///
    /// The bar only appears on a terminal when no log lines or JSON would
    /// interleave with it.
    #[must_use]
    pub fn should_show(verbosity: u8, json: bool) -> bool {
        verbosity == 0 && !json && Term::stderr().is_term()
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl RunProgress for CliProgress {
    fn on_discovered(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_item_start(&mut self, item: &WorkItem, _current: usize, _total: usize) {
        self.bar
            .set_message(item.base_name().to_string_lossy().into_owned());
    }

    fn on_stage(&mut self, item: &WorkItem, stage: Stage) {
        self.bar.set_message(format!(
            "{}: {}",
            item.base_name().to_string_lossy(),
            stage.as_str()
        ));
    }

    fn on_item_complete(&mut self, _item: &WorkItem) {
        self.completed += 1;
        self.bar.inc(1);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
