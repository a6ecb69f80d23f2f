//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use repack_core::ItemReport;
use repack_core::RunReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn format_item(&self, item: &ItemReport) {
        let _ = self.term.write_line(&format!(
            "  {} -> {} ({} files, {})",
            item.source.display(),
            item.archive.display(),
            item.files_packed,
            Self::format_size(item.bytes_packed)
        ));
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_run_result(&self, report: &RunReport) -> Result<()> {
        if self.quiet || report.is_empty() {
            return Ok(());
        }

        if report.dry_run {
            self.headline(&format!(
                "Dry run: {} archives would be repacked",
                report.archives_found
            ));
            return Ok(());
        }

        self.headline(&format!(
            "Repacked {} of {} archives",
            report.archives_repacked, report.archives_found
        ));

        if self.verbose {
            for item in &report.items {
                self.format_item(item);
            }
        }

        let _ = self.term.write_line(&format!(
            "  Thumbnails removed: {}",
            report.thumbnails_removed()
        ));
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        for warning in report.cleanup_warnings() {
            self.format_warning(&warning.to_string());
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
