//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use repack_core::ItemReport;
use repack_core::RunReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct ItemOutput {
    source: String,
    archive: String,
    packed_root: String,
    files_extracted: usize,
    thumbnails_removed: usize,
    files_packed: usize,
    bytes_packed: u64,
    overwritten: bool,
    warnings: Vec<String>,
    duration_ms: u128,
}

impl From<&ItemReport> for ItemOutput {
    fn from(item: &ItemReport) -> Self {
        Self {
            source: item.source.display().to_string(),
            archive: item.archive.display().to_string(),
            packed_root: item.packed_root.display().to_string(),
            files_extracted: item.files_extracted,
            thumbnails_removed: item.thumbnails_removed,
            files_packed: item.files_packed,
            bytes_packed: item.bytes_packed,
            overwritten: item.overwritten,
            warnings: item.warnings.iter().map(ToString::to_string).collect(),
            duration_ms: item.duration.as_millis(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunOutput {
    archives_found: usize,
    archives_repacked: usize,
    dry_run: bool,
    discovered: Vec<String>,
    items: Vec<ItemOutput>,
    thumbnails_removed: usize,
    duration_ms: u128,
}

impl From<&RunReport> for RunOutput {
    fn from(report: &RunReport) -> Self {
        Self {
            archives_found: report.archives_found,
            archives_repacked: report.archives_repacked,
            dry_run: report.dry_run,
            discovered: report
                .discovered
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            items: report.items.iter().map(ItemOutput::from).collect(),
            thumbnails_removed: report.thumbnails_removed(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_run_result(&self, report: &RunReport) -> Result<()> {
        let output = JsonOutput::success("repack", RunOutput::from(report));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("repack", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
