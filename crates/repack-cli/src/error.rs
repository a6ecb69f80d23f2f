//! Error conversion utilities for CLI.
//!
//! Converts repack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use repack_core::RepackError;
use repack_core::SourceFormat;

fn supported_formats() -> String {
    SourceFormat::ALL
        .iter()
        .map(|format| format.suffix())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Converts `RepackError` to a user-friendly anyhow error with context
pub fn convert_repack_error(err: RepackError) -> anyhow::Error {
    match err {
        RepackError::UnsupportedFormat { value } => {
            anyhow!(
                "Format '{value}' is not supported\n\
                 HINT: Supported formats: {}",
                supported_formats()
            )
        }
        RepackError::NoFormats => {
            anyhow!(
                "No input formats given\n\
                 HINT: Pass at least one format with --formats, e.g. --formats cbr,cbz"
            )
        }
        RepackError::InputNotFound { path } => {
            anyhow!("Input path does not exist: {}", path.display())
        }
        RepackError::InputNotDirectory { path } => {
            anyhow!(
                "Input path is not a readable directory: {}",
                path.display()
            )
        }
        RepackError::OutputExists { path } => {
            anyhow!(
                "Output path already exists: {}\n\
                 HINT: Use --force to overwrite existing files and archives.",
                path.display()
            )
        }
        RepackError::DestinationExists { path } => {
            anyhow!(
                "Destination already exists: {}\n\
                 HINT: Use --force to overwrite, or remove it and run again.",
                path.display()
            )
        }
        RepackError::Extraction { archive, reason } => {
            anyhow!(
                "Failed to extract '{}': {reason}\n\
                 HINT: The archive may be corrupted. Its partial extraction was left in \
                 the output directory; rerun with --force to retry.",
                archive.display()
            )
        }
        RepackError::UnsafeEntry { archive, entry } => {
            anyhow!(
                "Archive '{}' contains an entry outside its extraction directory: '{entry}'\n\
                 HINT: This archive may be malicious. Do not repack it.",
                archive.display()
            )
        }
        RepackError::Compression { archive, reason } => {
            anyhow!("Failed to write '{}': {reason}", archive.display())
        }
        RepackError::FileIo { path, source } => {
            anyhow!("I/O error on '{}': {source}", path.display())
        }
        other => anyhow::Error::from(other).context("Repack failed"),
    }
}
