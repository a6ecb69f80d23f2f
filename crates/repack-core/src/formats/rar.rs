//! RAR (`.cbr`) unpack backend.
//!
//! Decoding is delegated to the UnRAR library through the `unrar` crate.
//! Entry headers are walked one at a time so every entry name can be
//! checked before anything is written.

use std::fs;
use std::path::Path;
use std::time::Instant;

use unrar::Archive;
use unrar::error::UnrarError;

use super::common;
use super::traits::Unpacker;
use crate::RepackError;
use crate::Result;
use crate::report::UnpackReport;

/// RAR archive unpacker.
#[derive(Debug, Default, Clone, Copy)]
pub struct RarUnpacker;

impl RarUnpacker {
    /// Creates a new RAR unpacker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn extraction_error(archive: &Path, err: &UnrarError) -> RepackError {
    RepackError::Extraction {
        archive: archive.to_path_buf(),
        reason: err.to_string(),
    }
}

impl Unpacker for RarUnpacker {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<UnpackReport> {
        let start = Instant::now();
        if !archive.is_file() {
            return Err(RepackError::Extraction {
                archive: archive.to_path_buf(),
                reason: "archive file not found".to_string(),
            });
        }

        let mut report = UnpackReport::default();
        let mut open = Archive::new(archive)
            .open_for_processing()
            .map_err(|e| extraction_error(archive, &e))?;

        while let Some(header) = open
            .read_header()
            .map_err(|e| extraction_error(archive, &e))?
        {
            let entry = header.entry();
            let relative = common::safe_entry_path(archive, &entry.filename)?;

            open = if relative.as_os_str().is_empty() {
                header.skip().map_err(|e| extraction_error(archive, &e))?
            } else if entry.is_directory() {
                let dir = dest.join(&relative);
                fs::create_dir_all(&dir).map_err(|e| RepackError::file_io(&dir, e))?;
                report.directories_created += 1;
                header.skip().map_err(|e| extraction_error(archive, &e))?
            } else {
                let size = entry.unpacked_size;
                let output_path = dest.join(&relative);
                common::create_parent(&output_path)?;
                let next = header
                    .extract_to(&output_path)
                    .map_err(|e| extraction_error(archive, &e))?;
                report.files_extracted += 1;
                report.bytes_written += size;
                next
            };
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    fn format_name(&self) -> &'static str {
        "rar"
    }
}
