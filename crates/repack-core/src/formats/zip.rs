//! ZIP (`.cbz`) unpack backend.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use ::zip::ZipArchive;

use super::common;
use super::traits::Unpacker;
use crate::RepackError;
use crate::Result;
use crate::report::UnpackReport;

/// ZIP archive unpacker.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipUnpacker;

impl ZipUnpacker {
    /// Creates a new ZIP unpacker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn extraction_error(archive: &Path, err: &::zip::result::ZipError) -> RepackError {
    RepackError::Extraction {
        archive: archive.to_path_buf(),
        reason: err.to_string(),
    }
}

impl Unpacker for ZipUnpacker {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<UnpackReport> {
        let start = Instant::now();
        let file = File::open(archive).map_err(|e| RepackError::Extraction {
            archive: archive.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut zip =
            ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_error(archive, &e))?;

        let mut report = UnpackReport::default();

        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| extraction_error(archive, &e))?;
            let relative = common::safe_entry_path(archive, Path::new(entry.name()))?;
            if relative.as_os_str().is_empty() {
                continue;
            }
            let output_path = dest.join(&relative);

            if entry.is_dir() {
                fs::create_dir_all(&output_path)
                    .map_err(|e| RepackError::file_io(&output_path, e))?;
                report.directories_created += 1;
                continue;
            }

            common::create_parent(&output_path)?;
            let file =
                File::create(&output_path).map_err(|e| RepackError::file_io(&output_path, e))?;
            let mut writer = BufWriter::with_capacity(64 * 1024, file);
            let bytes = io::copy(&mut entry, &mut writer).map_err(|e| RepackError::Extraction {
                archive: archive.to_path_buf(),
                reason: format!("{}: {e}", relative.display()),
            })?;
            writer
                .flush()
                .map_err(|e| RepackError::file_io(&output_path, e))?;

            report.files_extracted += 1;
            report.bytes_written += bytes;
        }

        report.duration = start.elapsed();
        Ok(report)
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }
}
