//! ZIP archive creation.
//!
//! Entry names are relative to each source directory, so packing `book/`
//! yields `page01.jpg` rather than `book/page01.jpg`. Set
//! [`PackConfig::implicit_top_level_folder`] to prefix every entry with the
//! output archive's stem instead.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::compression;
use super::config::PackConfig;
use super::report::PackReport;
use crate::RepackError;
use crate::Result;

/// Creates a ZIP archive at `output` from the given source directories.
///
/// # Examples
///
/// ```no_run
/// use repack_core::creation::PackConfig;
/// use repack_core::creation::zip::create_zip;
/// use std::path::Path;
///
/// let report = create_zip(
///     Path::new("out/book1.zip"),
///     &[Path::new("out/book1")],
///     &PackConfig::comic(),
/// )?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), repack_core::RepackError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - `output` exists and overwriting is disabled
/// - The parent of `output` is missing and directory creation is disabled
/// - A source does not exist
/// - Writing the archive fails
pub fn create_zip<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &PackConfig,
) -> Result<PackReport> {
    let output = output.as_ref();
    config.validate()?;

    if output.exists() && !config.overwrite_existing {
        return Err(RepackError::DestinationExists {
            path: output.to_path_buf(),
        });
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        if config.create_missing_dirs {
            fs::create_dir_all(parent).map_err(|e| RepackError::file_io(parent, e))?;
        } else {
            return Err(compression_error(
                output,
                format!("parent directory does not exist: {}", parent.display()),
            ));
        }
    }

    let file = File::create(output).map_err(|e| compression_error(output, e.to_string()))?;
    let mut report = create_zip_internal(BufWriter::new(file), output, sources, config)?;
    report.bytes_compressed = fs::metadata(output)
        .map_err(|e| RepackError::file_io(output, e))?
        .len();
    Ok(report)
}

fn compression_error(output: &Path, reason: impl Into<String>) -> RepackError {
    RepackError::Compression {
        archive: output.to_path_buf(),
        reason: reason.into(),
    }
}

/// Writes every source into a ZIP stream.
fn create_zip_internal<W: Write + Seek, P: AsRef<Path>>(
    writer: W,
    output: &Path,
    sources: &[P],
    config: &PackConfig,
) -> Result<PackReport> {
    let start = Instant::now();
    let mut zip = ZipWriter::new(writer);
    let mut report = PackReport::default();

    let prefix = if config.implicit_top_level_folder {
        output.file_stem().map(PathBuf::from).unwrap_or_default()
    } else {
        PathBuf::new()
    };

    if !prefix.as_os_str().is_empty() {
        let name = format!("{}/", normalize_zip_path(&prefix)?);
        zip.add_directory(name.as_str(), SimpleFileOptions::default())
            .map_err(|e| compression_error(output, format!("failed to add directory: {e}")))?;
        report.directories_added += 1;
    }

    for source in sources {
        let source = source.as_ref();
        if !source.exists() {
            return Err(compression_error(
                output,
                format!("source not found: {}", source.display()),
            ));
        }

        if source.is_file() {
            let name = source
                .file_name()
                .map(|name| prefix.join(name))
                .ok_or_else(|| {
                    compression_error(output, format!("no file name: {}", source.display()))
                })?;
            add_file(&mut zip, output, source, &name, config, &mut report)?;
            continue;
        }

        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| RepackError::Walk {
                path: source.to_path_buf(),
                reason: e.to_string(),
            })?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| RepackError::InvalidPath {
                    path: entry.path().to_path_buf(),
                    reason: "entry is outside the source directory",
                })?;
            let archive_path = prefix.join(relative);
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                report.files_skipped += 1;
                report.add_warning(format!("Skipped symlink: {}", entry.path().display()));
            } else if file_type.is_dir() {
                let name = format!("{}/", normalize_zip_path(&archive_path)?);
                zip.add_directory(name.as_str(), SimpleFileOptions::default())
                    .map_err(|e| {
                        compression_error(output, format!("failed to add directory: {e}"))
                    })?;
                report.directories_added += 1;
            } else {
                add_file(
                    &mut zip,
                    output,
                    entry.path(),
                    &archive_path,
                    config,
                    &mut report,
                )?;
            }
        }
    }

    let mut writer = zip
        .finish()
        .map_err(|e| compression_error(output, format!("failed to finish ZIP archive: {e}")))?;
    writer
        .flush()
        .map_err(|e| RepackError::file_io(output, e))?;

    report.duration = start.elapsed();
    Ok(report)
}

/// Adds a single file to the ZIP archive.
fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    output: &Path,
    file_path: &Path,
    archive_path: &Path,
    config: &PackConfig,
    report: &mut PackReport,
) -> Result<()> {
    let file = File::open(file_path).map_err(|e| RepackError::file_io(file_path, e))?;
    let size = file
        .metadata()
        .map_err(|e| RepackError::file_io(file_path, e))?
        .len();
    let method = compression::method_for(file_path, config);

    let options = SimpleFileOptions::default()
        .compression_method(method)
        .compression_level(
            config
                .compression_level
                .filter(|_| method != zip::CompressionMethod::Stored)
                .map(i64::from),
        )
        .large_file(size > u64::from(u32::MAX));

    let name = normalize_zip_path(archive_path)?;
    zip.start_file(name.as_str(), options)
        .map_err(|e| compression_error(output, format!("failed to start file in ZIP: {e}")))?;

    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let bytes = io::copy(&mut reader, zip).map_err(|e| RepackError::file_io(file_path, e))?;

    report.files_added += 1;
    if method == zip::CompressionMethod::Stored {
        report.files_stored += 1;
    }
    report.bytes_written += bytes;
    Ok(())
}

/// Normalizes a path for the ZIP format (forward slashes).
fn normalize_zip_path(path: &Path) -> Result<String> {
    let path_str = path.to_str().ok_or_else(|| RepackError::InvalidPath {
        path: path.to_path_buf(),
        reason: "path is not valid UTF-8",
    })?;

    #[cfg(windows)]
    let normalized = path_str.replace('\\', "/");

    #[cfg(not(windows))]
    let normalized = path_str.to_string();

    Ok(normalized)
}
