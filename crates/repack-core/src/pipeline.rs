//! The per-archive repack state machine.
//!
//! Every [`WorkItem`] moves through four stages in order:
//!
//! ```text
//! Pending -> Extracted -> Cleaned -> Compressed -> Finalized
//! ```
//!
//! Extraction, compression and finalization errors are returned to the
//! caller and end the run, leaving the item's extraction directory on disk.
//! Cleanup problems (thumbnail deletion and removal of the extracted tree
//! after finalizing) are recorded as [`CleanupWarning`]s and the item
//! carries on.

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::WalkDir;

use crate::CleanupWarning;
use crate::RepackError;
use crate::Result;
use crate::RunConfig;
use crate::codec::Codec;
use crate::codec::DefaultCodec;
use crate::creation::PackConfig;
use crate::discovery::WorkItem;
use crate::report::ItemReport;
use crate::report::RunProgress;

/// File name suffix of viewer thumbnail caches removed before packing.
pub const THUMBNAIL_SUFFIX: &str = ".db";

/// Position of a work item in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Discovered, nothing done yet.
    Pending,
    /// Source unpacked into the extraction directory.
    Extracted,
    /// Thumbnail caches removed from the extracted tree.
    Cleaned,
    /// Intermediate `.zip` archive written.
    Compressed,
    /// Final `.cbz` archive in place.
    Finalized,
}

impl Stage {
    /// Returns a lowercase name for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Extracted => "extracted",
            Self::Cleaned => "cleaned",
            Self::Compressed => "compressed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `path` names a thumbnail cache file.
///
/// The match is on the whole file name, so a file called exactly `.db`
/// counts too.
#[must_use]
pub fn is_thumbnail(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    let suffix = THUMBNAIL_SUFFIX.as_bytes();
    name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Returns the directory whose contents should be packed.
///
/// Archives that wrap all their pages in one top-level folder are packed
/// from inside that folder, so the result has no redundant nesting level.
///
/// # Errors
///
/// Returns an error if `dest_dir` cannot be read.
pub fn packed_root(dest_dir: &Path) -> Result<PathBuf> {
    let io_err = |e| RepackError::file_io(dest_dir, e);
    let mut entries = fs::read_dir(dest_dir).map_err(io_err)?;
    let first = entries.next().transpose().map_err(io_err)?;
    let second = entries.next().transpose().map_err(io_err)?;

    match (first, second) {
        (Some(only), None) => {
            let file_type = only
                .file_type()
                .map_err(|e| RepackError::file_io(only.path(), e))?;
            if file_type.is_dir() {
                Ok(only.path())
            } else {
                Ok(dest_dir.to_path_buf())
            }
        }
        _ => Ok(dest_dir.to_path_buf()),
    }
}

/// Runs work items through extract, clean, compress and finalize.
#[derive(Debug, Clone)]
pub struct RepackPipeline<C = DefaultCodec> {
    codec: C,
    force: bool,
    pack_config: PackConfig,
}

impl RepackPipeline<DefaultCodec> {
    /// Creates a pipeline using the built-in codecs.
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        Self::with_codec(DefaultCodec, config)
    }
}

impl<C: Codec> RepackPipeline<C> {
    /// Creates a pipeline that delegates unpacking and packing to `codec`.
    #[must_use]
    pub fn with_codec(codec: C, config: &RunConfig) -> Self {
        Self {
            codec,
            force: config.force,
            pack_config: config.pack_config(),
        }
    }

    /// Returns whether pre-existing destinations are replaced.
    #[must_use]
    pub const fn force(&self) -> bool {
        self.force
    }

    /// Runs every stage for `item`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. The item's extraction directory and
    /// intermediate archive are left in place.
    pub fn run(&self, item: &WorkItem, progress: &mut dyn RunProgress) -> Result<ItemReport> {
        let start = Instant::now();
        let span = tracing::info_span!("archive", source = %item.source_path().display());
        let _guard = span.enter();

        let mut report = ItemReport::new(item.source_path());

        self.extract(item, &mut report)?;
        progress.on_stage(item, Stage::Extracted);

        self.clean(item, &mut report);
        progress.on_stage(item, Stage::Cleaned);

        self.compress(item, &mut report)?;
        progress.on_stage(item, Stage::Compressed);

        self.finalize(item, &mut report)?;
        progress.on_stage(item, Stage::Finalized);

        report.duration = start.elapsed();
        Ok(report)
    }

    /// Unpacks the source into a fresh extraction directory.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::DestinationExists`] if the extraction directory
    /// is present and force mode is off, or the codec error on failure.
    pub fn extract(&self, item: &WorkItem, report: &mut ItemReport) -> Result<()> {
        let dest = item.dest_dir();
        self.clear_destination(dest)?;

        tracing::info!(dest = %dest.display(), "Extracting");
        fs::create_dir_all(dest).map_err(|e| RepackError::file_io(dest, e))?;

        let unpacked = self
            .codec
            .unpack(item.format(), item.source_path(), dest)
            .inspect_err(|e| tracing::error!(error = %e, "Extraction failed"))?;

        report.files_extracted = unpacked.files_extracted;
        Ok(())
    }

    /// Deletes thumbnail cache files from the extracted tree.
    ///
    /// Never fails: deletion and walk errors become warnings on `report`.
    pub fn clean(&self, item: &WorkItem, report: &mut ItemReport) {
        for entry in WalkDir::new(item.dest_dir()) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(item.dest_dir()).to_path_buf();
                    warn_cleanup(report, CleanupWarning::new(path, e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_thumbnail(entry.path()) {
                continue;
            }

            tracing::debug!(path = %entry.path().display(), "Found thumbnail file");
            match fs::remove_file(entry.path()) {
                Ok(()) => report.thumbnails_removed += 1,
                Err(e) => warn_cleanup(report, CleanupWarning::new(entry.path(), e.to_string())),
            }
        }
    }

    /// Packs the extracted tree into the intermediate `.zip` archive.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::DestinationExists`] if the intermediate archive
    /// is present and force mode is off, or the codec error on failure.
    pub fn compress(&self, item: &WorkItem, report: &mut ItemReport) -> Result<()> {
        let output = item.intermediate_archive();
        if output.exists() {
            if !self.force {
                return Err(RepackError::DestinationExists { path: output });
            }
            tracing::warn!(path = %output.display(), "Overwriting existing intermediate archive");
            fs::remove_file(&output).map_err(|e| RepackError::file_io(&output, e))?;
        }

        let root = packed_root(item.dest_dir())?;
        tracing::info!(
            root = %root.display(),
            output = %output.display(),
            "Compressing"
        );

        let packed = self
            .codec
            .pack(std::slice::from_ref(&root), &output, &self.pack_config)
            .inspect_err(|e| tracing::error!(error = %e, "Compression failed"))?;

        report.packed_root = root;
        report.files_packed = packed.files_added;
        report.bytes_packed = packed.bytes_written;
        Ok(())
    }

    /// Moves the intermediate archive to its final name and removes the
    /// extracted tree.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::DestinationExists`] if the final archive is
    /// present and force mode is off, or an I/O error if the rename fails.
    /// Failure to remove the extracted tree is only a warning.
    pub fn finalize(&self, item: &WorkItem, report: &mut ItemReport) -> Result<()> {
        let intermediate = item.intermediate_archive();
        let target = item.final_archive();

        if fs::symlink_metadata(&target).is_ok() {
            if !self.force {
                tracing::error!(path = %target.display(), "Destination archive already exists");
                return Err(RepackError::DestinationExists { path: target });
            }
            tracing::warn!(path = %target.display(), "Overwriting existing archive");
            report.overwritten = true;
        }

        fs::rename(&intermediate, &target).map_err(|e| RepackError::file_io(&target, e))?;
        report.archive = target;

        remove_extracted(item.dest_dir(), report);
        Ok(())
    }


    /// Makes sure nothing is in the way of the extraction directory.
    fn clear_destination(&self, dest: &Path) -> Result<()> {
        let Ok(metadata) = fs::symlink_metadata(dest) else {
            return Ok(());
        };

        if !self.force {
            tracing::error!(dest = %dest.display(), "Extraction directory already exists");
            return Err(RepackError::DestinationExists {
                path: dest.to_path_buf(),
            });
        }

        tracing::warn!(dest = %dest.display(), "Removing existing extraction directory");
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(dest)
        } else {
            fs::remove_file(dest)
        };
        removed.map_err(|e| RepackError::file_io(dest, e))
    }
}

/// Deletes the extracted tree once its archive is in place.
fn remove_extracted(dest: &Path, report: &mut ItemReport) {
    tracing::info!(dest = %dest.display(), "Deleting extracted source folder");
    if let Err(e) = fs::remove_dir_all(dest) {
        warn_cleanup(report, CleanupWarning::new(dest, e.to_string()));
    }
}

fn warn_cleanup(report: &mut ItemReport, warning: CleanupWarning) {
    tracing::warn!(path = %warning.path.display(), "Cleanup failed: {}", warning.message);
    report.add_warning(warning);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FormatSet;
    use crate::SourceFormat;
    use crate::paths::PathPolicy;
    use crate::report::NoopProgress;
    use crate::test_utils::write_test_zip;
    use crate::test_utils::zip_entry_names;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let input = temp.path().join("in");
            let output = temp.path().join("out");
            fs::create_dir_all(&input).unwrap();
            Self {
                _temp: temp,
                input,
                output,
            }
        }

        fn cbz(&self, name: &str, entries: &[(&str, &[u8])]) -> WorkItem {
            let path = self.input.join(name);
            write_test_zip(&path, entries);
            let policy = PathPolicy::new(&self.input, &self.output);
            WorkItem::new(path, SourceFormat::Cbz, &policy).unwrap()
        }
    }

    fn pipeline(force: bool) -> RepackPipeline {
        RepackPipeline::new(&RunConfig::new("", "", FormatSet::default()).with_force(force))
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Pending.as_str(), "pending");
        assert_eq!(Stage::Finalized.to_string(), "finalized");
        assert!(Stage::Extracted < Stage::Compressed);
    }

    #[test]
    fn test_is_thumbnail() {
        assert!(is_thumbnail(Path::new("Thumbs.db")));
        assert!(is_thumbnail(Path::new("a/b/THUMBS.DB")));
        assert!(!is_thumbnail(Path::new("page.jpg")));
        assert!(is_thumbnail(Path::new(".db")));
        assert!(is_thumbnail(Path::new("covers/.DB")));
        assert!(!is_thumbnail(Path::new("db")));
        assert!(!is_thumbnail(Path::new("notes.dbx")));
    }

    #[test]
    fn test_packed_root_unwraps_single_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Wrapper/pages")).unwrap();
        assert_eq!(
            packed_root(temp.path()).unwrap(),
            temp.path().join("Wrapper")
        );
    }

    #[test]
    fn test_packed_root_keeps_multiple_entries() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("b.jpg"), b"x").unwrap();
        assert_eq!(packed_root(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn test_packed_root_keeps_single_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("only.jpg"), b"x").unwrap();
        assert_eq!(packed_root(temp.path()).unwrap(), temp.path());
    }

    #[test]
    fn test_run_produces_final_archive() {
        let fixture = Fixture::new();
        let item = fixture.cbz(
            "book1.cbz",
            &[
                ("page01.jpg", b"one".as_slice()),
                ("Thumbs.db", b"cache".as_slice()),
            ],
        );

        let report = pipeline(false).run(&item, &mut NoopProgress).unwrap();

        let target = fixture.output.join("book1.cbz");
        assert_eq!(report.archive, target);
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.thumbnails_removed, 1);
        assert_eq!(report.files_packed, 1);
        assert!(!report.overwritten);
        assert!(!item.dest_dir().exists());
        assert!(!item.intermediate_archive().exists());
        assert_eq!(zip_entry_names(&target), vec!["page01.jpg"]);
    }

    #[test]
    fn test_extract_refuses_existing_destination() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        fs::create_dir_all(item.dest_dir()).unwrap();
        fs::write(item.dest_dir().join("leftover.jpg"), b"old").unwrap();

        let mut report = ItemReport::new(item.source_path());
        let err = pipeline(false).extract(&item, &mut report).unwrap_err();
        assert!(matches!(err, RepackError::DestinationExists { .. }));
        assert!(item.dest_dir().join("leftover.jpg").exists());
    }

    #[test]
    fn test_extract_force_replaces_destination() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        fs::create_dir_all(item.dest_dir()).unwrap();
        fs::write(item.dest_dir().join("leftover.jpg"), b"old").unwrap();

        let mut report = ItemReport::new(item.source_path());
        pipeline(true).extract(&item, &mut report).unwrap();
        assert!(!item.dest_dir().join("leftover.jpg").exists());
        assert!(item.dest_dir().join("page01.jpg").exists());
    }

    #[test]
    fn test_compress_refuses_existing_intermediate() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        fs::write(item.intermediate_archive(), b"stale").unwrap();

        let err = pipeline.compress(&item, &mut report).unwrap_err();
        assert!(matches!(err, RepackError::DestinationExists { .. }));
        assert_eq!(fs::read(item.intermediate_archive()).unwrap(), b"stale");
    }

    #[test]
    fn test_compress_unwraps_single_folder() {
        let fixture = Fixture::new();
        let item = fixture.cbz(
            "book1.cbz",
            &[
                ("Book 1/", b"".as_slice()),
                ("Book 1/page01.jpg", b"one".as_slice()),
                ("Book 1/page02.jpg", b"two".as_slice()),
            ],
        );
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        pipeline.compress(&item, &mut report).unwrap();

        assert_eq!(report.packed_root, item.dest_dir().join("Book 1"));
        assert_eq!(
            zip_entry_names(&item.intermediate_archive()),
            vec!["page01.jpg", "page02.jpg"]
        );
    }

    #[test]
    fn test_finalize_refuses_existing_archive() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        pipeline.compress(&item, &mut report).unwrap();
        fs::write(item.final_archive(), b"original").unwrap();

        let err = pipeline.finalize(&item, &mut report).unwrap_err();
        assert!(matches!(err, RepackError::DestinationExists { .. }));
        assert_eq!(fs::read(item.final_archive()).unwrap(), b"original");
        assert!(item.intermediate_archive().exists());
    }

    #[test]
    fn test_finalize_force_overwrites() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        fs::create_dir_all(&fixture.output).unwrap();
        fs::write(item.final_archive(), b"original").unwrap();

        let report = pipeline(true).run(&item, &mut NoopProgress).unwrap();
        assert!(report.overwritten);
        assert_eq!(zip_entry_names(&item.final_archive()), vec!["page01.jpg"]);
    }

    #[test]
    fn test_clean_missing_directory_warns() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);

        let mut report = ItemReport::new(item.source_path());
        pipeline(false).clean(&item, &mut report);
        assert_eq!(report.thumbnails_removed, 0);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_clean_removes_nested_thumbnails_only() {
        let fixture = Fixture::new();
        let item = fixture.cbz(
            "book1.cbz",
            &[
                ("a/Thumbs.db", b"x".as_slice()),
                ("a/page.jpg", b"x".as_slice()),
                ("b/ehthumbs.DB", b"x".as_slice()),
                ("b/notes.dbx", b"x".as_slice()),
            ],
        );
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        pipeline.clean(&item, &mut report);

        assert_eq!(report.thumbnails_removed, 2);
        assert!(!report.has_warnings());
        assert!(item.dest_dir().join("a/page.jpg").exists());
        assert!(item.dest_dir().join("b/notes.dbx").exists());
        assert!(!item.dest_dir().join("a/Thumbs.db").exists());
    }

    #[test]
    fn test_clean_removes_bare_db_file() {
        let fixture = Fixture::new();
        let item = fixture.cbz(
            "book1.cbz",
            &[("p.jpg", b"x".as_slice()), (".db", b"x".as_slice())],
        );
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        pipeline.clean(&item, &mut report);

        assert_eq!(report.thumbnails_removed, 1);
        assert!(!item.dest_dir().join(".db").exists());
        assert!(item.dest_dir().join("p.jpg").exists());
    }

    #[test]
    fn test_extract_io_error_names_destination() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("p.jpg", b"x".as_slice())]);
        fs::write(&fixture.output, b"not a directory").unwrap();

        let mut report = ItemReport::new(item.source_path());
        let err = pipeline(true).extract(&item, &mut report).unwrap_err();

        assert!(matches!(err, RepackError::FileIo { .. }));
        assert_eq!(err.path(), Some(item.dest_dir()));
        assert!(err.to_string().contains(&item.dest_dir().display().to_string()));
    }

    #[test]
    fn test_packed_root_missing_directory_names_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let err = packed_root(&missing).unwrap_err();
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn test_finalize_cleanup_failure_keeps_archive() {
        let fixture = Fixture::new();
        let item = fixture.cbz("book1.cbz", &[("page01.jpg", b"one".as_slice())]);
        let mut report = ItemReport::new(item.source_path());
        let pipeline = pipeline(false);
        pipeline.extract(&item, &mut report).unwrap();
        pipeline.compress(&item, &mut report).unwrap();
        fs::remove_dir_all(item.dest_dir()).unwrap();

        pipeline.finalize(&item, &mut report).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, item.dest_dir());
        assert_eq!(report.archive, item.final_archive());
        assert_eq!(zip_entry_names(&item.final_archive()), vec!["page01.jpg"]);
        assert!(!item.intermediate_archive().exists());
    }
}
