//! Repack operation reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::CleanupWarning;
use crate::discovery::WorkItem;
use crate::pipeline::Stage;

/// Report of a single unpack operation.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the unpack operation.
    pub duration: Duration,
}

/// Report of one archive passing through the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ItemReport {
    /// The source archive.
    pub source: PathBuf,

    /// The finalized `.cbz` archive.
    pub archive: PathBuf,

    /// Directory whose contents were packed.
    pub packed_root: PathBuf,

    /// Number of files extracted from the source archive.
    pub files_extracted: usize,

    /// Number of thumbnail cache files removed before packing.
    pub thumbnails_removed: usize,

    /// Number of files added to the new archive.
    pub files_packed: usize,

    /// Uncompressed bytes added to the new archive.
    pub bytes_packed: u64,

    /// Whether an existing archive at `archive` was replaced.
    pub overwritten: bool,

    /// Cleanup problems that did not stop the item.
    pub warnings: Vec<CleanupWarning>,

    /// Time spent on this item.
    pub duration: Duration,
}

impl ItemReport {
    /// Creates an empty report for `source`.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Records a cleanup warning.
    pub fn add_warning(&mut self, warning: CleanupWarning) {
        self.warnings.push(warning);
    }

    /// Returns whether any cleanup warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Report of a whole run.
///
/// # Examples
///
/// ```
/// use repack_core::RunReport;
///
/// let report = RunReport::default();
/// assert_eq!(report.archives_found, 0);
/// assert!(report.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of archives discovered.
    pub archives_found: usize,

    /// Number of archives that reached the finalized state.
    pub archives_repacked: usize,

    /// Whether the run stopped after discovery.
    pub dry_run: bool,

    /// Source paths of every discovered archive, in processing order.
    pub discovered: Vec<PathBuf>,

    /// Per-archive reports, in processing order.
    pub items: Vec<ItemReport>,

    /// Duration of the run.
    pub duration: Duration,
}

impl RunReport {
    /// Returns `true` if discovery found nothing to repack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archives_found == 0
    }

    /// Iterates over cleanup warnings from every item.
    pub fn cleanup_warnings(&self) -> impl Iterator<Item = &CleanupWarning> {
        self.items.iter().flat_map(|item| item.warnings.iter())
    }

    /// Total number of thumbnail cache files removed.
    #[must_use]
    pub fn thumbnails_removed(&self) -> usize {
        self.items.iter().map(|item| item.thumbnails_removed).sum()
    }
}

/// Callback trait for progress reporting during a run.
///
/// # Examples
///
/// ```
/// use repack_core::RunProgress;
/// use repack_core::Stage;
/// use repack_core::WorkItem;
///
/// struct PrintProgress;
///
/// impl RunProgress for PrintProgress {
///     fn on_discovered(&mut self, total: usize) {
///         println!("{total} archives");
///     }
///
///     fn on_item_start(&mut self, item: &WorkItem, current: usize, total: usize) {
///         println!("[{current}/{total}] {}", item.source_path().display());
///     }
///
///     fn on_stage(&mut self, _item: &WorkItem, stage: Stage) {
///         println!("  {}", stage.as_str());
///     }
///
///     fn on_item_complete(&mut self, _item: &WorkItem) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait RunProgress {
    /// Called once discovery has enumerated every archive.
    fn on_discovered(&mut self, total: usize);

    /// Called before an archive enters the pipeline (`current` is 1-indexed).
    fn on_item_start(&mut self, item: &WorkItem, current: usize, total: usize);

    /// Called after an archive reaches a new stage.
    fn on_stage(&mut self, item: &WorkItem, stage: Stage);

    /// Called after an archive has been finalized.
    fn on_item_complete(&mut self, item: &WorkItem);

    /// Called once when the run finishes successfully.
    fn on_complete(&mut self);
}

/// No-op implementation of `RunProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl RunProgress for NoopProgress {
    fn on_discovered(&mut self, _total: usize) {}

    fn on_item_start(&mut self, _item: &WorkItem, _current: usize, _total: usize) {}

    fn on_stage(&mut self, _item: &WorkItem, _stage: Stage) {}

    fn on_item_complete(&mut self, _item: &WorkItem) {}

    fn on_complete(&mut self) {}
}
