//! High-level public API for repacking archive trees.

use crate::Result;
use crate::RunConfig;
use crate::driver::Driver;
use crate::report::NoopProgress;
use crate::report::RunProgress;
use crate::report::RunReport;

/// Repacks every matching archive below the configured input root.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration fails validation
/// - Walking the input tree fails
/// - An archive cannot be extracted, packed or moved into place
///
/// # Examples
///
/// ```no_run
/// use repack_core::FormatSet;
/// use repack_core::RunConfig;
/// use repack_core::repack_tree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RunConfig::new("/comics", "/repacked/comics", FormatSet::default());
/// let report = repack_tree(&config)?;
/// println!("Repacked {} archives", report.archives_repacked);
/// # Ok(())
/// # }
/// ```
pub fn repack_tree(config: &RunConfig) -> Result<RunReport> {
    let mut progress = NoopProgress;
    repack_tree_with_progress(config, &mut progress)
}

/// Repacks every matching archive, reporting progress to `progress`.
///
/// # Errors
///
/// Same as [`repack_tree`].
pub fn repack_tree_with_progress(
    config: &RunConfig,
    progress: &mut dyn RunProgress,
) -> Result<RunReport> {
    Driver::new(config.clone()).run(progress)
}
