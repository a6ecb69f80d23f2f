//! Run configuration.

use std::fs;
use std::path::PathBuf;

use crate::FormatSet;
use crate::RepackError;
use crate::Result;
use crate::creation::PackConfig;
use crate::paths;
use crate::paths::PathPolicy;

/// Configuration for a single repack run.
///
/// # Examples
///
/// ```
/// use repack_core::FormatSet;
/// use repack_core::RunConfig;
///
/// let config = RunConfig::new("/comics", "/comics-repacked", FormatSet::default())
///     .with_force(true)
///     .with_dry_run(true);
/// assert!(config.force);
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root of the tree searched for source archives.
    pub input_root: PathBuf,

    /// Root of the tree the repacked archives are written to.
    pub output_root: PathBuf,

    /// Accepted source formats.
    pub formats: FormatSet,

    /// Replace pre-existing destinations instead of failing.
    ///
    /// Default: `false`.
    pub force: bool,

    /// Enumerate archives without touching the filesystem.
    ///
    /// Default: `false`.
    pub dry_run: bool,
}

impl RunConfig {
    /// Creates a configuration with force and dry-run off.
    pub fn new(
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        formats: FormatSet,
    ) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            formats,
            force: false,
            dry_run: false,
        }
    }

    /// Sets force mode.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the path policy for this run's roots.
    #[must_use]
    pub fn path_policy(&self) -> PathPolicy {
        PathPolicy::new(&self.input_root, &self.output_root)
    }

    /// Returns the pack configuration used for every archive in the run.
    #[must_use]
    pub fn pack_config(&self) -> PackConfig {
        PackConfig::comic().with_overwrite_existing(self.force)
    }

    /// Checks the configuration against the filesystem.
    ///
    /// Logs a warning when the roots are equal or nested, since archives
    /// written to the output tree may be picked up by a later run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input root does not exist
    /// - The input root is not a readable directory
    /// - The output root exists and force mode is off
    pub fn validate(&self) -> Result<()> {
        let metadata = fs::metadata(&self.input_root).map_err(|_| RepackError::InputNotFound {
            path: self.input_root.clone(),
        })?;
        if !metadata.is_dir() || fs::read_dir(&self.input_root).is_err() {
            return Err(RepackError::InputNotDirectory {
                path: self.input_root.clone(),
            });
        }

        if !self.force && fs::symlink_metadata(&self.output_root).is_ok() {
            return Err(RepackError::OutputExists {
                path: self.output_root.clone(),
            });
        }

        if paths::roots_overlap(&self.input_root, &self.output_root) {
            tracing::warn!(
                input = %self.input_root.display(),
                output = %self.output_root.display(),
                "Input and output directories overlap; repacked archives may be discovered by later runs"
            );
        }

        Ok(())
    }
}
