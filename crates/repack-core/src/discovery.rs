//! Discovery of source archives under the input root.
//!
//! Discovery is split in two: a [`CandidateSource`] enumerates file paths in
//! a deterministic order, and [`Discovery`] filters them by the configured
//! [`FormatSet`] and maps each match to a [`WorkItem`]. The walk is done on
//! the real filesystem by [`WalkdirSource`]; tests substitute an in-memory
//! listing.

use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::FormatSet;
use crate::RepackError;
use crate::Result;
use crate::SourceFormat;
use crate::paths;
use crate::paths::PathPolicy;

/// One source archive and its destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    source_path: PathBuf,
    format: SourceFormat,
    dest_dir: PathBuf,
    base_name: OsString,
}

impl WorkItem {
    /// Creates a work item for `source_path` using `policy` to compute its
    /// destinations.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::InvalidPath`] if `source_path` is not below
    /// the policy's input root.
    pub fn new(source_path: PathBuf, format: SourceFormat, policy: &PathPolicy) -> Result<Self> {
        let dest_dir = policy.dest_dir(&source_path)?;
        let base_name = paths::base_name(&source_path)?;
        Ok(Self {
            source_path,
            format,
            dest_dir,
            base_name,
        })
    }

    /// Absolute path of the source archive.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The matched source format.
    #[must_use]
    pub const fn format(&self) -> SourceFormat {
        self.format
    }

    /// The matched format suffix.
    #[must_use]
    pub const fn source_suffix(&self) -> &'static str {
        self.format.suffix()
    }

    /// Directory the archive is extracted into.
    #[must_use]
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// File name of the source without its extension.
    #[must_use]
    pub fn base_name(&self) -> &OsStr {
        &self.base_name
    }

    /// Path of the intermediate `.zip` archive.
    #[must_use]
    pub fn intermediate_archive(&self) -> PathBuf {
        paths::intermediate_archive_path(&self.dest_dir)
    }

    /// Path of the finalized `.cbz` archive.
    #[must_use]
    pub fn final_archive(&self) -> PathBuf {
        paths::final_archive_path(&self.dest_dir)
    }
}

/// Producer of candidate file paths below a root.
///
/// Implementations must return a finite listing in the same order every
/// time they are called on an unchanged tree.
pub trait CandidateSource {
    /// Lists candidate files below `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be enumerated.
    fn candidates(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Candidate source backed by a recursive directory walk.
///
/// Entries are visited in lexical order within each directory. Only regular
/// files are returned; symlinks are not followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkdirSource;

impl CandidateSource for WalkdirSource {
    fn candidates(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| RepackError::Walk {
                path: e.path().unwrap_or(root).to_path_buf(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Finds the archives a run will process.
#[derive(Debug, Clone)]
pub struct Discovery<S = WalkdirSource> {
    source: S,
    policy: PathPolicy,
    formats: FormatSet,
}

impl Discovery<WalkdirSource> {
    /// Creates a discovery over the real filesystem.
    #[must_use]
    pub fn new(policy: PathPolicy, formats: FormatSet) -> Self {
        Self::with_source(WalkdirSource, policy, formats)
    }
}

impl<S: CandidateSource> Discovery<S> {
    /// Creates a discovery reading candidates from `source`.
    #[must_use]
    pub fn with_source(source: S, policy: PathPolicy, formats: FormatSet) -> Self {
        Self {
            source,
            policy,
            formats,
        }
    }

    /// Returns the format `path` would be processed as, if any.
    #[must_use]
    pub fn filter(&self, path: &Path) -> Option<SourceFormat> {
        self.formats.match_path(path)
    }

    /// Enumerates every matching archive below the input root.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails or a matched path cannot be mapped
    /// under the output root.
    pub fn discover(&self) -> Result<Vec<WorkItem>> {
        let root = self.policy.input_root();
        let mut items = Vec::new();

        for path in self.source.candidates(root)? {
            match self.filter(&path) {
                Some(format) => {
                    tracing::debug!(path = %path.display(), format = %format, "Found archive");
                    items.push(WorkItem::new(path, format, &self.policy)?);
                }
                None => {
                    tracing::debug!(path = %path.display(), "Skipping file");
                }
            }
        }

        Ok(items)
    }
}
