//! Error types for repack operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `RepackError`.
pub type Result<T> = std::result::Result<T, RepackError>;

/// Errors that can occur while configuring or running a repack.
///
/// Every variant is fatal to the run. Non-fatal cleanup problems are
/// reported as [`CleanupWarning`] values instead.
#[derive(Error, Debug)]
pub enum RepackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A filesystem operation on a known path failed.
    #[error("I/O error on {path}: {source}")]
    FileIo {
        /// The path being read, written, moved or removed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A requested source format is not in the supported set.
    #[error("format '{value}' is not supported")]
    UnsupportedFormat {
        /// The rejected format value as supplied by the caller.
        value: String,
    },

    /// No source formats were configured.
    #[error("no source formats configured")]
    NoFormats,

    /// The input root does not exist.
    #[error("input path does not exist: {path}")]
    InputNotFound {
        /// The missing input root.
        path: PathBuf,
    },

    /// The input root exists but cannot be walked as a directory.
    #[error("input path is not a readable directory: {path}")]
    InputNotDirectory {
        /// The offending input root.
        path: PathBuf,
    },

    /// The output root already exists and force mode is off.
    #[error("output path already exists: {path}")]
    OutputExists {
        /// The pre-existing output root.
        path: PathBuf,
    },

    /// An extraction directory or destination archive is already present.
    #[error("destination already exists: {path}")]
    DestinationExists {
        /// The pre-existing destination.
        path: PathBuf,
    },

    /// The unpack backend failed.
    #[error("failed to extract {archive}: {reason}")]
    Extraction {
        /// The source archive.
        archive: PathBuf,
        /// Backend error message.
        reason: String,
    },

    /// The pack backend failed.
    #[error("failed to compress {archive}: {reason}")]
    Compression {
        /// The archive being written.
        archive: PathBuf,
        /// Backend error message.
        reason: String,
    },

    /// An archive entry would be written outside the extraction directory.
    #[error("unsafe entry '{entry}' in {archive}")]
    UnsafeEntry {
        /// The source archive.
        archive: PathBuf,
        /// The entry name as stored in the archive.
        entry: String,
    },

    /// A pack configuration names a compression level outside 0-9.
    #[error("invalid compression level {level}, expected 0-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Walking a directory tree failed.
    #[error("failed to walk {path}: {reason}")]
    Walk {
        /// The directory being walked.
        path: PathBuf,
        /// Walker error message.
        reason: String,
    },

    /// A path could not be mapped under the output root.
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// Why it could not be mapped.
        reason: &'static str,
    },
}

impl RepackError {
    /// Returns `true` if this error is raised before any filesystem work.
    ///
    /// # Examples
    ///
    /// ```
    /// use repack_core::RepackError;
    ///
    /// let err = RepackError::UnsupportedFormat { value: "7z".into() };
    /// assert!(err.is_configuration_error());
    ///
    /// let err = RepackError::DestinationExists { path: "out/book.cbz".into() };
    /// assert!(!err.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::NoFormats
                | Self::InputNotFound { .. }
                | Self::InputNotDirectory { .. }
                | Self::OutputExists { .. }
                | Self::InvalidCompressionLevel { .. }
        )
    }

    /// Returns `true` if this error came from an unpack or pack backend.
    #[must_use]
    pub const fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::Extraction { .. } | Self::Compression { .. } | Self::UnsafeEntry { .. }
        )
    }

    /// Returns the path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InputNotFound { path }
            | Self::InputNotDirectory { path }
            | Self::OutputExists { path }
            | Self::DestinationExists { path }
            | Self::Walk { path, .. }
            | Self::FileIo { path, .. }
            | Self::InvalidPath { path, .. } => Some(path),
            Self::Extraction { archive, .. }
            | Self::Compression { archive, .. }
            | Self::UnsafeEntry { archive, .. } => Some(archive),
            Self::Io(_)
            | Self::UnsupportedFormat { .. }
            | Self::NoFormats
            | Self::InvalidCompressionLevel { .. } => None,
        }
    }

    /// Wraps an I/O error with the path it was raised for.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }
}

/// A non-fatal problem hit while deleting transient files.
///
/// Thumbnail deletion failures and failures to remove the extracted tree
/// after finalizing end up here. They are logged and reported, and leave
/// the item's outcome unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupWarning {
    /// Path that could not be removed or walked.
    pub path: PathBuf,
    /// What went wrong.
    pub message: String,
}

impl CleanupWarning {
    /// Creates a new warning for `path`.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
