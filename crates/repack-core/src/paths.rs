//! Mapping of source archives to their destination paths.
//!
//! The directory structure under the input root is mirrored under the output
//! root. A source at `<input>/a/b/book.cbr` is extracted to
//! `<output>/a/b/book` and finalized as `<output>/a/b/book.cbz`.

use std::ffi::OsStr;
use std::ffi::OsString;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::RepackError;
use crate::Result;

/// Name of the directory created next to the input tree when no output root
/// is given.
pub const DEFAULT_OUTPUT_DIR: &str = "repacked";

/// Extension of the intermediate archive written by the pack stage.
pub const INTERMEDIATE_EXTENSION: &str = "zip";

/// Extension of the finalized archive.
pub const FINAL_EXTENSION: &str = "cbz";

/// Maps source paths under an input root to destinations under an output
/// root.
///
/// # Examples
///
/// ```
/// use repack_core::paths::PathPolicy;
/// use std::path::Path;
///
/// let policy = PathPolicy::new("/comics", "/out");
/// let dest = policy.dest_dir(Path::new("/comics/marvel/book1.cbr")).unwrap();
/// assert_eq!(dest, Path::new("/out/marvel/book1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPolicy {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl PathPolicy {
    /// Creates a policy for the given roots.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Returns the input root.
    #[must_use]
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Returns the output root.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns the containing directory of `source` relative to the input
    /// root.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::InvalidPath`] if `source` is not below the
    /// input root.
    pub fn relative_subpath(&self, source: &Path) -> Result<PathBuf> {
        let parent = source.parent().ok_or_else(|| RepackError::InvalidPath {
            path: source.to_path_buf(),
            reason: "path has no parent directory",
        })?;
        parent
            .strip_prefix(&self.input_root)
            .map(Path::to_path_buf)
            .map_err(|_| RepackError::InvalidPath {
                path: source.to_path_buf(),
                reason: "path is not under the input root",
            })
    }

    /// Returns the extraction directory for `source`:
    /// `output_root / relative_subpath / base_name`.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::InvalidPath`] if `source` is not below the
    /// input root or has no file name.
    pub fn dest_dir(&self, source: &Path) -> Result<PathBuf> {
        let relative = self.relative_subpath(source)?;
        let base = base_name(source)?;
        Ok(self.output_root.join(relative).join(base))
    }
}

/// Returns the file name of `source` without its final extension.
///
/// Only the last extension is removed, so `Vol.1.cbr` becomes `Vol.1`.
///
/// # Errors
///
/// Returns [`RepackError::InvalidPath`] if the path has no file name.
pub fn base_name(source: &Path) -> Result<OsString> {
    source
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .map(OsStr::to_os_string)
        .ok_or_else(|| RepackError::InvalidPath {
            path: source.to_path_buf(),
            reason: "path has no file name",
        })
}

/// Returns `dest_dir` with `.extension` appended to its last component.
///
/// The extension is appended rather than substituted, so a directory named
/// `Vol.1` maps to `Vol.1.cbz`, not `Vol.cbz`.
fn with_appended_extension(dest_dir: &Path, extension: &str) -> PathBuf {
    let mut path = dest_dir.as_os_str().to_os_string();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Returns the path of the intermediate archive for an extraction directory.
#[must_use]
pub fn intermediate_archive_path(dest_dir: &Path) -> PathBuf {
    with_appended_extension(dest_dir, INTERMEDIATE_EXTENSION)
}

/// Returns the path of the finalized archive for an extraction directory.
///
/// # Examples
///
/// ```
/// use repack_core::paths::final_archive_path;
/// use std::path::Path;
///
/// assert_eq!(
///     final_archive_path(Path::new("/out/Saga Vol.1")),
///     Path::new("/out/Saga Vol.1.cbz")
/// );
/// ```
#[must_use]
pub fn final_archive_path(dest_dir: &Path) -> PathBuf {
    with_appended_extension(dest_dir, FINAL_EXTENSION)
}

/// Computes the output root used when none is given.
///
/// When the input was given as `.` the output lives inside it, at
/// `<input>/repacked`. Otherwise it is a sibling tree,
/// `<parent(input)>/repacked/<basename(input)>`.
#[must_use]
pub fn default_output_root(input_arg: &Path, input_abs: &Path) -> PathBuf {
    if input_arg == Path::new(".") {
        return input_abs.join(DEFAULT_OUTPUT_DIR);
    }
    match (input_abs.parent(), input_abs.file_name()) {
        (Some(parent), Some(name)) => parent.join(DEFAULT_OUTPUT_DIR).join(name),
        _ => input_abs.join(DEFAULT_OUTPUT_DIR),
    }
}

/// Returns `true` if one root is equal to or nested inside the other.
#[must_use]
pub fn roots_overlap(input_root: &Path, output_root: &Path) -> bool {
    input_root.starts_with(output_root) || output_root.starts_with(input_root)
}

/// Makes `path` absolute against the current directory without touching the
/// filesystem.
///
/// `.` and `..` components are resolved lexically, so `..` yields the parent
/// of the current directory rather than a path ending in `..`.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| RepackError::file_io(path, e))?;
    Ok(normalize_lexically(&absolute))
}

/// Drops `.` components and folds each `..` into the component before it.
///
/// A `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
