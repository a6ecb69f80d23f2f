//! Helpers shared by the unpack backends.

use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::RepackError;
use crate::Result;

/// Validates an entry name and returns it as a relative path under the
/// extraction directory.
///
/// `.` components are dropped. Absolute paths, drive prefixes and `..`
/// components are rejected. An empty result means the entry names the
/// extraction directory itself.
pub fn safe_entry_path(archive: &Path, entry: &Path) -> Result<PathBuf> {
    let mut safe = PathBuf::new();
    for component in entry.components() {
        match component {
            Component::Normal(segment) => safe.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(RepackError::UnsafeEntry {
                    archive: archive.to_path_buf(),
                    entry: entry.display().to_string(),
                });
            }
        }
    }
    Ok(safe)
}

/// Creates the parent directory of `path` if it is missing.
pub fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RepackError::file_io(parent, e))?;
    }
    Ok(())
}
