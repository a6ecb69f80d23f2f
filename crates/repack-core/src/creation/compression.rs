//! Per-entry compression method selection.
//!
//! With selective compression on, entries whose extension marks them as
//! already compressed are stored as-is. Recompressing JPEG or PNG pages
//! costs time and usually makes them larger.

use std::path::Path;

use zip::CompressionMethod;

use super::config::PackConfig;
use super::config::PackMethod;

/// Extensions of formats that are already compressed.
const PRECOMPRESSED_EXTENSIONS: &[&str] = &[
    "7z", "avi", "avif", "br", "bz2", "cab", "cbr", "cbz", "docx", "flac", "gif", "gz", "heic",
    "jar", "jpeg", "jpg", "jxl", "lz", "lz4", "lzma", "m4a", "m4v", "mkv", "mov", "mp3", "mp4",
    "mpeg", "mpg", "ogg", "png", "pptx", "rar", "sz", "tbz2", "tgz", "txz", "webm", "webp", "xlsx",
    "xz", "zip", "zipx", "zst",
];

/// Returns `true` if the path's extension marks an already-compressed file.
///
/// # Examples
///
/// ```
/// use repack_core::creation::compression::is_precompressed;
/// use std::path::Path;
///
/// assert!(is_precompressed(Path::new("page01.JPG")));
/// assert!(!is_precompressed(Path::new("ComicInfo.xml")));
/// ```
#[must_use]
pub fn is_precompressed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PRECOMPRESSED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Chooses the ZIP compression method for an entry.
#[must_use]
pub fn method_for(path: &Path, config: &PackConfig) -> CompressionMethod {
    match config.method {
        PackMethod::Store => CompressionMethod::Stored,
        PackMethod::Deflate if config.selective_compression && is_precompressed(path) => {
            CompressionMethod::Stored
        }
        PackMethod::Deflate if config.compression_level == Some(0) => CompressionMethod::Stored,
        PackMethod::Deflate => CompressionMethod::Deflated,
    }
}
