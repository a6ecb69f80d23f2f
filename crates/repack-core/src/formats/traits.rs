//! Common trait for unpack backends.

use std::path::Path;

use crate::Result;
use crate::report::UnpackReport;

/// Trait for format-specific unpack backends.
///
/// Implementations extract a whole container into an existing directory.
/// They are stateless, so a single static instance serves every archive.
pub trait Unpacker: Sync {
    /// Extracts `archive` into `dest`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be read, an entry would land
    /// outside `dest`, or writing to `dest` fails.
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<UnpackReport>;

    /// Returns the container format name.
    fn format_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestUnpacker;

    impl Unpacker for TestUnpacker {
        fn unpack(&self, _archive: &Path, _dest: &Path) -> Result<UnpackReport> {
            Ok(UnpackReport::default())
        }

        fn format_name(&self) -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_trait_object_dispatch() {
        let unpacker: &dyn Unpacker = &TestUnpacker;
        assert_eq!(unpacker.format_name(), "test");
        let report = unpacker
            .unpack(Path::new("a.cbz"), Path::new("out"))
            .unwrap_or_default();
        assert_eq!(report.files_extracted, 0);
    }
}
