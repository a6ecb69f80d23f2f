//! The unpack/pack seam used by the pipeline.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::SourceFormat;
use crate::creation;
use crate::creation::PackConfig;
use crate::creation::PackReport;
use crate::report::UnpackReport;

/// Format codecs the pipeline delegates to.
///
/// [`DefaultCodec`] dispatches to the built-in RAR and ZIP backends. Tests
/// and embedders can supply their own implementation.
pub trait Codec {
    /// Extracts `archive`, stored in `format`, into the existing directory
    /// `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn unpack(&self, format: SourceFormat, archive: &Path, dest: &Path) -> Result<UnpackReport>;

    /// Packs the contents of each directory in `sources` into a ZIP
    /// container at `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn pack(&self, sources: &[PathBuf], output: &Path, config: &PackConfig) -> Result<PackReport>;
}

/// Codec backed by the built-in format backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCodec;

impl Codec for DefaultCodec {
    fn unpack(&self, format: SourceFormat, archive: &Path, dest: &Path) -> Result<UnpackReport> {
        format.unpacker().unpack(archive, dest)
    }

    fn pack(&self, sources: &[PathBuf], output: &Path, config: &PackConfig) -> Result<PackReport> {
        creation::create_zip(output, sources, config)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn unpack(&self, format: SourceFormat, archive: &Path, dest: &Path) -> Result<UnpackReport> {
        (**self).unpack(format, archive, dest)
    }

    fn pack(&self, sources: &[PathBuf], output: &Path, config: &PackConfig) -> Result<PackReport> {
        (**self).pack(sources, output, config)
    }
}
