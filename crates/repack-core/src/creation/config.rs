//! Configuration for archive packing.

use crate::RepackError;
use crate::Result;

/// Compression method used for entries that are not stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackMethod {
    /// DEFLATE compression.
    #[default]
    Deflate,
    /// No compression.
    Store,
}

/// Configuration for packing a directory into a ZIP container.
///
/// # Examples
///
/// ```
/// use repack_core::creation::PackConfig;
///
/// let config = PackConfig::comic().with_overwrite_existing(true);
/// assert!(config.selective_compression);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Compression method for compressible entries.
    ///
    /// Default: [`PackMethod::Deflate`].
    pub method: PackMethod,

    /// Compression level (0-9). `None` uses the codec default.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Store already-compressed entry types (images, archives, media)
    /// without recompressing them.
    ///
    /// Default: `true`.
    pub selective_compression: bool,

    /// Prefix every entry with a folder named after the output archive.
    ///
    /// Default: `false`.
    pub implicit_top_level_folder: bool,

    /// Create the output archive's parent directory when it is missing.
    ///
    /// Default: `false`.
    pub create_missing_dirs: bool,

    /// Replace an existing file at the output path.
    ///
    /// Default: `false`.
    pub overwrite_existing: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self::comic()
    }
}

impl PackConfig {
    /// The profile used for `.cbz` output: deflate at the default level,
    /// selective compression on, no implicit top-level folder, no directory
    /// creation, no overwrite.
    #[must_use]
    pub const fn comic() -> Self {
        Self {
            method: PackMethod::Deflate,
            compression_level: None,
            selective_compression: true,
            implicit_top_level_folder: false,
            create_missing_dirs: false,
            overwrite_existing: false,
        }
    }

    /// Sets the compression method.
    #[must_use]
    pub fn with_method(mut self, method: PackMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets selective compression.
    #[must_use]
    pub fn with_selective_compression(mut self, selective: bool) -> Self {
        self.selective_compression = selective;
        self
    }

    /// Sets the implicit top-level folder flag.
    #[must_use]
    pub fn with_implicit_top_level_folder(mut self, implicit: bool) -> Self {
        self.implicit_top_level_folder = implicit;
        self
    }

    /// Sets whether missing parent directories are created.
    #[must_use]
    pub fn with_create_missing_dirs(mut self, create: bool) -> Self {
        self.create_missing_dirs = create;
        self
    }

    /// Sets whether an existing output file may be replaced.
    #[must_use]
    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is set but greater than 9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(RepackError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
