//! Source format registry and unpack backends.
//!
//! The set of recognized source formats is closed: [`SourceFormat`] lists
//! every format the pipeline can unpack, and [`FormatSet`] is the validated
//! subset a run accepts.

mod common;
pub mod rar;
pub mod traits;
pub mod zip;

pub use rar::RarUnpacker;
pub use traits::Unpacker;
pub use zip::ZipUnpacker;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::RepackError;
use crate::Result;

static RAR_UNPACKER: RarUnpacker = RarUnpacker;
static ZIP_UNPACKER: ZipUnpacker = ZipUnpacker;

/// A recognized source archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// RAR-based comic archive (`.cbr`).
    Cbr,
    /// ZIP-based comic archive (`.cbz`).
    Cbz,
}

impl SourceFormat {
    /// Every supported format, in registry order.
    pub const ALL: [Self; 2] = [Self::Cbr, Self::Cbz];

    /// Returns the file suffix (extension without the dot).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Cbr => "cbr",
            Self::Cbz => "cbz",
        }
    }

    /// Looks up a format by suffix, ignoring ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use repack_core::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_suffix("CBR"), Some(SourceFormat::Cbr));
    /// assert_eq!(SourceFormat::from_suffix("pdf"), None);
    /// ```
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.suffix().eq_ignore_ascii_case(suffix))
    }

    /// Returns `true` if the path's extension names this format.
    #[must_use]
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.suffix()))
    }

    /// Returns the unpack backend for this format.
    #[must_use]
    pub fn unpacker(self) -> &'static dyn Unpacker {
        match self {
            Self::Cbr => &RAR_UNPACKER,
            Self::Cbz => &ZIP_UNPACKER,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for SourceFormat {
    type Err = RepackError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        Self::from_suffix(value).ok_or_else(|| RepackError::UnsupportedFormat {
            value: value.to_string(),
        })
    }
}

/// Returns `true` if `suffix` names a supported format.
#[must_use]
pub fn is_supported(suffix: &str) -> bool {
    SourceFormat::from_suffix(suffix).is_some()
}

/// The validated list of source formats a run accepts.
///
/// Order follows the order the formats were supplied in, with duplicates
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSet {
    formats: Vec<SourceFormat>,
}

impl FormatSet {
    /// Parses a user-supplied list of format suffixes.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::UnsupportedFormat`] naming the first value that
    /// is not a supported suffix, or [`RepackError::NoFormats`] if the list
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use repack_core::FormatSet;
    /// use repack_core::SourceFormat;
    ///
    /// let set = FormatSet::parse(["cbr", "cbz", "cbr"]).unwrap();
    /// assert_eq!(set.formats(), &[SourceFormat::Cbr, SourceFormat::Cbz]);
    ///
    /// assert!(FormatSet::parse(["cbr", "cb7"]).is_err());
    /// ```
    pub fn parse<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut formats = Vec::new();
        for value in values {
            let format: SourceFormat = value.as_ref().parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }

        if formats.is_empty() {
            return Err(RepackError::NoFormats);
        }

        Ok(Self { formats })
    }

    /// Creates a set from already-typed formats.
    ///
    /// # Errors
    ///
    /// Returns [`RepackError::NoFormats`] if `formats` is empty.
    pub fn new(formats: impl IntoIterator<Item = SourceFormat>) -> Result<Self> {
        let mut set = Vec::new();
        for format in formats {
            if !set.contains(&format) {
                set.push(format);
            }
        }
        if set.is_empty() {
            return Err(RepackError::NoFormats);
        }
        Ok(Self { formats: set })
    }

    /// Returns the accepted formats.
    #[must_use]
    pub fn formats(&self) -> &[SourceFormat] {
        &self.formats
    }

    /// Returns `true` if `format` is accepted.
    #[must_use]
    pub fn contains(&self, format: SourceFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Returns the accepted format matching the path's extension, if any.
    #[must_use]
    pub fn match_path(&self, path: &Path) -> Option<SourceFormat> {
        self.formats
            .iter()
            .copied()
            .find(|format| format.matches(path))
    }
}

impl Default for FormatSet {
    fn default() -> Self {
        Self {
            formats: vec![SourceFormat::Cbr],
        }
    }
}

impl fmt::Display for FormatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, format) in self.formats.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{format}")?;
        }
        Ok(())
    }
}
