//! Batch conversion of comic archive trees to `.cbz`.
//!
//! `repack-core` walks an input tree for `.cbr` (and optionally `.cbz`)
//! archives, unpacks each one, strips viewer thumbnail caches, and packs the
//! result into a `.cbz` under an output tree that mirrors the input layout.
//!
//! # Examples
//!
//! ```no_run
//! use repack_core::FormatSet;
//! use repack_core::RunConfig;
//! use repack_core::repack_tree;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let formats = FormatSet::parse(["cbr", "cbz"])?;
//! let config = RunConfig::new("/comics", "/repacked/comics", formats).with_force(true);
//! let report = repack_tree(&config)?;
//! println!("Repacked {} of {} archives", report.archives_repacked, report.archives_found);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod codec;
pub mod config;
pub mod creation;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod formats;
pub mod paths;
pub mod pipeline;
pub mod report;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use api::repack_tree;
pub use api::repack_tree_with_progress;
pub use codec::Codec;
pub use codec::DefaultCodec;
pub use config::RunConfig;
pub use discovery::Discovery;
pub use discovery::WorkItem;
pub use driver::Driver;
pub use error::CleanupWarning;
pub use error::RepackError;
pub use error::Result;
pub use formats::FormatSet;
pub use formats::SourceFormat;
pub use paths::PathPolicy;
pub use pipeline::RepackPipeline;
pub use pipeline::Stage;
pub use report::ItemReport;
pub use report::NoopProgress;
pub use report::RunProgress;
pub use report::RunReport;
