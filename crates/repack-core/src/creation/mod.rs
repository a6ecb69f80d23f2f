//! Archive creation module.
//!
//! Packs extracted directory trees into ZIP containers.

pub mod compression;
pub mod config;
pub mod report;
pub mod zip;

pub use config::PackConfig;
pub use config::PackMethod;
pub use report::PackReport;
pub use zip::create_zip;
