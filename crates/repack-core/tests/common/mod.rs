//! Shared fixtures for repack-core integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::fs::File;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use repack_core::Codec;
use repack_core::RepackError;
use repack_core::Result;
use repack_core::SourceFormat;
use repack_core::creation::PackConfig;
use repack_core::creation::PackReport;
use repack_core::formats::Unpacker;
use repack_core::formats::ZipUnpacker;
use repack_core::report::UnpackReport;
use tempfile::TempDir;
use zip::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Builds ZIP bytes from (name, content) pairs; names ending in `/` are
/// directory entries.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

/// Writes an archive fixture, creating parent directories.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, zip_bytes(entries)).unwrap();
}

/// Returns the sorted entry names of a ZIP archive.
pub fn entry_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Returns every path below `root`, relative and sorted.
pub fn tree(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.unwrap().path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Temporary input and output roots.
pub struct Roots {
    pub temp: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Roots {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("comics");
        let output = temp.path().join("repacked");
        fs::create_dir_all(&input).unwrap();
        Self {
            temp,
            input,
            output,
        }
    }
}

/// Codec that treats `.cbr` fixtures as ZIP data and records every call.
///
/// The real RAR backend cannot be fed fixtures without a RAR encoder, so
/// `.cbr` inputs in these tests are ZIP files under a `.cbr` name.
#[derive(Default, Clone)]
pub struct ZipBackedCodec {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_unpack_for: Option<String>,
}

impl ZipBackedCodec {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_unpack_for: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Codec for ZipBackedCodec {
    fn unpack(&self, format: SourceFormat, archive: &Path, dest: &Path) -> Result<UnpackReport> {
        let name = archive.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(format!("unpack {format} {name}"));
        if self.fail_unpack_for.as_deref() == Some(name.as_str()) {
            return Err(RepackError::Extraction {
                archive: archive.to_path_buf(),
                reason: "corrupt header".to_string(),
            });
        }
        ZipUnpacker.unpack(archive, dest)
    }

    fn pack(&self, sources: &[PathBuf], output: &Path, config: &PackConfig) -> Result<PackReport> {
        let name = output.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(format!("pack {name}"));
        repack_core::creation::create_zip(output, sources, config)
    }
}

/// `io::Write` sink shared between a subscriber and the test.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// Runs `f` with a debug-level subscriber writing into this capture.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
